// ================
// common/src/lib.rs
// ================
//! Common types shared between the Gatehouse core and its transport/render
//! boundary: account identifiers, the form bodies accepted by the HTTP
//! surface, and the payload handed to the template layer.

use serde::{Deserialize, Serialize};

/// Account identifier assigned by the credential store
pub type AccountId = u64;

/// Account fields safe to hand to the render layer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicAccount {
    /// Store-assigned identifier
    pub id: AccountId,
    /// Normalized email address
    pub email: String,
}

/// One-shot message attached to a session and shown on the next rendered page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    /// Message category, drives presentation only
    pub kind: FlashKind,
    /// User-visible text
    pub message: String,
}

/// Flash message categories
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashMessage {
    /// Build a success flash
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    /// Build an error flash
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Submitted form fields echoed back when a page is re-rendered with an error
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    /// Email as submitted (normalized), so the user does not retype it
    pub email: String,
}

/// Payload handed to the render layer: a view is named and given data,
/// markup is never produced by the core
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ViewData {
    /// Field values to pre-fill
    pub values: FormValues,
    /// User-correctable error message, if any
    pub error: Option<String>,
    /// Resolved account for the current session, if any
    pub user: Option<PublicAccount>,
    /// One-shot message consumed from the session, if any
    pub flash: Option<FlashMessage>,
}

/// Body of `POST /signup`
#[derive(Deserialize, Clone)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Body of `POST /signin`
#[derive(Deserialize, Clone)]
pub struct SigninForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
