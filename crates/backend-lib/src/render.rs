// ============================
// crates/backend-lib/src/render.rs
// ============================
//! Render boundary. The core names a view and hands over data; producing
//! markup belongs to whatever implements [`Renderer`].
use gatehouse_common::ViewData;

use crate::error::AppError;

/// Trait for render backends
pub trait Renderer: Send + Sync {
    /// Produce a response body for the named view
    fn render(&self, view: &str, data: &ViewData) -> Result<String, AppError>;

    /// Content type of the rendered body
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }
}

/// Renderer that serializes the payload as JSON. Stands in for a template
/// engine, which sits outside the core's contract.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, view: &str, data: &ViewData) -> Result<String, AppError> {
        let body = serde_json::json!({
            "view": view,
            "values": data.values,
            "error": data.error,
            "user": data.user,
            "flash": data.flash,
        });
        Ok(serde_json::to_string(&body)?)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_common::{FlashMessage, FormValues, PublicAccount};

    #[test]
    fn json_renderer_emits_the_full_payload() {
        let data = ViewData {
            values: FormValues {
                email: "a@b.com".to_string(),
            },
            error: Some("Email is already registered.".to_string()),
            user: Some(PublicAccount {
                id: 1,
                email: "a@b.com".to_string(),
            }),
            flash: Some(FlashMessage::success("Welcome!")),
        };

        let body = JsonRenderer.render("signup", &data).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(parsed["view"], "signup");
        assert_eq!(parsed["values"]["email"], "a@b.com");
        assert_eq!(parsed["error"], "Email is already registered.");
        assert_eq!(parsed["user"]["id"], 1);
        assert_eq!(parsed["flash"]["kind"], "success");
        assert_eq!(parsed["flash"]["message"], "Welcome!");
    }

    #[test]
    fn empty_page_payload_has_nulls() {
        let body = JsonRenderer.render("index", &ViewData::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(parsed["error"].is_null());
        assert!(parsed["user"].is_null());
        assert!(parsed["flash"].is_null());
    }
}
