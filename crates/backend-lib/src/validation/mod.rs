// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for signup and signin requests.

use crate::error::AppError;

/// RFC 5321 SMTP limit
const MAX_EMAIL_LENGTH: usize = 254;

/// Normalize an email address: trim surrounding whitespace, lowercase.
/// Uniqueness and lookups operate on the normalized form only.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate a signup submission. Expects the email already normalized.
pub fn validate_signup(email: &str, password: &str, confirm: &str) -> Result<(), AppError> {
    if email.is_empty() || password.is_empty() || confirm.is_empty() {
        return Err(AppError::Validation("All fields are required.".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(AppError::Validation("Email address is too long.".to_string()));
    }
    if password != confirm {
        return Err(AppError::Validation("Passwords do not match.".to_string()));
    }
    Ok(())
}

/// Validate a signin submission. Expects the email already normalized.
pub fn validate_signin(email: &str, password: &str) -> Result<(), AppError> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required.".to_string(),
        ));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(AppError::Validation("Email address is too long.".to_string()));
    }
    Ok(())
}
