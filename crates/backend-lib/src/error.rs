// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::DuplicateEmail
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::DuplicateEmail => "ACCT_001",
            AppError::InvalidCredentials => "AUTH_001",
            AppError::Storage(_) => "STORE_001",
            AppError::Internal(_) => "INT_001",
            AppError::NotFound(_) => "NF_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a sanitized message suitable for showing to the user.
    /// Storage-class faults never leak their detail into the response body.
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::DuplicateEmail => "Email is already registered.".to_string(),
            AppError::InvalidCredentials => "Invalid email or password.".to_string(),
            AppError::NotFound(_) => "Not Found".to_string(),
            AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::Io(_)
            | AppError::Json(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// True for faults whose detail belongs in the server log only
    pub fn is_storage_fault(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_) | AppError::Internal(_) | AppError::Io(_) | AppError::Json(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code = error_code, "request failed");
        }

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": self.sanitized_message(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_app_error_display() {
        let validation = AppError::Validation("All fields are required.".to_string());
        assert_eq!(
            validation.to_string(),
            "Validation error: All fields are required."
        );

        let io_error = AppError::Io(IoError::new(ErrorKind::NotFound, "File not found"));
        assert!(io_error.to_string().contains("IO error"));

        assert_eq!(
            AppError::DuplicateEmail.to_string(),
            "Email is already registered"
        );
        assert_eq!(
            AppError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Validation("missing".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DuplicateEmail.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Storage("disk full".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::NotFound("page".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );

        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        assert_eq!(
            AppError::Json(json_err).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_error_codes() {
        assert_eq!(
            AppError::Validation("missing".to_string()).error_code(),
            "VAL_001"
        );
        assert_eq!(AppError::DuplicateEmail.error_code(), "ACCT_001");
        assert_eq!(AppError::InvalidCredentials.error_code(), "AUTH_001");
        assert_eq!(
            AppError::Storage("disk full".to_string()).error_code(),
            "STORE_001"
        );
        assert_eq!(AppError::Internal("oops".to_string()).error_code(), "INT_001");
    }

    #[test]
    fn test_sanitized_messages_never_leak_storage_detail() {
        let io_err = AppError::Io(IoError::new(ErrorKind::PermissionDenied, "/secret/path"));
        assert_eq!(
            io_err.sanitized_message(),
            "Something went wrong. Please try again."
        );
        assert!(io_err.is_storage_fault());

        let storage = AppError::Storage("index out of sync for a@b.com".to_string());
        assert!(!storage.sanitized_message().contains("a@b.com"));
        assert!(storage.is_storage_fault());

        // User-correctable kinds keep their message verbatim
        let validation = AppError::Validation("Passwords do not match.".to_string());
        assert_eq!(validation.sanitized_message(), "Passwords do not match.");
        assert!(!validation.is_storage_fault());
    }

    #[test]
    fn test_indistinguishable_credential_failures() {
        // Unknown email and wrong password must map to the same kind, the
        // same status, and the same user-visible message.
        let unknown_user = AppError::InvalidCredentials;
        let wrong_password = AppError::InvalidCredentials;
        assert_eq!(unknown_user.status_code(), wrong_password.status_code());
        assert_eq!(unknown_user.error_code(), wrong_password.error_code());
        assert_eq!(
            unknown_user.sanitized_message(),
            wrong_password.sanitized_message()
        );
    }

    #[test]
    fn test_error_from_impls() {
        let io_err = IoError::new(ErrorKind::PermissionDenied, "Permission denied");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));

        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Json(_)));
    }

    #[tokio::test]
    async fn test_app_error_into_response() {
        let error = AppError::NotFound("no such page".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response_headers = response.headers();
        assert!(response_headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("application/json"));
    }
}
