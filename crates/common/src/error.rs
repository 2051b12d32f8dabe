//! Error types for the portal backend.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Field name → human-readable violation message.
///
/// A `BTreeMap` keeps the serialized order deterministic, which the form
/// endpoints rely on in tests.
pub type FieldErrors = BTreeMap<String, String>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("CMS error: {0}")]
    Cms(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Cms(_) | Self::Config(_) | Self::ExternalService(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Cms(_) => "CMS_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// User-facing message. Server-side details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(what) => format!("{what} tidak ditemukan"),
            Self::Unauthorized => "Anda harus login sebagai admin".to_string(),
            Self::BadRequest(msg) | Self::Conflict(msg) => msg.clone(),
            Self::Validation(_) => "Data yang dikirim tidak valid".to_string(),
            Self::Cms(_) | Self::Config(_) | Self::ExternalService(_) | Self::Internal(_) => {
                "Terjadi kesalahan pada server".to_string()
            }
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors with their internal detail
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let mut body = json!({
            "success": false,
            "error": {
                "code": code,
                "message": self.user_message(),
            }
        });

        if let Self::Validation(fields) = &self {
            body["error"]["fields"] = json!(fields);
        }

        (status, Json(body)).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let fields = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let message = errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map_or_else(|| "Nilai tidak valid".to_string(), ToString::to_string);
                (field.to_string(), message)
            })
            .collect();
        Self::Validation(fields)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("Lomba".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Conflict("NIM sudah terdaftar".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Cms("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_keeps_every_field() {
        let mut fields = FieldErrors::new();
        fields.insert("email".to_string(), "Format email tidak valid".to_string());
        fields.insert("nim".to_string(), "NIM wajib diisi".to_string());

        let err = AppError::Validation(fields.clone());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        if let AppError::Validation(got) = err {
            assert_eq!(got.len(), 2);
            assert_eq!(got, fields);
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = AppError::Cms("connection refused to 10.0.0.5".into());
        assert!(!err.user_message().contains("10.0.0.5"));
    }
}
