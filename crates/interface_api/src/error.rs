//! API error handling
//!
//! Every failure leaves the service as `{ "error", "message", "details"? }`
//! with one of six codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::{ValidationErrors, ValidationErrorsKind};

use core_kernel::{CoreError, PortError, TemporalError};
use domain_journal::JournalError;
use domain_progress::ProgressError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    InvalidRequest { message: String, details: Vec<String> },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest { .. } => "INVALID_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let (message, details) = match self {
            ApiError::InvalidRequest { message, details } => (message, details),
            ApiError::Internal(message) => {
                error!(error = %message, "Request failed");
                ("Internal server error".to_string(), Vec::new())
            }
            ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => (m, Vec::new()),
        };

        let body = ErrorResponse {
            error: code,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { message, field } => ApiError::InvalidRequest {
                message,
                details: field.into_iter().collect(),
            },
            PortError::Conflict { message } => ApiError::Conflict(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(_) | CoreError::Temporal(_) => ApiError::invalid(err.to_string()),
            CoreError::NotFound(message) => ApiError::NotFound(message),
        }
    }
}

impl From<TemporalError> for ApiError {
    fn from(err: TemporalError) -> Self {
        ApiError::invalid(err.to_string())
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        if err.is_validation() {
            ApiError::invalid(err.to_string())
        } else if err.is_conflict() {
            ApiError::Conflict(err.to_string())
        } else {
            match err {
                JournalError::Core(core) => core.into(),
                other => ApiError::Internal(other.to_string()),
            }
        }
    }
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        if err.is_validation() {
            ApiError::invalid(err.to_string())
        } else if err.is_conflict() {
            ApiError::Conflict(err.to_string())
        } else if err.is_forbidden() {
            ApiError::Forbidden(err.to_string())
        } else {
            match err {
                ProgressError::Core(core) => core.into(),
                other => ApiError::Internal(other.to_string()),
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        let mut details = Vec::new();
        flatten_validation("", &err, &mut details);
        details.sort();
        ApiError::InvalidRequest {
            message: "Request validation failed".to_string(),
            details,
        }
    }
}

/// One `path: message` line per failed rule, nested fields included
fn flatten_validation(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    let message = match &failure.message {
                        Some(message) => message.to_string(),
                        None => failure.code.to_string(),
                    };
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_validation(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_validation(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_progress::EvidenceStatus;

    #[test]
    fn test_port_errors_map_onto_codes() {
        assert_eq!(ApiError::from(PortError::not_found("Entry", "ENT-1")).code(), "NOT_FOUND");
        assert_eq!(ApiError::from(PortError::conflict("taken")).code(), "CONFLICT");
        assert_eq!(ApiError::from(PortError::connection("down")).code(), "INTERNAL_ERROR");
        assert_eq!(
            ApiError::from(PortError::validation_field("too long", "name")).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_domain_errors_map_onto_codes() {
        assert_eq!(ApiError::from(JournalError::EmptyEntry).code(), "INVALID_REQUEST");
        assert_eq!(ApiError::from(JournalError::PartnerInUse("PTR-1".into())).code(), "CONFLICT");
        assert_eq!(ApiError::from(ProgressError::SelfReview).code(), "FORBIDDEN");
        assert_eq!(
            ApiError::from(ProgressError::AlreadyReviewed(EvidenceStatus::Confirmed)).code(),
            "CONFLICT"
        );
    }
}
