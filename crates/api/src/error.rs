//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; services raise the domain variants directly and
//! repository failures are converted at the service boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::TokenError;
use crate::db::RepositoryError;

/// A single invalid field in a request body.
#[derive(Debug, Clone, Serialize)]
pub struct FieldMessage {
    /// Name of the offending DTO field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldMessage {
    /// Create a new field message.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request carried no valid bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Principal is authenticated but not allowed to touch the resource.
    #[error("access denied")]
    Forbidden,

    /// Entity lookup miss, carrying the entity type and id.
    #[error("Object not found! Id: {id}, Type: {entity}")]
    NotFound {
        /// Entity type name (e.g. "Customer").
        entity: &'static str,
        /// The id that missed.
        id: String,
    },

    /// Delete blocked by dependent records, or a uniqueness conflict.
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    /// Request body failed shape validation.
    #[error("validation failed")]
    Validation(Vec<FieldMessage>),

    /// Malformed request (unreadable multipart, bad query parameter).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => Self::DataIntegrity(msg),
            RepositoryError::Database(e) => Self::Database(e),
            RepositoryError::DataCorruption(msg) => Self::Internal(msg),
            // A repository-level miss without entity context; services that
            // can name the entity raise AppError::NotFound themselves.
            RepositoryError::NotFound => Self::NotFound {
                entity: "Entity",
                id: "?".to_string(),
            },
        }
    }
}

/// JSON error payload sent to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: u16,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldMessage>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, error) = match &self {
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Access denied"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found"),
            Self::DataIntegrity(_) => (StatusCode::CONFLICT, "Data integrity violation"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "Validation error"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            Self::Database(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let errors = match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorBody {
            status: status.as_u16(),
            error,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::Unauthorized("no token".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(AppError::NotFound {
                entity: "Customer",
                id: "7".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::DataIntegrity("related orders".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Validation(vec![FieldMessage::new(
                "email", "required"
            )])),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_carries_entity_and_id() {
        let err = AppError::NotFound {
            entity: "Customer",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Object not found! Id: 42, Type: Customer");
    }

    #[test]
    fn test_repository_conflict_maps_to_data_integrity() {
        let err: AppError = RepositoryError::Conflict("customer has related orders".into()).into();
        assert!(matches!(err, AppError::DataIntegrity(_)));
    }
}
