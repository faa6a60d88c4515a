//! API error taxonomy.
//!
//! Every handler returns `Result<_, ApiError>`. Failures render the uniform
//! `{"success": false, "error": ...}` envelope; a `details` field is attached
//! only when the server runs with DEBUG_ERRORS=1. Internal failures are
//! logged with their source and leave the response generic.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::OnceLock;
use thiserror::Error;

static DEBUG_ERRORS: OnceLock<bool> = OnceLock::new();

pub fn set_debug_errors(enabled: bool) {
    let _ = DEBUG_ERRORS.set(enabled);
}

fn debug_errors() -> bool {
    *DEBUG_ERRORS.get().unwrap_or(&false)
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] at_core::CoreError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Database(e) => {
                // a unique violation that raced past the pre-checks is a
                // conflict, not a server fault
                if is_unique_violation(e) {
                    (
                        StatusCode::CONFLICT,
                        "a value collided with an existing record".to_string(),
                    )
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
                }
            }
            ApiError::Core(e) => match e {
                at_core::CoreError::Csv(_)
                | at_core::CoreError::Xlsx(_)
                | at_core::CoreError::Import(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string()),
            },
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let mut body = json!({
            "success": false,
            "error": message,
        });
        if debug_errors() {
            body["details"] = json!(format!("{:?}", self));
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ApiError::Auth("who".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("no".into()), StatusCode::FORBIDDEN),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_message().0, expected);
        }
    }

    #[test]
    fn test_row_not_found_is_a_server_error_not_a_404() {
        // handlers translate missing rows explicitly; a stray RowNotFound
        // reaching here means a query bug
        let err = ApiError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status_and_message().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_import_errors_are_client_errors() {
        let err = ApiError::Core(at_core::CoreError::Import("no rows".into()));
        assert_eq!(err.status_and_message().0, StatusCode::BAD_REQUEST);
    }
}
