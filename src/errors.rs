use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::repositories::RepositoryError;

/// Build the JSON error body shared by every failing route.
pub(crate) fn error_response(status: StatusCode, error: &str, message: String) -> Response {
    error_response_with(status, error, message, None)
}

pub(crate) fn error_response_with(
    status: StatusCode,
    error: &str,
    message: String,
    extra: Option<(&str, Value)>,
) -> Response {
    let mut body = json!({
        "error": error,
        "message": message,
    });

    if let (Some((key, value)), Some(object)) = (extra, body.as_object_mut()) {
        object.insert(key.to_string(), value);
    }

    (status, Json(body)).into_response()
}

#[derive(Error, Debug)]
pub enum WorkoutError {
    #[error("Please fill in all fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("{0}")]
    Validation(String),
    #[error("Workout belongs to another user")]
    Forbidden,
    #[error("No such workout: {0}")]
    NotFound(String),
    #[error("Repository error: {0}")]
    Repository(#[source] RepositoryError),
}

impl From<RepositoryError> for WorkoutError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => WorkoutError::NotFound(id.to_string()),
            other => WorkoutError::Repository(other),
        }
    }
}

impl From<validator::ValidationErrors> for WorkoutError {
    fn from(errors: validator::ValidationErrors) -> Self {
        WorkoutError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for WorkoutError {
    fn from(rejection: JsonRejection) -> Self {
        WorkoutError::Validation(rejection.body_text())
    }
}

impl IntoResponse for WorkoutError {
    fn into_response(self) -> Response {
        match self {
            WorkoutError::MissingFields(ref fields) => error_response_with(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                self.to_string(),
                Some(("empty_fields", json!(fields))),
            ),
            WorkoutError::Validation(message) => {
                error_response(StatusCode::BAD_REQUEST, "Validation failed", message)
            }
            WorkoutError::Forbidden => {
                error_response(StatusCode::FORBIDDEN, "Forbidden", self.to_string())
            }
            WorkoutError::NotFound(_) => {
                error_response(StatusCode::NOT_FOUND, "Not found", self.to_string())
            }
            WorkoutError::Repository(source) => {
                error!(error = %source, "workout request failed");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "Internal server error".to_string(),
                )
            }
        }
    }
}
