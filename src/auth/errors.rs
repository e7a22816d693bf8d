use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::auth::password::PasswordError;
use crate::errors::error_response;
use crate::repositories::RepositoryError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("All fields must be filled")]
    MissingFields,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email already in use")]
    EmailAlreadyExists,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Invalid authorization header format")]
    InvalidAuthHeaderFormat,
    #[error("Password validation failed: {0}")]
    PasswordValidation(PasswordError),
    #[error("Email validation failed: {0}")]
    EmailValidation(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Password hashing error: {0}")]
    PasswordHashing(PasswordError),
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        if err.is_policy_violation() {
            AuthError::PasswordValidation(err)
        } else {
            AuthError::PasswordHashing(err)
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AuthError::MissingFields => (StatusCode::BAD_REQUEST, "Validation failed"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::EmailAlreadyExists => (StatusCode::CONFLICT, "Email already exists"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::MissingAuthHeader => (StatusCode::UNAUTHORIZED, "Missing authorization header"),
            AuthError::InvalidAuthHeaderFormat => {
                (StatusCode::UNAUTHORIZED, "Invalid authorization header format")
            }
            AuthError::PasswordValidation(_) => (StatusCode::BAD_REQUEST, "Password validation failed"),
            AuthError::EmailValidation(_) => (StatusCode::BAD_REQUEST, "Email validation failed"),
            AuthError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
            AuthError::Repository(_) | AuthError::Jwt(_) | AuthError::PasswordHashing(_) => {
                error!(error = %self, "authentication request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error_message.to_string()
        } else {
            self.to_string()
        };

        error_response(status, error_message, message)
    }
}
