//! Typed errors and HTTP mapping.

use crate::service::FieldError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

// Fixed messages returned to clients. Underlying error text never leaves the server.
pub const ERR_INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
pub const ERR_INVALID_REQUEST: &str = "Invalid request";
pub const ERR_NOT_FOUND: &str = "Not Found";
pub const ERR_USER_ALREADY_EXISTS: &str = "Email already registered";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid request")]
    InvalidRequest,
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(StoreError),
    #[error("internal: {0}")]
    Internal(String),
}

/// Body of every error response: `{"status": 400, "message": ...}`.
#[derive(Serialize)]
pub struct ErrorBody<M: Serialize> {
    pub status: u16,
    pub message: M,
}

#[derive(Serialize)]
struct ValidationErrors<'a> {
    errors: &'a [FieldError],
}

/// Safe client message for a unique constraint the API knows about.
pub fn conflict_message(constraint: &str) -> Option<&'static str> {
    match constraint {
        "users_email_key" => Some(ERR_USER_ALREADY_EXISTS),
        _ => None,
    }
}

impl From<StoreError> for AppError {
    /// Unique violations on a known constraint become conflicts; everything else stays a store error.
    fn from(e: StoreError) -> Self {
        if let StoreError::Duplicate { constraint } = &e {
            if let Some(message) = conflict_message(constraint) {
                return AppError::Conflict(message);
            }
        }
        AppError::Store(e)
    }
}

fn error_response<M: Serialize>(status: StatusCode, message: M) -> Response {
    let body = ErrorBody {
        status: status.as_u16(),
        message,
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidRequest => error_response(StatusCode::BAD_REQUEST, ERR_INVALID_REQUEST),
            AppError::Validation(errors) => {
                tracing::info!(errors = ?errors, "unable to validate request");
                error_response(StatusCode::BAD_REQUEST, ValidationErrors { errors })
            }
            AppError::NotFound => error_response(StatusCode::NOT_FOUND, ERR_NOT_FOUND),
            AppError::Conflict(message) => error_response(StatusCode::CONFLICT, *message),
            AppError::InvalidCredentials => {
                error_response(StatusCode::UNAUTHORIZED, ERR_INVALID_CREDENTIALS)
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, ERR_INTERNAL_SERVER_ERROR)
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "internal failure");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, ERR_INTERNAL_SERVER_ERROR)
            }
        }
    }
}
