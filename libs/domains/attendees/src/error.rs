use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::{StoreTimeout, is_duplicate_key};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendeeError {
    #[error("Attendee not found")]
    NotFound,

    #[error("Invalid Attendee ID")]
    InvalidId,

    #[error("{0}")]
    Validation(String),

    #[error("attendee with this email already exists")]
    DuplicateEmail,

    #[error("attendee store did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    Database(String),
}

pub type AttendeeResult<T> = Result<T, AttendeeError>;

impl From<AttendeeError> for AppError {
    fn from(err: AttendeeError) -> Self {
        match err {
            AttendeeError::NotFound => AppError::NotFound(err.to_string()),
            AttendeeError::InvalidId => AppError::InvalidId(err.to_string()),
            AttendeeError::Validation(msg) => AppError::BadRequest(msg),
            AttendeeError::DuplicateEmail => AppError::DuplicateKey(err.to_string()),
            AttendeeError::Timeout(_) => AppError::GatewayTimeout(err.to_string()),
            AttendeeError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for AttendeeError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for AttendeeError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            AttendeeError::DuplicateEmail
        } else {
            AttendeeError::Database(err.to_string())
        }
    }
}

impl From<StoreTimeout> for AttendeeError {
    fn from(err: StoreTimeout) -> Self {
        AttendeeError::Timeout(err.0)
    }
}

impl From<validator::ValidationErrors> for AttendeeError {
    fn from(err: validator::ValidationErrors) -> Self {
        AttendeeError::Validation(err.to_string())
    }
}
