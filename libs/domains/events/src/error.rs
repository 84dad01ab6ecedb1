use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::{InvalidIdentifier, StoreTimeout};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found")]
    NotFound,

    #[error("Invalid Event ID")]
    InvalidId,

    #[error("{0}")]
    Validation(String),

    #[error("event store did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    Database(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound => AppError::NotFound(err.to_string()),
            EventError::InvalidId => AppError::InvalidId(err.to_string()),
            EventError::Validation(msg) => AppError::BadRequest(msg),
            EventError::Timeout(_) => AppError::GatewayTimeout(err.to_string()),
            EventError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Database(err.to_string())
    }
}

impl From<InvalidIdentifier> for EventError {
    fn from(_: InvalidIdentifier) -> Self {
        EventError::InvalidId
    }
}

impl From<StoreTimeout> for EventError {
    fn from(err: StoreTimeout) -> Self {
        EventError::Timeout(err.0)
    }
}

impl From<validator::ValidationErrors> for EventError {
    fn from(err: validator::ValidationErrors) -> Self {
        EventError::Validation(err.to_string())
    }
}
