use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::StoreTimeout;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found")]
    NotFound,

    #[error("Invalid Task ID")]
    InvalidId,

    #[error("{0}")]
    Validation(String),

    #[error("task store did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound => AppError::NotFound(err.to_string()),
            TaskError::InvalidId => AppError::InvalidId(err.to_string()),
            TaskError::Validation(msg) => AppError::BadRequest(msg),
            TaskError::Timeout(_) => AppError::GatewayTimeout(err.to_string()),
            TaskError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for TaskError {
    fn from(err: mongodb::error::Error) -> Self {
        TaskError::Database(err.to_string())
    }
}

impl From<StoreTimeout> for TaskError {
    fn from(err: StoreTimeout) -> Self {
        TaskError::Timeout(err.0)
    }
}

impl From<validator::ValidationErrors> for TaskError {
    fn from(err: validator::ValidationErrors) -> Self {
        TaskError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (TaskError::NotFound, StatusCode::NOT_FOUND),
            (TaskError::InvalidId, StatusCode::BAD_REQUEST),
            (TaskError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                TaskError::Timeout(Duration::from_secs(5)),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                TaskError::Database("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }
}
