use crate::config::ConfigError;
use crate::jobs::{JobServiceError, StoreError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

/// Failures surfaced by the binary, its bootstrap code, and the HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Store(StoreError),
    Jobs(JobServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Store(err) => write!(f, "store error: {}", err),
            AppError::Jobs(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Jobs(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Jobs(JobServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Jobs(JobServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Jobs(JobServiceError::Forbidden(_)) => StatusCode::FORBIDDEN,
            AppError::Store(StoreError::Closed)
            | AppError::Jobs(JobServiceError::Store(StoreError::Closed)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Store(_)
            | AppError::Jobs(JobServiceError::Store(_)) => {
                error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<JobServiceError> for AppError {
    fn from(value: JobServiceError) -> Self {
        Self::Jobs(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobId, ValidationError};

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn job_errors_map_to_distinct_statuses() {
        let id = JobId("job-000001".to_string());
        assert_eq!(
            status_of(JobServiceError::Validation(ValidationError::MissingFields)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(JobServiceError::NotFound(id.clone())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(JobServiceError::Forbidden(id)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(JobServiceError::Store(StoreError::Closed)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(StoreError::Unavailable("offline".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn job_error_messages_are_not_prefixed() {
        let err = AppError::from(JobServiceError::NotFound(JobId("job-7".to_string())));
        assert_eq!(err.to_string(), "no job found with id job-7");
    }
}
