use crate::config::ConfigError;
use crate::evaluation::InvalidInputError;
use crate::providers::MissingConfigError;
use crate::service::ServiceError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tokio::task::JoinError;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    MissingConfig(MissingConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidInput(InvalidInputError),
    Service(ServiceError),
    BadRequest(String),
    Task(JoinError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::MissingConfig(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid json: {}", err),
            AppError::InvalidInput(err) => write!(f, "evaluation error: {}", err),
            AppError::Service(err) => write!(f, "service error: {}", err),
            AppError::BadRequest(message) => write!(f, "bad request: {}", message),
            AppError::Task(err) => write!(f, "background task failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::MissingConfig(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::InvalidInput(err) => Some(err),
            AppError::Service(err) => Some(err),
            AppError::BadRequest(_) => None,
            AppError::Task(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_)
            | AppError::Json(_)
            | AppError::InvalidInput(_)
            | AppError::Service(
                ServiceError::Duration(_) | ServiceError::EmptyTranscript | ServiceError::EmptyAudio,
            ) => StatusCode::BAD_REQUEST,
            // A malformed model response is an upstream fault, not the caller's.
            AppError::Service(ServiceError::InvalidInput(_) | ServiceError::Provider(_)) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Service(ServiceError::Repository(_))
            | AppError::Task(_)
            | AppError::Config(_)
            | AppError::MissingConfig(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<MissingConfigError> for AppError {
    fn from(value: MissingConfigError) -> Self {
        Self::MissingConfig(value)
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

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<InvalidInputError> for AppError {
    fn from(value: InvalidInputError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<JoinError> for AppError {
    fn from(value: JoinError) -> Self {
        Self::Task(value)
    }
}
