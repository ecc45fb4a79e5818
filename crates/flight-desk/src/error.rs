use crate::config::ConfigError;
use crate::context::ContextError;
use crate::telemetry::TelemetryError;
use crate::workflows::domain::{RetrievalError, ValidationError};
use crate::workflows::fares::PredictionError;
use crate::workflows::meals::MenuError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Context(ContextError),
    Validation(ValidationError),
    Retrieval(RetrievalError),
    Prediction(PredictionError),
    Menu(MenuError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Menu(MenuError::UnknownAirline(_)) => StatusCode::NOT_FOUND,
            AppError::Menu(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Retrieval(_) | AppError::Prediction(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Context(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Context(err) => write!(f, "startup error: {}", err),
            AppError::Validation(err) => write!(f, "invalid input: {}", err),
            AppError::Retrieval(err) => write!(f, "data source error: {}", err),
            AppError::Prediction(err) => write!(f, "fare model error: {}", err),
            AppError::Menu(err) => write!(f, "menu error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Context(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Retrieval(err) => Some(err),
            AppError::Prediction(err) => Some(err),
            AppError::Menu(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
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

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ContextError> for AppError {
    fn from(value: ContextError) -> Self {
        Self::Context(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RetrievalError> for AppError {
    fn from(value: RetrievalError) -> Self {
        Self::Retrieval(value)
    }
}

impl From<PredictionError> for AppError {
    fn from(value: PredictionError) -> Self {
        Self::Prediction(value)
    }
}

impl From<MenuError> for AppError {
    fn from(value: MenuError) -> Self {
        Self::Menu(value)
    }
}
