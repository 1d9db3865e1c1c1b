use crate::config::ConfigError;
use crate::coordination::{CoordinationError, IncidentImportError, SourceError};
use crate::telemetry::TelemetryError;
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
    Import(IncidentImportError),
    Coordination(CoordinationError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            // Source messages are already phrased for operators.
            AppError::Coordination(err) => write!(f, "{}", err),
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
            AppError::Import(err) => Some(err),
            AppError::Coordination(err) => Some(err),
        }
    }
}

impl AppError {
    /// HTTP status reported when this error reaches a handler boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Coordination(CoordinationError::Source(SourceError::Unavailable(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Coordination(CoordinationError::Source(SourceError::Malformed(_))) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "request failed");
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

impl From<IncidentImportError> for AppError {
    fn from(value: IncidentImportError) -> Self {
        Self::Import(value)
    }
}

impl From<CoordinationError> for AppError {
    fn from(value: CoordinationError) -> Self {
        Self::Coordination(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_failures_are_client_errors() {
        let error = AppError::from(IncidentImportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing export",
        )));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn source_failures_map_to_gateway_statuses() {
        let offline = AppError::from(CoordinationError::from(SourceError::Unavailable(
            "timeout".to_string(),
        )));
        assert_eq!(offline.to_string(), "incident source unavailable: timeout");
        assert_eq!(offline.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let garbled = AppError::from(CoordinationError::from(SourceError::Malformed(
            "truncated page".to_string(),
        )));
        assert_eq!(garbled.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn config_failures_are_server_errors() {
        let error = AppError::from(ConfigError::InvalidPort);
        assert!(error.to_string().contains("APP_PORT"));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
