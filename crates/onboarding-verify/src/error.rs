//! Top-level failure type for the service binary and its HTTP surface.
//!
//! Check adapters never surface here: an unreachable source becomes an
//! `error` outcome inside the verification result. Only failures that stop
//! the process, or that happen outside a check, are reported as [`AppError`].

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::verification::TransportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Environment could not be turned into an [`AppConfig`](crate::config::AppConfig).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    /// Binding the listener or serving connections.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    /// The shared HTTP client for verification sources could not be built.
    /// Answered with `502 Bad Gateway` since the fault sits upstream of us.
    #[error("verification transport error: {0}")]
    Transport(#[from] TransportError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
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
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
