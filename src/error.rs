//! Error types and handling for the Parade Weather service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the Parade Weather service
#[derive(Error, Debug)]
pub enum ParadeWeatherError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream data source errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Weighted combination received weights that cannot be normalized
    #[error("Invalid weight: {message}")]
    InvalidWeight { message: String },

    /// Every provider of an acquisition chain failed
    #[error("No provider succeeded: {}", failures.join("; "))]
    NoProviderSucceeded { failures: Vec<String> },

    /// A provider did not answer in time
    #[error("{provider} timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl ParadeWeatherError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new invalid weight error
    pub fn invalid_weight<S: Into<String>>(message: S) -> Self {
        Self::InvalidWeight {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ParadeWeatherError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ParadeWeatherError::Api { .. }
            | ParadeWeatherError::NoProviderSucceeded { .. }
            | ParadeWeatherError::Timeout { .. } => {
                "Unable to obtain weather data for this location and date.".to_string()
            }
            ParadeWeatherError::Validation { message } => format!("Invalid input: {message}"),
            ParadeWeatherError::InvalidWeight { message } => {
                format!("Invalid weight: {message}")
            }
            ParadeWeatherError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            ParadeWeatherError::General { message } => message.clone(),
        }
    }

    /// HTTP status used when this error reaches the API boundary
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ParadeWeatherError::Validation { .. } | ParadeWeatherError::InvalidWeight { .. } => {
                StatusCode::BAD_REQUEST
            }
            ParadeWeatherError::Api { .. } | ParadeWeatherError::NoProviderSucceeded { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ParadeWeatherError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ParadeWeatherError::Config { .. }
            | ParadeWeatherError::Io { .. }
            | ParadeWeatherError::General { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ParadeWeatherError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

impl From<reqwest::Error> for ParadeWeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::api(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for ParadeWeatherError {
    fn from(err: reqwest_middleware::Error) -> Self {
        Self::api(err.to_string())
    }
}
