use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{service} error: {message}")]
    Upstream { service: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ReviewError {
    pub fn upstream(service: &str, message: impl Into<String>) -> Self {
        ReviewError::Upstream {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ReviewError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ReviewError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short text returned to HTTP callers in the `detail` field.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReviewError::InvalidInput(msg) | ReviewError::NotFound(msg) => msg.clone(),
            ReviewError::Http(e) if e.is_timeout() => {
                "Upstream service timed out".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            detail: String,
        }

        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ Request failed: {}", self);
        } else {
            tracing::info!("Request rejected ({}): {}", status.as_u16(), self);
        }

        (
            status,
            Json(ErrorResponse {
                detail: self.user_friendly_message(),
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;
