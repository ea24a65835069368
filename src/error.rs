//! Error categories for a single user action.
//!
//! Every failure is local to the request that triggered it; handlers convert
//! an [`AppError`] straight into an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// ---

#[derive(Debug, Error)]
pub enum AppError {
    // ---
    /// Rejected before any state change (missing location, bad date, ...).
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    /// Non-success status from the weather provider.
    #[error("weather provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Provider answered successfully but with unusable content.
    #[error("weather provider sent malformed data: {0}")]
    MalformedUpstream(String),

    #[error("weather provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("record store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ---
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        // ---
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } | Self::MalformedUpstream(_) | Self::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // ---
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
