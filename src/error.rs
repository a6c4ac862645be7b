// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with fixed plain-text responses.
//!
//! Upstream details are logged but never echoed back to the caller.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Identity provider did not assert a verified email")]
    EmailNotVerified,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Upstream request timed out")]
    UpstreamTimeout,

    #[error("Upstream provider error: {0}")]
    Upstream(String),

    #[error("Provider authorisation failed: {0}")]
    ProviderAuthorization(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub const EMAIL_NOT_VERIFIED: &'static str =
        "User email not available or not verified by Google.";
    pub const TIMEOUT: &'static str = "Request timeout occurred";
    pub const GENERIC: &'static str = "Error occurred";
    pub const AUTHORISATION_NEEDED: &'static str = "Authorisation needed for platform usage";

    /// Status code and fixed body for this error.
    pub fn status_and_message(&self) -> (StatusCode, &str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::EmailNotVerified => (StatusCode::BAD_REQUEST, Self::EMAIL_NOT_VERIFIED),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::UpstreamTimeout => (StatusCode::GATEWAY_TIMEOUT, Self::TIMEOUT),
            AppError::ProviderAuthorization(_) => {
                (StatusCode::UNAUTHORIZED, Self::AUTHORISATION_NEEDED)
            }
            AppError::Upstream(_)
            | AppError::Config(_)
            | AppError::Database(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, Self::GENERIC),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::UpstreamTimeout => tracing::info!("Request timeout."),
            AppError::Upstream(msg) => tracing::error!(error = %msg, "Upstream provider error"),
            AppError::ProviderAuthorization(msg) => {
                tracing::error!(error = %msg, "Provider authorisation failed")
            }
            AppError::Config(err) => tracing::error!(error = %err, "Configuration error"),
            AppError::Database(msg) => tracing::error!(error = %msg, "Database error"),
            AppError::Internal(err) => tracing::error!(error = %err, "Internal server error"),
            _ => {}
        }

        let (status, message) = self.status_and_message();
        (status, message.to_string()).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
