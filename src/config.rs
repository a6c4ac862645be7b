// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Provider credentials are optional at startup. A handler that needs one
//! calls [`Config::require`], so a missing value surfaces on first use
//! rather than preventing the server from booting.

use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://mydata.db?mode=rwc";
pub const GOOGLE_DISCOVERY_URL: &str =
    "https://accounts.google.com/.well-known/openid-configuration";

pub const OURA_AUTH_URL: &str = "https://cloud.ouraring.com/oauth/authorize";
pub const OURA_TOKEN_URL: &str = "https://api.ouraring.com/oauth/token";
pub const OURA_API_URL: &str = "https://api.ouraring.com/v1";

pub const FITBIT_AUTH_URL: &str = "https://www.fitbit.com/oauth2/authorize";
pub const FITBIT_TOKEN_URL: &str = "https://api.fitbit.com/oauth2/token";
pub const FITBIT_API_URL: &str = "https://api.fitbit.com";

/// Upper bound on any single upstream call.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Server ---
    /// Public base URL of this app, used to build OAuth redirect URIs
    pub app_url: String,
    /// Server port
    pub port: u16,
    /// Session and OAuth state signing key
    pub secret_key: Option<Vec<u8>>,
    /// Database connection URI for the user store
    pub database_url: String,
    /// Timeout applied to every upstream HTTP call
    pub upstream_timeout: Duration,

    // --- Identity provider (Google) ---
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_discovery_url: String,

    // --- Oura ---
    pub oura_client_id: Option<String>,
    pub oura_client_secret: Option<String>,
    /// Personal access token used when a user has not authorised Oura
    pub oura_personal_token: Option<String>,
    pub oura_auth_url: String,
    pub oura_token_url: String,
    pub oura_api_url: String,

    // --- Fitbit ---
    pub fitbit_client_id: Option<String>,
    pub fitbit_client_secret: Option<String>,
    pub fitbit_auth_url: String,
    pub fitbit_token_url: String,
    pub fitbit_api_url: String,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match optional("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT", raw))?,
            None => DEFAULT_PORT,
        };

        let upstream_timeout = match optional("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("UPSTREAM_TIMEOUT_SECS", raw))?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let app_url = optional("APP_URL").unwrap_or_else(|| format!("http://localhost:{port}"));

        Ok(Self {
            app_url: app_url.trim_end_matches('/').to_string(),
            port,
            secret_key: optional("SECRET_KEY").map(String::into_bytes),
            database_url: optional("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            upstream_timeout: Duration::from_secs(upstream_timeout),

            google_client_id: optional("GOOGLE_CLIENT_ID"),
            google_client_secret: optional("GOOGLE_CLIENT_SECRET"),
            google_discovery_url: optional("GOOGLE_DISCOVERY_URL")
                .unwrap_or_else(|| GOOGLE_DISCOVERY_URL.to_string()),

            oura_client_id: optional("OURA_CLIENT_ID"),
            oura_client_secret: optional("OURA_CLIENT_SECRET"),
            oura_personal_token: optional("OURA_TOKEN"),
            oura_auth_url: optional("OURA_AUTH_URL").unwrap_or_else(|| OURA_AUTH_URL.to_string()),
            oura_token_url: optional("OURA_TOKEN_URL")
                .unwrap_or_else(|| OURA_TOKEN_URL.to_string()),
            oura_api_url: optional("OURA_API_URL").unwrap_or_else(|| OURA_API_URL.to_string()),

            fitbit_client_id: optional("FITBIT_CLIENT_ID"),
            fitbit_client_secret: optional("FITBIT_CLIENT_SECRET"),
            fitbit_auth_url: optional("FITBIT_AUTH_URL")
                .unwrap_or_else(|| FITBIT_AUTH_URL.to_string()),
            fitbit_token_url: optional("FITBIT_TOKEN_URL")
                .unwrap_or_else(|| FITBIT_TOKEN_URL.to_string()),
            fitbit_api_url: optional("FITBIT_API_URL")
                .unwrap_or_else(|| FITBIT_API_URL.to_string()),
        })
    }

    /// Fully populated config for tests. Upstream URLs point nowhere useful;
    /// tests override them with a stub server address.
    pub fn test_default() -> Self {
        Self {
            app_url: "http://localhost:5000".to_string(),
            port: DEFAULT_PORT,
            secret_key: Some(b"test_secret_key_32_bytes_minimum!".to_vec()),
            database_url: "sqlite::memory:".to_string(),
            upstream_timeout: Duration::from_secs(5),
            google_client_id: Some("google_client_id".to_string()),
            google_client_secret: Some("google_client_secret".to_string()),
            google_discovery_url: GOOGLE_DISCOVERY_URL.to_string(),
            oura_client_id: Some("oura_client_id".to_string()),
            oura_client_secret: Some("oura_client_secret".to_string()),
            oura_personal_token: None,
            oura_auth_url: OURA_AUTH_URL.to_string(),
            oura_token_url: OURA_TOKEN_URL.to_string(),
            oura_api_url: OURA_API_URL.to_string(),
            fitbit_client_id: Some("fitbit_client_id".to_string()),
            fitbit_client_secret: Some("fitbit_client_secret".to_string()),
            fitbit_auth_url: FITBIT_AUTH_URL.to_string(),
            fitbit_token_url: FITBIT_TOKEN_URL.to_string(),
            fitbit_api_url: FITBIT_API_URL.to_string(),
        }
    }

    /// Point every upstream endpoint at `base` (a stub server in tests).
    pub fn with_upstream_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.google_discovery_url = format!("{base}/google/.well-known/openid-configuration");
        self.oura_auth_url = format!("{base}/oura/oauth/authorize");
        self.oura_token_url = format!("{base}/oura/oauth/token");
        self.oura_api_url = format!("{base}/oura/v1");
        self.fitbit_auth_url = format!("{base}/fitbit/oauth2/authorize");
        self.fitbit_token_url = format!("{base}/fitbit/oauth2/token");
        self.fitbit_api_url = format!("{base}/fitbit/api");
        self
    }

    /// Unwrap an optional setting, naming the variable when it is absent.
    pub fn require<'a>(
        value: &'a Option<String>,
        name: &'static str,
    ) -> Result<&'a str, ConfigError> {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(name))
    }

    /// Session/state signing key.
    pub fn signing_key(&self) -> Result<&[u8], ConfigError> {
        self.secret_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("SECRET_KEY"))
    }

    /// Cookies get the `Secure` attribute only when served over https.
    pub fn cookie_secure(&self) -> bool {
        self.app_url.starts_with("https://")
    }

    /// Absolute URL for a path on this app.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.app_url, path)
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
