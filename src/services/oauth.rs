// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth2 authorization-code building blocks shared by every provider.
//!
//! Handles:
//! - Authorization URL construction
//! - Signed `state` parameters (HMAC-SHA256, bounded age)
//! - Code-for-token exchange against a provider token endpoint

use crate::error::AppError;
use crate::models::ProviderTokens;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// How long a signed state stays acceptable.
pub const STATE_MAX_AGE: Duration = Duration::from_secs(10 * 60);

/// OAuth flow failures.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),

    #[error("token endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for OAuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OAuthError::Timeout
        } else {
            OAuthError::Request(err.to_string())
        }
    }
}

impl From<OAuthError> for AppError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::Timeout => AppError::UpstreamTimeout,
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// Where a provider expects the client credentials on the token request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAuth {
    /// HTTP Basic `client_id:client_secret`
    Basic,
    /// `client_id` / `client_secret` form fields
    RequestBody,
}

/// Client id/secret pair for one provider.
#[derive(Clone)]
pub struct ClientCredentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Parameters of an authorization request redirect.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest<'a> {
    pub authorize_url: &'a str,
    pub client_id: &'a str,
    pub redirect_uri: &'a str,
    pub scopes: &'a [&'a str],
    pub state: &'a str,
}

impl AuthorizationRequest<'_> {
    /// Full URL to send the user agent to.
    pub fn build_url(&self) -> String {
        let separator = if self.authorize_url.contains('?') {
            '&'
        } else {
            '?'
        };

        format!(
            "{}{}response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.authorize_url,
            separator,
            urlencoding::encode(self.client_id),
            urlencoding::encode(self.redirect_uri),
            urlencoding::encode(&self.scopes.join(" ")),
            urlencoding::encode(self.state),
        )
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Exchange an authorization code for a token pair.
pub async fn exchange_code(
    http: &reqwest::Client,
    token_url: &str,
    code: &str,
    redirect_uri: &str,
    credentials: &ClientCredentials<'_>,
    auth: ClientAuth,
) -> Result<ProviderTokens, OAuthError> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("client_id", credentials.client_id),
    ];

    let mut request = http.post(token_url);
    match auth {
        ClientAuth::Basic => {
            request = request.basic_auth(credentials.client_id, Some(credentials.client_secret));
        }
        ClientAuth::RequestBody => form.push(("client_secret", credentials.client_secret)),
    }

    let response = request.form(&form).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(OAuthError::Status { status, body });
    }

    let tokens: TokenResponse = response
        .json()
        .await
        .map_err(|e| OAuthError::InvalidResponse(format!("token response: {}", e)))?;

    Ok(ProviderTokens {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    })
}

// ─── Signed State ────────────────────────────────────────────

/// Create a signed state value for the flow named `purpose`.
///
/// Format before encoding: `purpose|timestamp_hex|signature_hex`.
pub fn sign_state(purpose: &str, secret: &[u8]) -> Result<String, AppError> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    sign_state_at(purpose, timestamp, secret)
}

fn sign_state_at(purpose: &str, timestamp_ms: u128, secret: &[u8]) -> Result<String, AppError> {
    let payload = format!("{}|{:x}", purpose, timestamp_ms);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
}

/// Check that `state` was signed by us for `purpose` within `max_age`.
pub fn verify_state(state: &str, purpose: &str, secret: &[u8], max_age: Duration) -> bool {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    verify_state_at(state, purpose, secret, max_age, now_ms)
}

fn verify_state_at(
    state: &str,
    purpose: &str,
    secret: &[u8],
    max_age: Duration,
    now_ms: u128,
) -> bool {
    let Some(decoded) = URL_SAFE_NO_PAD
        .decode(state)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
    else {
        return false;
    };

    let parts: Vec<&str> = decoded.splitn(3, '|').collect();
    let [state_purpose, timestamp_hex, signature_hex] = parts[..] else {
        return false;
    };

    if state_purpose != purpose {
        tracing::warn!(expected = purpose, got = state_purpose, "OAuth state purpose mismatch");
        return false;
    }

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(format!("{}|{}", state_purpose, timestamp_hex).as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if !bool::from(expected.as_bytes().ct_eq(signature_hex.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return false;
    }

    let Ok(issued_ms) = u128::from_str_radix(timestamp_hex, 16) else {
        return false;
    };

    now_ms.saturating_sub(issued_ms) <= max_age.as_millis()
}
