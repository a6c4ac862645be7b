// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OpenID Connect login (authorization-code grant).
//!
//! Flow: discovery document → authorization redirect → code exchange →
//! userinfo. Failures are never retried; the handler turns them into a
//! fixed response.

use crate::config::Config;
use crate::error::AppError;
use crate::services::oauth::{
    self, AuthorizationRequest, ClientAuth, ClientCredentials, OAuthError,
};
use anyhow::Context;
use serde::Deserialize;

/// Scopes requested from the identity provider.
pub const LOGIN_SCOPES: [&str; 3] = ["openid", "email", "profile"];

/// Path the provider redirects back to.
pub const LOGIN_CALLBACK_PATH: &str = "/login/callback";

/// Endpoint URLs published in the provider's discovery document.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
}

/// Identity asserted by the provider after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub email: String,
    pub given_name: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Client for the identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    discovery_url: String,
    redirect_uri: String,
}

impl IdentityClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("failed building identity HTTP client")?;

        Ok(Self {
            http,
            discovery_url: config.google_discovery_url.clone(),
            redirect_uri: config.url_for(LOGIN_CALLBACK_PATH),
        })
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Fetch the discovery document.
    pub async fn discover(&self) -> Result<ProviderMetadata, AppError> {
        let response = self
            .http
            .get(&self.discovery_url)
            .send()
            .await
            .map_err(OAuthError::from)?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "discovery returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid discovery JSON: {}", e)))
    }

    /// Build the URL the user agent is redirected to for login.
    pub async fn authorization_url(
        &self,
        config: &Config,
        state: &str,
    ) -> Result<String, AppError> {
        let client_id = Config::require(&config.google_client_id, "GOOGLE_CLIENT_ID")?;
        let metadata = self.discover().await?;

        Ok(AuthorizationRequest {
            authorize_url: &metadata.authorization_endpoint,
            client_id,
            redirect_uri: &self.redirect_uri,
            scopes: &LOGIN_SCOPES,
            state,
        }
        .build_url())
    }

    /// Exchange `code` and fetch the user's profile.
    ///
    /// Fails with [`AppError::EmailNotVerified`] unless the provider asserts
    /// `email_verified = true`.
    pub async fn complete_login(
        &self,
        config: &Config,
        code: &str,
    ) -> Result<VerifiedIdentity, AppError> {
        let credentials = ClientCredentials {
            client_id: Config::require(&config.google_client_id, "GOOGLE_CLIENT_ID")?,
            client_secret: Config::require(&config.google_client_secret, "GOOGLE_CLIENT_SECRET")?,
        };

        let metadata = self.discover().await?;

        let tokens = oauth::exchange_code(
            &self.http,
            &metadata.token_endpoint,
            code,
            &self.redirect_uri,
            &credentials,
            ClientAuth::Basic,
        )
        .await?;

        let response = self
            .http
            .get(&metadata.userinfo_endpoint)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .map_err(OAuthError::from)?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "userinfo returned status {}",
                response.status()
            )));
        }

        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid userinfo JSON: {}", e)))?;

        verify_identity(info)
    }
}

fn verify_identity(info: UserInfo) -> Result<VerifiedIdentity, AppError> {
    if info.email_verified != Some(true) {
        tracing::warn!(subject = %info.sub, "Login rejected: email not verified");
        return Err(AppError::EmailNotVerified);
    }

    let email = info.email.ok_or(AppError::EmailNotVerified)?;
    let given_name = info.given_name.or(info.name).unwrap_or_else(|| email.clone());

    Ok(VerifiedIdentity {
        subject: info.sub,
        email,
        given_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(verified: Option<bool>) -> UserInfo {
        UserInfo {
            sub: "123".to_string(),
            email: Some("ada@example.com".to_string()),
            email_verified: verified,
            given_name: Some("Ada".to_string()),
            name: None,
        }
    }

    #[test]
    fn verify_identity_requires_verified_email() {
        assert!(matches!(
            verify_identity(info(Some(false))),
            Err(AppError::EmailNotVerified)
        ));
        assert!(matches!(
            verify_identity(info(None)),
            Err(AppError::EmailNotVerified)
        ));

        let identity = verify_identity(info(Some(true))).unwrap();
        assert_eq!(identity.subject, "123");
        assert_eq!(identity.given_name, "Ada");
    }

    #[test]
    fn verify_identity_without_email_is_rejected() {
        let mut missing = info(Some(true));
        missing.email = None;
        assert!(matches!(
            verify_identity(missing),
            Err(AppError::EmailNotVerified)
        ));
    }

    #[test]
    fn userinfo_deserializes_without_optional_claims() {
        let parsed: UserInfo = serde_json::from_str(r#"{"sub":"abc"}"#).unwrap();
        assert_eq!(parsed.sub, "abc");
        assert!(parsed.email_verified.is_none());
    }

    #[test]
    fn redirect_uri_points_at_login_callback() {
        let client = IdentityClient::new(&Config::test_default()).unwrap();
        assert_eq!(client.redirect_uri(), "http://localhost:5000/login/callback");
    }
}
