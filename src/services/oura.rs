// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Oura API client.
//!
//! Handles:
//! - OAuth authorization for the Oura cloud
//! - User info and daily summaries (readiness, sleep, bedtime, activity)
//!
//! Summaries are passed through to the caller unparsed.

use crate::config::Config;
use crate::models::{DateRange, OuraStat, ProviderTokens, WellnessProvider};
use crate::services::oauth::ClientAuth;
use crate::services::wellness::{fetch_text, AuthSettings, ClientError, WellnessAuth};

pub const OURA_SCOPES: [&str; 3] = ["email", "personal", "daily"];
pub const OURA_CALLBACK_PATH: &str = "/callback";

/// OAuth flow for Oura (client credentials sent in the request body).
pub fn oura_auth(config: &Config, http: reqwest::Client) -> WellnessAuth {
    WellnessAuth::from_settings(
        config,
        http,
        AuthSettings {
            provider: WellnessProvider::Oura,
            client_id: &config.oura_client_id,
            client_secret: &config.oura_client_secret,
            authorize_url: &config.oura_auth_url,
            token_url: &config.oura_token_url,
            callback_path: OURA_CALLBACK_PATH,
            scopes: &OURA_SCOPES,
            client_auth: ClientAuth::RequestBody,
        },
    )
}

/// Per-request Oura data client.
pub struct OuraClient {
    http: reqwest::Client,
    api_url: String,
    access_token: String,
}

impl OuraClient {
    /// Build a client from the user's stored tokens, falling back to the
    /// configured personal access token.
    pub fn new(
        http: &reqwest::Client,
        config: &Config,
        tokens: Option<&ProviderTokens>,
    ) -> Result<Self, ClientError> {
        let access_token = tokens
            .map(|t| t.access_token.clone())
            .or_else(|| config.oura_personal_token.clone())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::MissingCredentials {
                provider: WellnessProvider::Oura,
                reason: "no access token; authorise Oura first".to_string(),
            })?;

        Ok(Self {
            http: http.clone(),
            api_url: config.oura_api_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    async fn get(&self, path: &str, range: &DateRange) -> Result<String, ClientError> {
        let url = format!("{}{}", self.api_url, path);
        fetch_text(
            &self.http,
            WellnessProvider::Oura,
            &url,
            &self.access_token,
            &range.query_pairs(),
        )
        .await
    }

    /// Profile of the authorised Oura user.
    pub async fn user_info(&self) -> Result<String, ClientError> {
        self.get("/userinfo", &DateRange::default()).await
    }

    pub async fn readiness_summary(&self, range: &DateRange) -> Result<String, ClientError> {
        self.get(OuraStat::Readiness.endpoint(), range).await
    }

    pub async fn sleep_summary(&self, range: &DateRange) -> Result<String, ClientError> {
        self.get(OuraStat::Sleep.endpoint(), range).await
    }

    pub async fn bedtime_summary(&self, range: &DateRange) -> Result<String, ClientError> {
        self.get(OuraStat::Bedtime.endpoint(), range).await
    }

    pub async fn activity_summary(&self, range: &DateRange) -> Result<String, ClientError> {
        self.get(OuraStat::Activity.endpoint(), range).await
    }

    /// Fetch the summary for `stat`.
    pub async fn summary(&self, stat: OuraStat, range: &DateRange) -> Result<String, ClientError> {
        match stat {
            OuraStat::Readiness => self.readiness_summary(range).await,
            OuraStat::Sleep => self.sleep_summary(range).await,
            OuraStat::Bedtime => self.bedtime_summary(range).await,
            OuraStat::Activity => self.activity_summary(range).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_without_tokens_or_personal_token_fails() {
        let config = Config::test_default();
        let http = reqwest::Client::new();

        let result = OuraClient::new(&http, &config, None);
        assert!(matches!(
            result,
            Err(ClientError::MissingCredentials {
                provider: WellnessProvider::Oura,
                ..
            })
        ));
    }

    #[test]
    fn new_prefers_user_tokens_over_personal_token() {
        let mut config = Config::test_default();
        config.oura_personal_token = Some("personal".to_string());
        let http = reqwest::Client::new();
        let tokens = ProviderTokens {
            access_token: "user".to_string(),
            refresh_token: None,
        };

        let client = OuraClient::new(&http, &config, Some(&tokens)).unwrap();
        assert_eq!(client.access_token, "user");

        let fallback = OuraClient::new(&http, &config, None).unwrap();
        assert_eq!(fallback.access_token, "personal");
    }

    #[test]
    fn authorization_url_uses_oura_callback() {
        let config = Config::test_default();
        let auth = oura_auth(&config, reqwest::Client::new());

        assert_eq!(auth.redirect_uri(), "http://localhost:5000/callback");
        let url = auth.authorization_url("state").unwrap();
        assert!(url.starts_with(crate::config::OURA_AUTH_URL));
        assert!(url.contains("client_id=oura_client_id"));
    }

    #[test]
    fn authorization_url_requires_client_id() {
        let mut config = Config::test_default();
        config.oura_client_id = None;
        let auth = oura_auth(&config, reqwest::Client::new());

        assert!(auth.authorization_url("state").is_err());
    }
}
