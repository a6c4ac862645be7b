// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitbit Web API client (OAuth authorization and sleep logs).

use crate::config::Config;
use crate::models::{FitbitStat, ProviderTokens, WellnessProvider};
use crate::services::oauth::ClientAuth;
use crate::services::wellness::{fetch_text, AuthSettings, ClientError, WellnessAuth};
use chrono::NaiveDate;

pub const FITBIT_SCOPES: [&str; 9] = [
    "activity",
    "heartrate",
    "location",
    "nutrition",
    "profile",
    "settings",
    "sleep",
    "social",
    "weight",
];
pub const FITBIT_CALLBACK_PATH: &str = "/fitbit/callback";

/// OAuth flow for Fitbit (client credentials sent as HTTP Basic auth).
pub fn fitbit_auth(config: &Config, http: reqwest::Client) -> WellnessAuth {
    WellnessAuth::from_settings(
        config,
        http,
        AuthSettings {
            provider: WellnessProvider::Fitbit,
            client_id: &config.fitbit_client_id,
            client_secret: &config.fitbit_client_secret,
            authorize_url: &config.fitbit_auth_url,
            token_url: &config.fitbit_token_url,
            callback_path: FITBIT_CALLBACK_PATH,
            scopes: &FITBIT_SCOPES,
            client_auth: ClientAuth::Basic,
        },
    )
}

/// Per-request Fitbit data client.
pub struct FitbitClient {
    http: reqwest::Client,
    api_url: String,
    access_token: String,
}

impl FitbitClient {
    pub fn new(
        http: &reqwest::Client,
        config: &Config,
        tokens: Option<&ProviderTokens>,
    ) -> Result<Self, ClientError> {
        let missing = |reason: &str| ClientError::MissingCredentials {
            provider: WellnessProvider::Fitbit,
            reason: reason.to_string(),
        };

        Config::require(&config.fitbit_client_id, "FITBIT_CLIENT_ID")
            .map_err(|e| missing(&e.to_string()))?;

        let tokens = tokens.ok_or_else(|| missing("no access token; authorise Fitbit first"))?;

        Ok(Self {
            http: http.clone(),
            api_url: config.fitbit_api_url.trim_end_matches('/').to_string(),
            access_token: tokens.access_token.clone(),
        })
    }

    /// Sleep log for `date` (the "current user" of the token).
    pub async fn get_sleep(&self, date: NaiveDate) -> Result<String, ClientError> {
        let url = format!(
            "{}/1/user/-/sleep/date/{}.json",
            self.api_url,
            date.format("%Y-%m-%d")
        );

        fetch_text(
            &self.http,
            WellnessProvider::Fitbit,
            &url,
            &self.access_token,
            &[],
        )
        .await
    }

    pub async fn stat(&self, stat: FitbitStat, date: NaiveDate) -> Result<String, ClientError> {
        match stat {
            FitbitStat::Sleep => self.get_sleep(date).await,
        }
    }
}
