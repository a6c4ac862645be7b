// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pieces shared by the wellness provider clients.

use crate::config::{Config, ConfigError};
use crate::error::AppError;
use crate::models::{ProviderTokens, WellnessProvider};
use crate::services::oauth::{self, AuthorizationRequest, ClientAuth, ClientCredentials};

/// Message returned when a data fetch fails for any reason.
pub const FETCH_FAILED: &str = "Something went wrong, make sure you have authorised first.";

/// Data client construction or fetch failure.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No usable credentials for this provider (not authorised, or app not configured).
    #[error("missing {provider} credentials: {reason}")]
    MissingCredentials {
        provider: WellnessProvider,
        reason: String,
    },

    #[error("{provider} request failed: {source}")]
    Request {
        provider: WellnessProvider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}")]
    Status {
        provider: WellnessProvider,
        status: u16,
    },
}

impl ClientError {
    /// Fixed, user-facing text for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::MissingCredentials { provider, .. } => format!(
                "Make sure you have provided needed credentials for {} client",
                provider.display_name()
            ),
            ClientError::Request { .. } | ClientError::Status { .. } => FETCH_FAILED.to_string(),
        }
    }
}

/// Authorization-code flow against one wellness provider.
#[derive(Clone)]
pub struct WellnessAuth {
    provider: WellnessProvider,
    http: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    authorize_url: String,
    token_url: String,
    redirect_uri: String,
    scopes: &'static [&'static str],
    client_auth: ClientAuth,
}

/// Static description of a provider's OAuth settings.
pub(crate) struct AuthSettings<'a> {
    pub provider: WellnessProvider,
    pub client_id: &'a Option<String>,
    pub client_secret: &'a Option<String>,
    pub authorize_url: &'a str,
    pub token_url: &'a str,
    pub callback_path: &'a str,
    pub scopes: &'static [&'static str],
    pub client_auth: ClientAuth,
}

impl WellnessAuth {
    pub(crate) fn from_settings(
        config: &Config,
        http: reqwest::Client,
        settings: AuthSettings<'_>,
    ) -> Self {
        Self {
            provider: settings.provider,
            http,
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            authorize_url: settings.authorize_url.to_string(),
            token_url: settings.token_url.to_string(),
            redirect_uri: config.url_for(settings.callback_path),
            scopes: settings.scopes,
            client_auth: settings.client_auth,
        }
    }

    pub fn provider(&self) -> WellnessProvider {
        self.provider
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    fn client_id(&self) -> Result<&str, ConfigError> {
        Config::require(&self.client_id, client_id_var(self.provider))
    }

    /// URL of the provider's consent page.
    pub fn authorization_url(&self, state: &str) -> Result<String, ConfigError> {
        Ok(AuthorizationRequest {
            authorize_url: &self.authorize_url,
            client_id: self.client_id()?,
            redirect_uri: &self.redirect_uri,
            scopes: self.scopes,
            state,
        }
        .build_url())
    }

    /// Exchange the callback `code` for a token pair.
    ///
    /// Every failure, including missing app credentials, is reported as
    /// [`AppError::ProviderAuthorization`].
    pub async fn exchange(&self, code: &str) -> Result<ProviderTokens, AppError> {
        self.try_exchange(code)
            .await
            .map_err(|e| AppError::ProviderAuthorization(format!("{}: {:#}", self.provider, e)))
    }

    async fn try_exchange(&self, code: &str) -> anyhow::Result<ProviderTokens> {
        let credentials = ClientCredentials {
            client_id: self.client_id()?,
            client_secret: Config::require(
                &self.client_secret,
                client_secret_var(self.provider),
            )?,
        };

        let tokens = oauth::exchange_code(
            &self.http,
            &self.token_url,
            code,
            &self.redirect_uri,
            &credentials,
            self.client_auth,
        )
        .await?;

        Ok(tokens)
    }
}

fn client_id_var(provider: WellnessProvider) -> &'static str {
    match provider {
        WellnessProvider::Oura => "OURA_CLIENT_ID",
        WellnessProvider::Fitbit => "FITBIT_CLIENT_ID",
    }
}

fn client_secret_var(provider: WellnessProvider) -> &'static str {
    match provider {
        WellnessProvider::Oura => "OURA_CLIENT_SECRET",
        WellnessProvider::Fitbit => "FITBIT_CLIENT_SECRET",
    }
}

/// GET `url` with a bearer token and return the body verbatim.
pub(crate) async fn fetch_text(
    http: &reqwest::Client,
    provider: WellnessProvider,
    url: &str,
    access_token: &str,
    query: &[(&str, String)],
) -> Result<String, ClientError> {
    let response = http
        .get(url)
        .bearer_auth(access_token)
        .query(query)
        .send()
        .await
        .map_err(|source| ClientError::Request { provider, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(%provider, status = %status, body = %body, "Provider API error");
        return Err(ClientError::Status {
            provider,
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|source| ClientError::Request { provider, source })
}
