// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! MyData Storage Platform
//!
//! Signs users in with Google and proxies their wellness statistics from
//! Oura and Fitbit using OAuth tokens obtained on their behalf.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use anyhow::Context;
use config::Config;
use db::UserStore;
use services::{fitbit_auth, oura_auth, IdentityClient, TokenVault, WellnessAuth};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
    pub identity: IdentityClient,
    pub oura_auth: WellnessAuth,
    pub fitbit_auth: WellnessAuth,
    pub tokens: TokenVault,
    /// HTTP client for wellness data calls (carries the upstream timeout)
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, users: UserStore) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("failed building provider HTTP client")?;

        Ok(Self {
            identity: IdentityClient::new(&config)?,
            oura_auth: oura_auth(&config, http.clone()),
            fitbit_auth: fitbit_auth(&config, http.clone()),
            tokens: TokenVault::new(),
            http,
            users,
            config,
        })
    }
}
