// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitbit authorisation and data routes.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{FitbitStat, WellnessProvider};
use crate::routes::{passthrough, provider_auth_start, provider_callback, CallbackParams};
use crate::services::FitbitClient;
use crate::AppState;

pub const AUTH_SUCCESS: &str = "Fitbit auth success";

pub fn navigation_routes() -> Router<Arc<AppState>> {
    Router::new().route("/fitbit/auth", get(authorise))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/fitbit/callback", get(callback))
        .route("/fitbit", get(auth_success))
        .route("/fitbit/{stat}", get(stat_summary))
}

/// Optional day to fetch; defaults to today.
#[derive(Debug, Deserialize)]
pub struct DateParams {
    #[serde(default)]
    date: Option<NaiveDate>,
}

async fn authorise(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    provider_auth_start(&state, &state.fitbit_auth)
}

async fn callback(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    provider_callback(&state, &state.fitbit_auth, &user.id, params).await?;
    Ok(Redirect::temporary("/fitbit"))
}

async fn auth_success() -> &'static str {
    AUTH_SUCCESS
}

async fn stat_summary(
    State(state): State<Arc<AppState>>,
    Path(stat): Path<String>,
    Query(params): Query<DateParams>,
) -> Response {
    let Some(stat) = FitbitStat::parse(&stat) else {
        return String::new().into_response();
    };

    let date = params
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let tokens = state.tokens.get(WellnessProvider::Fitbit);
    let result = match FitbitClient::new(&state.http, &state.config, tokens.as_ref()) {
        Ok(client) => client.stat(stat, date).await,
        Err(e) => Err(e),
    };
    passthrough(result)
}
