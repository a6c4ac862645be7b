// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Oura authorisation and data routes.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Router,
};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{DateRange, OuraStat, WellnessProvider};
use crate::routes::{passthrough, provider_auth_start, provider_callback, CallbackParams};
use crate::services::{ClientError, OuraClient};
use crate::AppState;

/// Consent redirects (guarded with a login redirect).
pub fn navigation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/oura/auth", get(authorise))
        .route("/authorise-oura", get(authorise))
}

/// Callback and data routes (guarded with 401).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/callback", get(callback))
        .route("/oura", get(user_info))
        .route("/oura/{stat}", get(stat_summary))
}

/// Redirect to the Oura authorization page.
async fn authorise(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    provider_auth_start(&state, &state.oura_auth)
}

/// Oura OAuth callback - store tokens, then show the user info.
async fn callback(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    provider_callback(&state, &state.oura_auth, &user.id, params).await?;
    Ok(Redirect::temporary("/oura"))
}

fn client(state: &AppState) -> std::result::Result<OuraClient, ClientError> {
    let tokens = state.tokens.get(WellnessProvider::Oura);
    OuraClient::new(&state.http, &state.config, tokens.as_ref())
}

/// Oura user info, passed through.
async fn user_info(State(state): State<Arc<AppState>>) -> Response {
    let result = match client(&state) {
        Ok(client) => client.user_info().await,
        Err(e) => Err(e),
    };
    passthrough(result)
}

/// Summary for one stat; unknown stats get an empty body.
async fn stat_summary(
    State(state): State<Arc<AppState>>,
    Path(stat): Path<String>,
    Query(range): Query<DateRange>,
) -> Response {
    let Some(stat) = OuraStat::parse(&stat) else {
        tracing::debug!(stat = %stat, "Unknown Oura stat");
        return String::new().into_response();
    };

    let result = match client(&state) {
        Ok(client) => client.summary(stat, &range).await,
        Err(e) => Err(e),
    };
    passthrough(result)
}
