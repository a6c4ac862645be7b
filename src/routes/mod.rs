// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod fitbit;
pub mod oura;

use crate::error::AppError;
use crate::middleware::security::{add_security_headers, SecurityPolicy};
use crate::middleware::{require_session, require_session_or_login};
use crate::services::oauth::{sign_state, verify_state, STATE_MAX_AGE};
use crate::services::{ClientError, WellnessAuth};
use crate::AppState;
use axum::{
    http::header,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(auth::public_routes());

    // Pages a browser navigates to: without a session, send the user to login
    let navigation_routes = auth::session_routes()
        .merge(oura::navigation_routes())
        .merge(fitbit::navigation_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session_or_login,
        ));

    // Provider callbacks and data routes: without a session, 401
    let protected_routes = oura::routes()
        .merge(fitbit::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(navigation_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(
            SecurityPolicy::from_config(&state.config),
            add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Query parameters of an OAuth provider redirect back to the app.
#[derive(Debug, serde::Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ─── Wellness Provider OAuth ─────────────────────────────────

/// Redirect to a wellness provider's consent page.
pub(crate) fn provider_auth_start(
    state: &AppState,
    auth: &WellnessAuth,
) -> crate::error::Result<Redirect> {
    let provider = auth.provider();
    let oauth_state = sign_state(provider.name(), state.config.signing_key()?)?;
    let auth_url = auth.authorization_url(&oauth_state)?;

    tracing::info!(%provider, "Starting provider authorisation");
    Ok(Redirect::temporary(&auth_url))
}

/// Handle a provider callback: verify state, exchange the code and store
/// the token pair, replacing any earlier pair for the provider. `user_id`
/// only names who completed the authorisation.
pub(crate) async fn provider_callback(
    state: &AppState,
    auth: &WellnessAuth,
    user_id: &str,
    params: CallbackParams,
) -> crate::error::Result<()> {
    let provider = auth.provider();

    if let Some(error) = params.error {
        return Err(AppError::ProviderAuthorization(format!(
            "{provider} returned error: {error}"
        )));
    }

    let key = state.config.signing_key()?;
    let state_ok = params
        .state
        .as_deref()
        .is_some_and(|s| verify_state(s, provider.name(), key, STATE_MAX_AGE));
    if !state_ok {
        return Err(AppError::ProviderAuthorization(format!(
            "{provider} callback with missing or invalid state"
        )));
    }

    let code = params.code.ok_or_else(|| {
        AppError::ProviderAuthorization(format!("{provider} callback without code"))
    })?;

    let tokens = auth.exchange(&code).await?;
    state.tokens.store(provider, tokens);

    tracing::info!(user_id, %provider, "Successful authorisation");
    Ok(())
}

/// Turn a data fetch result into a response: the upstream body verbatim,
/// or a fixed message when anything went wrong.
pub(crate) fn passthrough(result: Result<String, ClientError>) -> Response {
    match result {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Provider data request failed");
            e.user_message().into_response()
        }
    }
}
