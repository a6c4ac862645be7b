// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cookie sessions and the guards that protect routes.
//!
//! The session cookie carries an HS256 JWT whose subject is the user id.
//! A valid token only counts as a session if the user row still exists.

use crate::config::Config;
use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub const SESSION_COOKIE: &str = "mydata_session";

/// Session lifetime (30 days).
const SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id from the identity provider)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// User attached to a request by the session guards.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Create a signed session token for `user_id`.
pub fn create_session_token(user_id: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now as usize,
        exp: (now + SESSION_TTL_SECS) as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Validate a session token and return the user id it names.
pub fn decode_session_token(token: &str, signing_key: &[u8]) -> Option<String> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims.sub)
}

fn session_cookie(config: &Config, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure())
        .build()
}

/// Begin a session for `user`.
pub fn login(jar: CookieJar, user: &User, config: &Config) -> Result<CookieJar, AppError> {
    let token = create_session_token(&user.id, config.signing_key()?)?;

    let mut cookie = session_cookie(config, token);
    cookie.set_max_age(time::Duration::seconds(SESSION_TTL_SECS as i64));

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(jar.add(cookie))
}

/// End the session. The removal cookie repeats the creation attributes.
pub fn logout(jar: CookieJar, config: &Config) -> CookieJar {
    jar.remove(session_cookie(config, String::new()))
}

/// User loader: look up the session's user in the store.
pub async fn resolve(state: &AppState, user_id: &str) -> Result<Option<User>, AppError> {
    state.users.get(user_id).await
}

/// Current user for this request, if the session is valid.
pub async fn current_user(state: &AppState, jar: &CookieJar) -> Result<Option<User>, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    // Without a key no session can have been issued.
    let Ok(key) = state.config.signing_key() else {
        return Ok(None);
    };

    match decode_session_token(cookie.value(), key) {
        Some(user_id) => resolve(state, &user_id).await,
        None => Ok(None),
    }
}

/// Guard for data routes: no session → 401.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match current_user(&state, &jar).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(None) => AppError::Unauthorized.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Guard for browser navigation routes: no session → redirect to `/login`.
pub async fn require_session_or_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match current_user(&state, &jar).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(None) => Redirect::temporary("/login").into_response(),
        Err(e) => e.into_response(),
    }
}
