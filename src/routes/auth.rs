// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google login, logout and the index page.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    routing::get,
    Extension, Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::session::{self, CurrentUser};
use crate::models::User;
use crate::routes::CallbackParams;
use crate::services::oauth::{sign_state, verify_state, STATE_MAX_AGE};
use crate::AppState;

const LOGIN_STATE_PURPOSE: &str = "login";

/// Routes reachable without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login))
        .route("/login/callback", get(login_callback))
}

/// Routes that need a session (guarded by the caller).
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new().route("/logout", get(logout))
}

#[derive(Template)]
#[template(path = "index_user.html")]
struct IndexTemplateUser<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Template)]
#[template(path = "index_anon.html")]
struct IndexTemplateAnon;

/// Index page: greeting and provider links, or a login link.
async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Html<String>> {
    let page = match session::current_user(&state, &jar).await? {
        Some(user) => render_greeting(&user)?,
        None => IndexTemplateAnon.render().map_err(render_error)?,
    };

    Ok(Html(page))
}

fn render_greeting(user: &User) -> Result<String> {
    IndexTemplateUser {
        name: &user.name,
        email: &user.email,
    }
    .render()
    .map_err(render_error)
}

fn render_error(err: askama::Error) -> AppError {
    AppError::Internal(anyhow::Error::new(err).context("failed rendering index page"))
}

/// Start login - redirect to the identity provider.
async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let oauth_state = sign_state(LOGIN_STATE_PURPOSE, state.config.signing_key()?)?;
    let auth_url = state
        .identity
        .authorization_url(&state.config, &oauth_state)
        .await?;

    tracing::info!("Starting login, redirecting to identity provider");
    Ok(Redirect::temporary(&auth_url))
}

/// Login callback - exchange code, verify email, store user, start session.
///
/// The provider must echo the signed `state` issued by [`login`]; a bare
/// `?code=...` without it is answered 400 before any provider call.
async fn login_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from identity provider");
        return Err(AppError::BadRequest("Login was not completed.".to_string()));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code.".to_string()))?;

    let key = state.config.signing_key()?;
    let state_ok = params
        .state
        .as_deref()
        .is_some_and(|s| verify_state(s, LOGIN_STATE_PURPOSE, key, STATE_MAX_AGE));
    if !state_ok {
        return Err(AppError::BadRequest("Invalid login state.".to_string()));
    }

    let identity = state.identity.complete_login(&state.config, &code).await?;

    let user = User::new(identity.subject, identity.given_name, identity.email);
    if state.users.get(&user.id).await?.is_none() {
        state.users.create(&user).await?;
    }

    let jar = session::login(jar, &user, &state.config)?;
    Ok((jar, Redirect::temporary("/")))
}

/// Logout - end the session. Provider tokens are shared and survive.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    tracing::info!(user_id = %user.id, "User logged out");

    (session::logout(jar, &state.config), Redirect::temporary("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_contains_name_and_email() {
        let page = render_greeting(&User::new("1", "Ada", "ada@example.com")).unwrap();
        assert!(page.contains("Welcome to MyData Storage Platform, Ada!"));
        assert!(page.contains("Email: ada@example.com"));
        assert!(page.contains("href=\"/logout\""));
    }

    #[test]
    fn test_greeting_escapes_markup() {
        let page = render_greeting(&User::new("1", "<script>", "a&b@example.com")).unwrap();
        assert!(page.contains("&#60;script&#62;") || page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("a&#38;b@example.com") || page.contains("a&amp;b@example.com"));
    }

    #[test]
    fn test_anonymous_page_links_to_login() {
        let page = IndexTemplateAnon.render().unwrap();
        assert!(page.contains(r#"href="/login""#));
    }
}
