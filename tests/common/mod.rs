// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test harness: an in-process stand-in for Google, Oura and Fitbit,
//! plus helpers to build the app against it.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Form, Path, Request, State},
    http::{header, HeaderMap, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{self, post},
    Json, Router,
};
use mydata_platform::config::Config;
use mydata_platform::db::UserStore;
use mydata_platform::middleware::session::{create_session_token, SESSION_COOKIE};
use mydata_platform::models::User;
use mydata_platform::routes::create_router;
use mydata_platform::services::oauth::sign_state;
use mydata_platform::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded state of the fake providers.
pub struct Stub {
    pub base_url: String,
    requests: AtomicUsize,
    token_grants: AtomicUsize,
    userinfo: Mutex<Value>,
    paths: Mutex<Vec<String>>,
}

impl Stub {
    /// Number of requests the app has sent upstream.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Paths (with query) of every upstream request, in order.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    /// Replace the userinfo document returned by the identity provider.
    pub fn set_userinfo(&self, value: Value) {
        *self.userinfo.lock().unwrap() = value;
    }
}

pub fn verified_userinfo(sub: &str, name: &str, email: &str) -> Value {
    json!({
        "sub": sub,
        "email": email,
        "email_verified": true,
        "given_name": name,
        "name": format!("{name} Lovelace"),
    })
}

/// Start the fake providers on an ephemeral port.
pub async fn start_stub() -> Arc<Stub> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let stub = Arc::new(Stub {
        base_url: base_url.clone(),
        requests: AtomicUsize::new(0),
        token_grants: AtomicUsize::new(0),
        userinfo: Mutex::new(verified_userinfo("google-sub-1", "Ada", "ada@example.com")),
        paths: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route(
            "/google/.well-known/openid-configuration",
            routing::get(discovery),
        )
        .route(
            "/google/slow/.well-known/openid-configuration",
            routing::get(slow_discovery),
        )
        .route("/google/token", post(google_token))
        .route("/google/userinfo", routing::get(google_userinfo))
        .route("/oura/oauth/token", post(oura_token))
        .route("/oura/v1/{endpoint}", routing::get(oura_data))
        .route("/fitbit/oauth2/token", post(fitbit_token))
        .route(
            "/fitbit/api/1/user/-/sleep/date/{file}",
            routing::get(fitbit_sleep),
        )
        .layer(middleware::from_fn_with_state(stub.clone(), record))
        .with_state(stub.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    stub
}

async fn record(State(stub): State<Arc<Stub>>, request: Request, next: Next) -> Response {
    stub.requests.fetch_add(1, Ordering::SeqCst);
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.to_string())
        .unwrap_or_default();
    stub.paths.lock().unwrap().push(path);
    next.run(request).await
}

async fn discovery(State(stub): State<Arc<Stub>>) -> Json<Value> {
    let base = &stub.base_url;
    Json(json!({
        "issuer": "https://accounts.example.com",
        "authorization_endpoint": format!("{base}/google/authorize"),
        "token_endpoint": format!("{base}/google/token"),
        "userinfo_endpoint": format!("{base}/google/userinfo"),
    }))
}

async fn slow_discovery(state: State<Arc<Stub>>) -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    discovery(state).await
}

fn has_basic_auth(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h.starts_with("Basic "))
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn google_token(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    if !has_basic_auth(&headers) || form.get("code").map(String::as_str) == Some("bad") {
        let body = Json(json!({"error": "invalid_grant"}));
        return (StatusCode::BAD_REQUEST, body).into_response();
    }
    Json(json!({"access_token": "google-access", "token_type": "Bearer"})).into_response()
}

async fn google_userinfo(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Response {
    if bearer(&headers).as_deref() != Some("google-access") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(stub.userinfo.lock().unwrap().clone()).into_response()
}

fn grant(stub: &Stub, provider: &str) -> Json<Value> {
    let n = stub.token_grants.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "access_token": format!("{provider}-access-{n}"),
        "refresh_token": format!("{provider}-refresh-{n}"),
        "token_type": "Bearer",
        "expires_in": 86400,
    }))
}

/// Oura expects the client secret in the form body.
async fn oura_token(
    State(stub): State<Arc<Stub>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let bad_code = form.get("code").map(String::as_str) == Some("bad");
    if form.get("client_secret").is_none() || bad_code {
        let body = Json(json!({"error": "invalid_client"}));
        return (StatusCode::UNAUTHORIZED, body).into_response();
    }
    grant(&stub, "oura").into_response()
}

async fn oura_data(Path(endpoint): Path<String>, headers: HeaderMap, uri: Uri) -> Response {
    match bearer(&headers) {
        Some(token) if token != "expired" => Json(json!({
            "endpoint": endpoint,
            "token": token,
            "query": uri.query().unwrap_or(""),
        }))
        .into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Fitbit expects HTTP Basic client authentication.
async fn fitbit_token(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Response {
    if !has_basic_auth(&headers) {
        let body = Json(json!({"errors": ["invalid_client"]}));
        return (StatusCode::UNAUTHORIZED, body).into_response();
    }
    grant(&stub, "fitbit").into_response()
}

async fn fitbit_sleep(Path(file): Path<String>, headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(token) if token != "expired" => Json(json!({
            "sleep": [],
            "date": file.trim_end_matches(".json"),
            "token": token,
        }))
        .into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

// ─── App Construction ────────────────────────────────────────

/// Build the app against the stub, letting the caller tweak the config.
pub async fn create_test_app_with(
    stub: &Stub,
    adjust: impl FnOnce(&mut Config),
) -> (Router, Arc<AppState>) {
    let mut config = Config::test_default().with_upstream_base(&stub.base_url);
    adjust(&mut config);

    let users = UserStore::connect("sqlite::memory:")
        .await
        .expect("open in-memory store");
    users.create_tables().await.expect("create tables");

    let state = Arc::new(AppState::new(config, users).expect("build app state"));
    (create_router(state.clone()), state)
}

pub async fn create_test_app(stub: &Stub) -> (Router, Arc<AppState>) {
    create_test_app_with(stub, |_| {}).await
}

/// Store `user` and return a `Cookie` header value carrying their session.
pub async fn session_cookie(state: &AppState, user: &User) -> String {
    state.users.create(user).await.expect("create user");
    let key = state.config.signing_key().expect("signing key");
    let token = create_session_token(&user.id, key).expect("session token");
    format!("{SESSION_COOKIE}={token}")
}

pub async fn logged_in(state: &AppState) -> (User, String) {
    let user = User::new("google-sub-1", "Ada", "ada@example.com");
    let cookie = session_cookie(state, &user).await;
    (user, cookie)
}

/// A valid OAuth `state` value for `purpose`.
pub fn valid_state(state: &AppState, purpose: &str) -> String {
    sign_state(purpose, state.config.signing_key().unwrap()).unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

pub fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

/// Extract the query parameter `name` from a redirect URL.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    let value = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)?
        .1;
    urlencoding::decode(value).ok().map(|v| v.into_owned())
}
