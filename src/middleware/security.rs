// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response hardening headers.
//!
//! Pages are plain server-rendered HTML with no scripts or styles, and the
//! data routes pass provider JSON straight through, so both get a locked
//! down CSP. Nothing is cacheable: every page depends on the session.

use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

const HTML_CSP: &str = "default-src 'none'; img-src 'self'; frame-ancestors 'none'; \
                        form-action 'self'; base-uri 'none'";
const DATA_CSP: &str = "default-src 'none'; frame-ancestors 'none'";
const HSTS: &str = "max-age=31536000; includeSubDomains";

/// Which optional headers the deployment allows.
#[derive(Debug, Clone, Copy)]
pub struct SecurityPolicy {
    /// Only sent when the app is served over https.
    pub hsts: bool,
}

impl SecurityPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            hsts: config.cookie_secure(),
        }
    }
}

pub async fn add_security_headers(
    State(policy): State<SecurityPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"));

    let headers = response.headers_mut();
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(if is_html { HTML_CSP } else { DATA_CSP }),
    );
    // Provider redirects carry callback URLs with codes.
    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if policy.hsts {
        headers.insert(header::STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(HSTS));
    }

    response
}
