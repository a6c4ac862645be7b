// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Status codes and bodies produced by `AppError`.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use mydata_platform::config::ConfigError;
use mydata_platform::error::AppError;

async fn render(error: AppError) -> (StatusCode, String) {
    let response = error.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_client_errors_keep_their_message() {
    assert_eq!(
        render(AppError::EmailNotVerified).await,
        (
            StatusCode::BAD_REQUEST,
            "User email not available or not verified by Google.".to_string()
        )
    );
    assert_eq!(
        render(AppError::BadRequest("Missing authorization code.".into())).await,
        (
            StatusCode::BAD_REQUEST,
            "Missing authorization code.".to_string()
        )
    );
    assert_eq!(render(AppError::Unauthorized).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_timeout_maps_to_504() {
    assert_eq!(
        render(AppError::UpstreamTimeout).await,
        (
            StatusCode::GATEWAY_TIMEOUT,
            "Request timeout occurred".to_string()
        )
    );
}

#[tokio::test]
async fn test_provider_authorisation_failure_hides_detail() {
    let (status, body) = render(AppError::ProviderAuthorization(
        "token endpoint returned 401".into(),
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "Authorisation needed for platform usage");
}

#[tokio::test]
async fn test_internal_failures_hide_detail() {
    let errors = vec![
        AppError::Upstream("discovery returned status 404".into()),
        AppError::Database("disk I/O error".into()),
        AppError::Config(ConfigError::Missing("GOOGLE_CLIENT_ID")),
        AppError::Internal(anyhow::anyhow!("boom")),
    ];

    for error in errors {
        let (status, body) = render(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error occurred");
    }
}
