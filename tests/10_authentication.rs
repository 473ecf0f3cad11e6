mod common;

use std::sync::Arc;

use anyhow::Result;
use axum::http::{Request, StatusCode};
use axum::body::Body;
use uuid::Uuid;

use coach_api::store::InMemoryClientDirectory;

#[tokio::test]
async fn missing_token_rejected_without_provider_call() -> Result<()> {
    let identity = Arc::new(common::FakeIdentity::new());
    let app = common::test_app(
        identity.clone(),
        InMemoryClientDirectory::new(),
        common::unlimited(),
    );

    let res = common::send(&app, common::get("/api/auth/whoami")).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(res).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(identity.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn malformed_header_rejected_without_provider_call() -> Result<()> {
    let identity = Arc::new(common::FakeIdentity::new());
    let app = common::test_app(
        identity.clone(),
        InMemoryClientDirectory::new(),
        common::unlimited(),
    );

    for value in ["Token abc", "Bearer ", "bearer abc"] {
        let request = Request::builder()
            .method("GET")
            .uri("/api/auth/whoami")
            .header("authorization", value)
            .body(Body::empty())?;

        let res = common::send(&app, request).await;
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "header {:?} should be rejected",
            value
        );
    }

    assert_eq!(identity.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn unknown_token_rejected_after_one_provider_call() -> Result<()> {
    let identity = Arc::new(common::FakeIdentity::new());
    let app = common::test_app(
        identity.clone(),
        InMemoryClientDirectory::new(),
        common::unlimited(),
    );

    let res = common::send(&app, common::get_with_token("/api/auth/whoami", "nope")).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(identity.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn unreachable_provider_fails_closed() -> Result<()> {
    let identity = Arc::new(common::FakeIdentity::unreachable());
    let app = common::test_app(
        identity.clone(),
        InMemoryClientDirectory::new(),
        common::unlimited(),
    );

    let res = common::send(&app, common::get_with_token("/api/auth/whoami", "any")).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(res).await;
    // The caller cannot tell an outage from a bad token.
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn valid_token_resolves_principal() -> Result<()> {
    let user_id = Uuid::new_v4();
    let identity = Arc::new(
        common::FakeIdentity::new().with_session(
            "session-abc",
            common::principal_with_email(user_id, "coach@example.com"),
        ),
    );
    let app = common::test_app(
        identity.clone(),
        InMemoryClientDirectory::new(),
        common::unlimited(),
    );

    let res = common::send(
        &app,
        common::get_with_token("/api/auth/whoami", "session-abc"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = common::body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], user_id.to_string());
    assert_eq!(body["data"]["email"], "coach@example.com");
    assert_eq!(identity.calls(), 1);
    Ok(())
}
