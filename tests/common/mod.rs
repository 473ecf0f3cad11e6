#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;
use uuid::Uuid;

use coach_api::auth::Principal;
use coach_api::identity::{IdentityError, SessionResolver};
use coach_api::limiter::{RateLimitPolicy, RateLimitSettings};
use coach_api::routes::app;
use coach_api::state::AppState;
use coach_api::store::InMemoryClientDirectory;

/// Identity provider fake backed by a token table. Counts provider calls
/// so tests can assert the gate never phones out for requests it should
/// reject locally.
pub struct FakeIdentity {
    sessions: HashMap<String, Principal>,
    failing: bool,
    calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            failing: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider that errors on every call, as if unreachable.
    pub fn unreachable() -> Self {
        Self {
            sessions: HashMap::new(),
            failing: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_session(mut self, token: &str, principal: Principal) -> Self {
        self.sessions.insert(token.to_string(), principal);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionResolver for FakeIdentity {
    async fn resolve_session(&self, token: &str) -> Result<Option<Principal>, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            return Err(IdentityError::Unreachable("connection refused".into()));
        }

        Ok(self.sessions.get(token).cloned())
    }
}

pub fn principal(id: Uuid) -> Principal {
    Principal { id, email: None }
}

pub fn principal_with_email(id: Uuid, email: &str) -> Principal {
    Principal {
        id,
        email: Some(email.to_string()),
    }
}

fn policy(max_requests: u32, window_secs: u64) -> RateLimitPolicy {
    RateLimitPolicy {
        max_requests,
        window: Duration::from_secs(window_secs),
    }
}

/// Rate limiting off; the default for tests not exercising budgets.
pub fn unlimited() -> RateLimitSettings {
    RateLimitSettings {
        enabled: false,
        api: policy(1000, 60),
        chat: policy(1000, 60),
        analyze: policy(1000, 60),
    }
}

/// Rate limiting on with the given budget for the shared api action.
pub fn api_budget(max_requests: u32) -> RateLimitSettings {
    RateLimitSettings {
        enabled: true,
        api: policy(max_requests, 60),
        chat: policy(20, 60),
        analyze: policy(10, 60),
    }
}

pub fn test_app(
    identity: Arc<FakeIdentity>,
    directory: InMemoryClientDirectory,
    limits: RateLimitSettings,
) -> Router {
    app(AppState::new(identity, Arc::new(directory), limits))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

pub fn get_with_token(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("json body")
}
