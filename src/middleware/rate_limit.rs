use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::limiter::actions;
use crate::state::AppState;

/// Per-principal budget over the gated API surface, under the shared
/// "api" action. Runs after authentication and any ownership check; the
/// denied request is itself counted, so hammering a closed window never
/// resets it early.
pub async fn rate_limit_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.limits.enabled {
        return next.run(request).await;
    }

    let Some(principal) = request.extensions().get::<Principal>() else {
        return ApiError::internal_server_error("authentication required before rate limiting")
            .into_response();
    };

    let policy = state.limits.api;
    let decision = state
        .limiter
        .check(&principal.id.to_string(), actions::API, policy);

    if !decision.allowed {
        // Recoverable by waiting; not an anomaly worth more than debug.
        tracing::debug!(
            "rate limit exceeded for principal '{}' (action '{}')",
            principal.id,
            actions::API
        );
        return ApiError::too_many_requests("Rate limit exceeded", decision.reset_in)
            .into_response();
    }

    let remaining = decision.remaining;
    let reset_secs = decision.reset_in.as_millis().div_ceil(1000) as u64;

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from(remaining),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-reset"),
        HeaderValue::from(reset_secs),
    );

    response
}
