use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Method enforcement runs before authentication, so a request with the
/// wrong verb gets its 405 without a token ever being inspected. CORS
/// preflights never reach this point; the CORS layer answers them first.
pub async fn allow(
    allowed: &'static [Method],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !allowed.contains(request.method()) {
        return Err(ApiError::method_not_allowed("Method not allowed"));
    }

    Ok(next.run(request).await)
}

const GET_ONLY: &[Method] = &[Method::GET];

/// The gated surface is read-only today, so GET is the only verb any
/// route allows.
pub async fn allow_get(request: Request, next: Next) -> Result<Response, ApiError> {
    allow(GET_ONLY, request, next).await
}
