use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// What the caller learns about any credential failure. Which way the
/// credential was bad stays in the operator logs.
const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing credentials";

/// Authentication middleware: extracts the bearer token, resolves it with
/// the identity provider, and injects the resulting [`Principal`] into the
/// request.
///
/// A missing or malformed Authorization header is rejected before any
/// provider call. Provider failures and timeouts deny the request rather
/// than letting it through (fail closed).
///
/// [`Principal`]: crate::auth::Principal
pub async fn authenticate_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(|reason| {
        tracing::warn!("authentication rejected before provider call: {}", reason);
        ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
    })?;

    let principal = state
        .identity
        .resolve_session(&token)
        .await
        .map_err(|e| {
            tracing::error!("session resolution failed: {}", e);
            ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
        })?
        .ok_or_else(|| {
            tracing::warn!("identity provider rejected bearer token");
            ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
        })?;

    tracing::debug!("authenticated principal '{}'", principal.id);

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or("missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Authorization header is not valid UTF-8")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?;

    if token.trim().is_empty() {
        return Err("empty bearer token");
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header_rejected() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let headers = headers_with_authorization("Basic dXNlcjpwYXNz");
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn test_empty_token_rejected() {
        let headers = headers_with_authorization("Bearer ");
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn test_valid_bearer_token_extracted() {
        let headers = headers_with_authorization("Bearer session-token-123");
        assert_eq!(
            extract_bearer_token(&headers).unwrap(),
            "session-token-123"
        );
    }
}
