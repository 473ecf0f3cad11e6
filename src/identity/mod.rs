//! Session resolution against the hosted identity provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::Principal;

pub mod http;

pub use http::HttpSessionResolver;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),

    #[error("identity provider request timed out")]
    Timeout,

    #[error("malformed session payload: {0}")]
    MalformedPayload(String),

    #[error("unexpected identity provider response: {0}")]
    UnexpectedResponse(String),
}

/// Resolves a bearer token to the principal it belongs to.
///
/// Implementations make one provider call per invocation; nothing is
/// cached, so a revoked session stops working on the very next request.
/// `Ok(None)` means the provider rejected the token; any `Err` is treated
/// by the gate exactly like a rejected token (fail closed).
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve_session(&self, token: &str) -> Result<Option<Principal>, IdentityError>;
}
