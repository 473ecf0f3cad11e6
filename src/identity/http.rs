use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::Principal;
use crate::config::IdentityConfig;

use super::{IdentityError, SessionResolver};

/// Session payload returned by the provider's user-resolution endpoint.
#[derive(Debug, Deserialize)]
struct SessionPayload {
    id: Uuid,
    email: Option<String>,
}

/// HTTP client for the hosted identity provider.
///
/// Each resolution is a single GET of the provider's user endpoint with
/// the caller's bearer token, bounded by the configured timeout.
pub struct HttpSessionResolver {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    timeout: Duration,
}

impl HttpSessionResolver {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            timeout: config.timeout(),
        }
    }
}

#[async_trait]
impl SessionResolver for HttpSessionResolver {
    async fn resolve_session(&self, token: &str) -> Result<Option<Principal>, IdentityError> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IdentityError::Timeout
                } else {
                    IdentityError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();

        if status == StatusCode::OK {
            let session: SessionPayload = response
                .json()
                .await
                .map_err(|e| IdentityError::MalformedPayload(e.to_string()))?;

            return Ok(Some(Principal {
                id: session.id,
                email: session.email,
            }));
        }

        // The provider rejected the token; which way it was bad is not
        // something callers get to learn.
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status == StatusCode::NOT_FOUND
        {
            return Ok(None);
        }

        Err(IdentityError::UnexpectedResponse(format!(
            "status {}",
            status.as_u16()
        )))
    }
}
