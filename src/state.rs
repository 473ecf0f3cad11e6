use anyhow::Context;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::identity::{HttpSessionResolver, SessionResolver};
use crate::limiter::{RateLimiter, RateLimitSettings};
use crate::store::{ClientDirectory, PgClientDirectory};

/// Shared application state: the gate's collaborators behind their trait
/// seams, plus the limiter that owns all counter state. Everything is
/// injected here so tests can stand up a full router with fakes.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn SessionResolver>,
    pub directory: Arc<dyn ClientDirectory>,
    pub limiter: Arc<RateLimiter>,
    pub limits: RateLimitSettings,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn SessionResolver>,
        directory: Arc<dyn ClientDirectory>,
        limits: RateLimitSettings,
    ) -> Self {
        Self {
            identity,
            directory,
            limiter: Arc::new(RateLimiter::new()),
            limits,
        }
    }

    /// Production wiring: HTTP identity provider and Postgres directory.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let identity = HttpSessionResolver::new(&config.identity);
        let directory = PgClientDirectory::connect_lazy(&database_url, &config.database)
            .context("failed to configure database pool")?;

        Ok(Self::new(
            Arc::new(identity),
            Arc::new(directory),
            config.api.limits(),
        ))
    }
}
