use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::config::DatabaseConfig;

use super::{ClientDirectory, ClientRecord, DirectoryError};

/// Postgres-backed directory over the platform's `clients` table.
pub struct PgClientDirectory {
    pool: PgPool,
}

impl PgClientDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a directory over a lazily-connected pool; the first lookup
    /// establishes the connection, so the server can start before the
    /// database is reachable and still fail closed per request.
    pub fn connect_lazy(url: &str, config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy(url)?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ClientDirectory for PgClientDirectory {
    async fn client_record(&self, client_id: Uuid) -> Result<Option<ClientRecord>, DirectoryError> {
        let row = sqlx::query("SELECT coach_id, user_id FROM clients WHERE id = $1")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| ClientRecord {
            coach_id: r.get("coach_id"),
            user_id: r.get("user_id"),
        }))
    }

    async fn ping(&self) -> Result<(), DirectoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

fn map_sqlx_error(e: sqlx::Error) -> DirectoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            DirectoryError::Unavailable(e.to_string())
        }
        _ => DirectoryError::Query(e.to_string()),
    }
}
