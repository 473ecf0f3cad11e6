//! Read-only access to the client records the ownership checks consult.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryClientDirectory;
pub use postgres::PgClientDirectory;

/// The two identities attached to a client record. The gate only ever
/// reads these fields; everything else about a client belongs to the
/// business handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientRecord {
    pub coach_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("directory query failed: {0}")]
    Query(String),
}

/// Lookup seam over the platform's client store.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Fetch the ownership fields for one client, `None` if no such
    /// client exists.
    async fn client_record(&self, client_id: Uuid) -> Result<Option<ClientRecord>, DirectoryError>;

    /// Cheap reachability probe for the health endpoint.
    async fn ping(&self) -> Result<(), DirectoryError>;
}
