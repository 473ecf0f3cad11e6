use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

use super::{ClientDirectory, ClientRecord, DirectoryError};

/// Map-backed directory for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryClientDirectory {
    records: RwLock<HashMap<Uuid, ClientRecord>>,
}

impl InMemoryClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, client_id: Uuid, record: ClientRecord) -> Self {
        self.insert(client_id, record);
        self
    }

    pub fn insert(&self, client_id: Uuid, record: ClientRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(client_id, record);
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn client_record(&self, client_id: Uuid) -> Result<Option<ClientRecord>, DirectoryError> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&client_id)
            .copied())
    }

    async fn ping(&self) -> Result<(), DirectoryError> {
        Ok(())
    }
}
