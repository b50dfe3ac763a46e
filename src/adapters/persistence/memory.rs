//! Implements KeyValuePort in process memory. Nothing survives a restart.

use crate::domain::DomainError;
use crate::ports::KeyValuePort;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValuePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
