//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::DomainError;

/// String-keyed storage backend. Values are opaque strings; callers own the encoding.
#[async_trait::async_trait]
pub trait KeyValuePort: Send + Sync {
    /// Read a key. `Ok(None)` when the key was never written or has been removed.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Write a key, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}
