//! Sign-in flag. Lives next to the state snapshot in storage but outside AppState.
//!
//! There is no credential check: signing in only records the flag.

use crate::domain::DomainError;
use crate::ports::KeyValuePort;
use std::sync::Arc;
use tracing::info;

/// Storage key for the session flag. Only the literal `"true"` means signed in.
pub const AUTH_KEY: &str = "careflow_auth";

pub struct SessionService {
    storage: Arc<dyn KeyValuePort>,
}

impl SessionService {
    pub fn new(storage: Arc<dyn KeyValuePort>) -> Self {
        Self { storage }
    }

    pub async fn is_authenticated(&self) -> Result<bool, DomainError> {
        let flag = self.storage.get(AUTH_KEY).await?;
        Ok(flag.as_deref() == Some("true"))
    }

    pub async fn sign_in(&self) -> Result<(), DomainError> {
        self.storage.set(AUTH_KEY, "true").await?;
        info!("signed in");
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<(), DomainError> {
        self.storage.remove(AUTH_KEY).await?;
        info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::MemoryStorage;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionService::new(Arc::clone(&storage) as Arc<dyn KeyValuePort>);

        assert!(!session.is_authenticated().await.unwrap());
        session.sign_in().await.unwrap();
        assert!(session.is_authenticated().await.unwrap());
        assert_eq!(storage.get(AUTH_KEY).await.unwrap().as_deref(), Some("true"));

        session.sign_out().await.unwrap();
        assert!(!session.is_authenticated().await.unwrap());
        assert_eq!(storage.get(AUTH_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_only_literal_true_counts() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionService::new(Arc::clone(&storage) as Arc<dyn KeyValuePort>);
        for v in ["TRUE", "1", "yes", ""] {
            storage.set(AUTH_KEY, v).await.unwrap();
            assert!(!session.is_authenticated().await.unwrap(), "{:?}", v);
        }
    }
}
