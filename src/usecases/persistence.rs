//! Snapshot persistence: the whole AppState as JSON under one storage key.
//!
//! - `load` runs once at startup and never fails: anything unreadable is logged and ignored
//! - `PersistenceWorker` consumes committed snapshots from the store and writes them
//! - Write failures are logged; in-memory state stays authoritative

use crate::domain::{AppState, DomainError};
use crate::ports::KeyValuePort;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Storage key holding the JSON-serialized AppState.
pub const STATE_KEY: &str = "careflow_state";

pub fn encode_snapshot(state: &AppState) -> Result<String, DomainError> {
    serde_json::to_string(state).map_err(|e| DomainError::Snapshot(e.to_string()))
}

/// Parse a snapshot. Out-of-set enum values and missing fields are errors.
pub fn decode_snapshot(json: &str) -> Result<AppState, DomainError> {
    serde_json::from_str(json).map_err(|e| DomainError::Snapshot(e.to_string()))
}

/// Reads and writes the AppState snapshot through a key-value backend.
pub struct SnapshotPersistence {
    storage: Arc<dyn KeyValuePort>,
}

impl SnapshotPersistence {
    pub fn new(storage: Arc<dyn KeyValuePort>) -> Self {
        Self { storage }
    }

    /// Stored snapshot, if there is a readable one.
    pub async fn load(&self) -> Option<AppState> {
        let raw = match self.storage.get(STATE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("no stored snapshot; using seed state");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "failed to read stored snapshot; using seed state");
                return None;
            }
        };
        match decode_snapshot(&raw) {
            Ok(state) => {
                info!(
                    patients = state.patients.len(),
                    actions = state.actions.len(),
                    "loaded stored snapshot"
                );
                Some(state)
            }
            Err(e) => {
                warn!(error = %e, "failed to load state; using seed state");
                None
            }
        }
    }

    pub async fn save(&self, state: &AppState) -> Result<(), DomainError> {
        let json = encode_snapshot(state)?;
        self.storage.set(STATE_KEY, &json).await
    }
}

/// Async task: reads committed snapshots from the store's channel and saves them.
///
/// Snapshots queued while a write was in flight are collapsed to the newest one;
/// every write replaces the whole value, so older ones would be overwritten anyway.
pub struct PersistenceWorker {
    persistence: Arc<SnapshotPersistence>,
    rx: mpsc::UnboundedReceiver<Arc<AppState>>,
}

impl PersistenceWorker {
    pub fn new(
        persistence: Arc<SnapshotPersistence>,
        rx: mpsc::UnboundedReceiver<Arc<AppState>>,
    ) -> Self {
        Self { persistence, rx }
    }

    /// Run the worker. Processes until the channel is closed (store dropped).
    pub async fn run(mut self) {
        while let Some(mut snapshot) = self.rx.recv().await {
            let mut skipped = 0usize;
            while let Ok(newer) = self.rx.try_recv() {
                snapshot = newer;
                skipped += 1;
            }
            match self.persistence.save(&snapshot).await {
                Ok(()) => debug!(skipped, "snapshot saved"),
                Err(e) => error!(error = %e, "snapshot save failed; keeping in-memory state"),
            }
        }

        info!("persistence worker finished (channel closed)");
    }
}
