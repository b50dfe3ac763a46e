//! The application store: owns the single AppState, runs dispatches, notifies subscribers.
//!
//! - Constructed once in `main` and shared as `Arc<CareStore>`
//! - `dispatch` is synchronous: reduce, commit, enqueue snapshot, notify, in that order
//! - A dispatch that changes nothing (same `Arc` back from the reducer) is dropped silently

use crate::domain::{Action, AppState};
use crate::usecases::persistence::{PersistenceWorker, SnapshotPersistence};
use crate::usecases::reducer::reduce;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Callback invoked with the committed state after every change.
pub type Subscriber = Arc<dyn Fn(&AppState) + Send + Sync>;

/// Handle returned by [`CareStore::subscribe`]; pass it to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct CareStore {
    state: RwLock<Arc<AppState>>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
    /// Committed snapshots go here for the persistence worker. `None` = not persisted.
    snapshots: Option<mpsc::UnboundedSender<Arc<AppState>>>,
}

impl CareStore {
    /// In-memory store with no persistence.
    pub fn new(initial: AppState) -> Self {
        Self::build(initial, None)
    }

    /// Store that hands every committed state to the returned worker.
    /// Spawn `worker.run()`; it exits once the store is dropped.
    pub fn with_persistence(
        initial: AppState,
        persistence: Arc<SnapshotPersistence>,
    ) -> (Self, PersistenceWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Self::build(initial, Some(tx));
        (store, PersistenceWorker::new(persistence, rx))
    }

    /// Startup protocol: begin from `seed`, then dispatch LOAD_STATE with the stored
    /// snapshot if one is present and readable. Never fails; see `SnapshotPersistence::load`.
    pub async fn open(
        seed: AppState,
        persistence: Arc<SnapshotPersistence>,
    ) -> (Self, PersistenceWorker) {
        let stored = persistence.load().await;
        let (store, worker) = Self::with_persistence(seed, persistence);
        if let Some(snapshot) = stored {
            store.dispatch(Action::load_state(snapshot));
        }
        (store, worker)
    }

    fn build(initial: AppState, snapshots: Option<mpsc::UnboundedSender<Arc<AppState>>>) -> Self {
        Self {
            state: RwLock::new(Arc::new(initial)),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            snapshots,
        }
    }

    /// Current committed state.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Run `action` through the reducer and commit the result. Returns the committed state.
    pub fn dispatch(&self, action: Action) -> Arc<AppState> {
        let tag = action.tag();
        let next = {
            let mut current = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = reduce(&current, action);
            if Arc::ptr_eq(&current, &next) {
                debug!(action = tag, "dispatch left state unchanged");
                return next;
            }
            *current = Arc::clone(&next);
            // Enqueued under the lock so the worker sees snapshots in commit order.
            if let Some(tx) = &self.snapshots {
                if tx.send(Arc::clone(&next)).is_err() {
                    warn!(action = tag, "persistence worker stopped; snapshot not saved");
                }
            }
            next
        };
        debug!(
            action = tag,
            patients = next.patients.len(),
            actions = next.actions.len(),
            "state committed"
        );
        self.notify(&next);
        next
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    fn notify(&self, state: &AppState) {
        // Copy the list out so a callback may dispatch or (un)subscribe.
        let subs: Vec<Subscriber> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for s in subs {
            s(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::MemoryStorage;
    use crate::domain::{seed_state, DomainError, Patient, PatientStatus, TriageLevel, ViewState};
    use crate::ports::KeyValuePort;
    use crate::usecases::persistence::{decode_snapshot, encode_snapshot, STATE_KEY};
    use std::time::Duration;

    /// Backend whose writes always fail; counts attempts.
    #[derive(Default)]
    struct BrokenDisk {
        writes: AtomicU64,
    }

    #[async_trait::async_trait]
    impl KeyValuePort for BrokenDisk {
        async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::Storage("disk full".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), DomainError> {
            Err(DomainError::Storage("disk full".into()))
        }
    }

    async fn wait_for_writes(disk: &BrokenDisk, n: u64) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while disk.writes.load(Ordering::SeqCst) < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    const NOW: i64 = 1_700_000_000_000;

    fn p5() -> Patient {
        Patient {
            id: "p5".into(),
            name: "Test".into(),
            age: 40,
            triage_level: TriageLevel::Stable,
            status: PatientStatus::Pending,
            room: "100".into(),
            admitted_at: 0,
        }
    }

    fn storage_and_persistence() -> (Arc<MemoryStorage>, Arc<SnapshotPersistence>) {
        let storage = Arc::new(MemoryStorage::new());
        let persistence = Arc::new(SnapshotPersistence::new(
            Arc::clone(&storage) as Arc<dyn KeyValuePort>
        ));
        (storage, persistence)
    }

    #[test]
    fn test_dispatch_scenarios_on_seed() {
        let store = CareStore::new(seed_state(NOW));
        assert_eq!(store.state().patients.len(), 4);

        let s = store.dispatch(Action::AddPatient(p5()));
        assert_eq!(s.patients.len(), 5);
        assert_eq!(s.patients[0].id, "p5");

        let store = CareStore::new(seed_state(NOW));
        let s = store.dispatch(Action::DeletePatient("p2".into()));
        assert_eq!(s.patients.len(), 3);
        assert!(store.state().patients.iter().all(|p| p.id != "p2"));
    }

    #[test]
    fn test_subscribers_see_every_commit_in_order() {
        let store = CareStore::new(seed_state(NOW));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |s: &AppState| sink.lock().unwrap().push(s.active_view));

        store.dispatch(Action::SetView(ViewState::Patients));
        store.dispatch(Action::SetView(ViewState::Settings));
        store.dispatch(Action::SetView(ViewState::Dashboard));

        assert_eq!(
            *seen.lock().unwrap(),
            [ViewState::Patients, ViewState::Settings, ViewState::Dashboard]
        );
    }

    #[test]
    fn test_unknown_action_keeps_reference_and_skips_notify() {
        let store = CareStore::new(seed_state(NOW));
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(move |_: &AppState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let before = store.state();
        let after = store.dispatch(Action::Unknown);
        assert!(Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&before, &store.state()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let store = CareStore::new(seed_state(NOW));
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_: &AppState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(Action::SetView(ViewState::Patients));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(Action::SetView(ViewState::Settings));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscriber_may_dispatch() {
        let store = Arc::new(CareStore::new(seed_state(NOW)));
        let inner = Arc::downgrade(&store);
        store.subscribe(move |s: &AppState| {
            if s.active_view == ViewState::Settings {
                if let Some(store) = inner.upgrade() {
                    store.dispatch(Action::SetView(ViewState::Dashboard));
                }
            }
        });
        store.dispatch(Action::SetView(ViewState::Settings));
        assert_eq!(store.state().active_view, ViewState::Dashboard);
    }

    #[tokio::test]
    async fn test_open_without_snapshot_uses_seed() {
        let (_, persistence) = storage_and_persistence();
        let (store, _worker) = CareStore::open(seed_state(NOW), persistence).await;
        assert_eq!(*store.state(), seed_state(NOW));
    }

    #[tokio::test]
    async fn test_open_with_malformed_snapshot_uses_seed() {
        let (storage, persistence) = storage_and_persistence();
        storage.set(STATE_KEY, "][").await.unwrap();
        let (store, _worker) = CareStore::open(seed_state(NOW), persistence).await;
        assert_eq!(*store.state(), seed_state(NOW));
    }

    #[tokio::test]
    async fn test_open_loads_stored_snapshot() {
        let (storage, persistence) = storage_and_persistence();
        let mut stored = seed_state(0);
        stored.patients.truncate(1);
        stored.active_view = ViewState::Departments;
        storage
            .set(STATE_KEY, &encode_snapshot(&stored).unwrap())
            .await
            .unwrap();

        let (store, _worker) = CareStore::open(seed_state(NOW), persistence).await;
        assert_eq!(*store.state(), stored);
    }

    #[tokio::test]
    async fn test_commits_are_persisted_and_reloaded() {
        let (storage, persistence) = storage_and_persistence();
        let (store, worker) = CareStore::open(seed_state(NOW), Arc::clone(&persistence)).await;
        let handle = tokio::spawn(worker.run());

        store.dispatch(Action::AddPatient(p5()));
        store.dispatch(Action::DeletePatient("p1".into()));
        let expected = store.state();
        drop(store);
        handle.await.unwrap();

        let raw = storage.get(STATE_KEY).await.unwrap().unwrap();
        assert_eq!(decode_snapshot(&raw).unwrap(), *expected);

        let (reopened, _worker) = CareStore::open(seed_state(NOW), persistence).await;
        assert_eq!(*reopened.state(), *expected);
    }

    #[tokio::test]
    async fn test_write_failures_keep_store_and_worker_running() {
        let disk = Arc::new(BrokenDisk::default());
        let persistence = Arc::new(SnapshotPersistence::new(
            Arc::clone(&disk) as Arc<dyn KeyValuePort>
        ));
        let (store, worker) = CareStore::with_persistence(seed_state(NOW), persistence);
        let handle = tokio::spawn(worker.run());

        let s = store.dispatch(Action::AddPatient(p5()));
        assert_eq!(s.patients.len(), 5);
        wait_for_writes(&disk, 1).await;
        assert!(!handle.is_finished());

        let s = store.dispatch(Action::DeletePatient("p1".into()));
        assert_eq!(s.patients.len(), 4);
        wait_for_writes(&disk, 2).await;
        assert!(!handle.is_finished());

        let state = store.state();
        assert_eq!(state.patients[0].id, "p5");
        assert!(state.patients.iter().all(|p| p.id != "p1"));

        drop(store);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(disk.writes.load(Ordering::SeqCst), 2);
    }
}
