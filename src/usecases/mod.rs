//! Application use cases. Orchestrate domain logic via ports.

pub mod persistence;
pub mod queries;
pub mod reducer;
pub mod session_service;
pub mod store;

pub use persistence::{PersistenceWorker, SnapshotPersistence};
pub use reducer::reduce;
pub use session_service::SessionService;
pub use store::{CareStore, SubscriptionId};
