//! careflow: hospital workflow dashboard core with Hexagonal Architecture.
//!
//! A single reducer-managed AppState (patients, clinical actions, departments, active view),
//! persisted as a JSON snapshot in a key-value store.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
