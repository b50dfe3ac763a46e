//! Infrastructure adapters. Implement ports.
//!
//! Key-value storage backends and the terminal UI. Map errors to DomainError.

pub mod persistence;
pub mod ui;
