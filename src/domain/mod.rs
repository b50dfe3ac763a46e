//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the action set and the seed live here. Dependencies flow inward.

pub mod action;
pub mod drafts;
pub mod entities;
pub mod errors;
pub mod seed;

pub use action::Action;
pub use drafts::{ActionDraft, PatientDraft};
pub use entities::{
    ActionStatus, ActionType, AppState, Department, Patient, PatientStatus, TriageLevel,
    ViewState, WorkflowAction,
};
pub use errors::DomainError;
pub use seed::seed_state;
