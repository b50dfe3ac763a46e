//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: a presentation collaborator that drives the store until the user quits.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive session (sign-in gate, then view navigation).
    async fn run(&self) -> Result<(), DomainError>;
}
