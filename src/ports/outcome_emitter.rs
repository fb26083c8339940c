//! Outcome emission port.
//!
//! Only denials are emitted; the absence of an emission means the change
//! proceeds.

use async_trait::async_trait;

use super::CollaboratorError;

/// Port for reporting a denial back to the host.
#[async_trait]
pub trait OutcomeEmitter: Send + Sync {
    /// Called at most once per evaluation.
    async fn emit_deny(&self, summary: &str, reasons: &[String]) -> Result<(), CollaboratorError>;
}
