//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the gate and its collaborators. Adapters implement these ports.
//!
//! - `BillingIdentityLookup` - user → billing customer
//! - `EntitlementsSource` - customer → entitlements (per-plan expanded)
//! - `UsageSource` - subject → current usage of a feature
//! - `OutcomeEmitter` - denial → host

mod billing_identity;
mod collaborator_error;
mod entitlements_source;
mod outcome_emitter;
mod usage_source;

pub use billing_identity::BillingIdentityLookup;
pub use collaborator_error::{CollaboratorError, CollaboratorErrorCode};
pub use entitlements_source::EntitlementsSource;
pub use outcome_emitter::OutcomeEmitter;
pub use usage_source::UsageSource;
