//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the state machine trait, and validation errors
//! that form the vocabulary of the plan gate.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::{BillingCustomerId, FeatureKey, OrganizationCode, PlanCode, UserId};
pub use state_machine::StateMachine;
