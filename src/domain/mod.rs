//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, errors, state machine)
//! - `entitlement` - Limit normalization and per-plan limit resolution
//! - `gate` - Allow/deny decision and evaluation stages

pub mod entitlement;
pub mod foundation;
pub mod gate;
