//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the gate to external systems:
//! - `billing` - Billing management API (identity, entitlements)
//! - `usage` - Usage metering API
//! - `outcome` - Deny callback and log emitters
//! - `memory` - In-memory collaborators for local runs and tests
//! - `http` - Axum binding the host calls

pub mod billing;
pub mod http;
pub mod memory;
pub mod outcome;
pub mod rest;
pub mod usage;

pub use billing::BillingApiClient;
pub use memory::{InMemoryBillingDirectory, RecordingOutcomeEmitter, StaticUsageSource};
pub use outcome::{CallbackOutcomeEmitter, LoggingOutcomeEmitter};
pub use rest::RestClient;
pub use usage::UsageApiClient;
