//! In-memory adapters for local runs and tests.

mod billing_directory;
mod outcome_emitter;
mod usage_source;

pub use billing_directory::InMemoryBillingDirectory;
pub use outcome_emitter::{EmittedDenial, RecordingOutcomeEmitter};
pub use usage_source::StaticUsageSource;
