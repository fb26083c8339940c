//! Gate domain module.
//!
//! Pure decision logic for a plan change: the verdict, its messages, the
//! unavailable-usage policy and the evaluation stage machine.

mod decision;
mod stage;
mod usage;

pub use decision::{
    decide, DenyReason, GateOutcome, PlanContext, TrackedFeature, BILLING_UNVERIFIED_MESSAGE,
};
pub use stage::GateStage;
pub use usage::{UsageFallback, UsageSnapshot};
