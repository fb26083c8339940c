//! Plan change handlers.
//!
//! - `PlanChangeTrigger` / `PlanChangeRequest` - inbound payload and its validated form
//! - `EvaluatePlanChangeHandler` - gates a downgrade on current usage

mod evaluate_plan_change;
mod trigger;

pub use evaluate_plan_change::{EvaluatePlanChangeHandler, Evaluation, GateTimeouts, Terminal};
pub use trigger::{
    BillingContext, OrganizationContext, PlanChangeRequest, PlanChangeTrigger, TriggerContext,
    UserContext,
};
