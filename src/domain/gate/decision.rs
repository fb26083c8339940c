//! Allow/deny verdict for a plan change, and the messages shown on deny.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entitlement::Limit;
use crate::domain::foundation::{FeatureKey, PlanCode};

/// Message shown when the billing customer behind a user cannot be found.
pub const BILLING_UNVERIFIED_MESSAGE: &str =
    "We couldn't verify your billing profile. Please try again.";

/// The single feature a gate evaluates, with its user-facing label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFeature {
    pub key: FeatureKey,
    /// Plural noun used in messages, e.g. "tracked accounts".
    pub label: String,
}

impl TrackedFeature {
    pub fn new(key: FeatureKey, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
        }
    }
}

/// Source and destination plan of the requested change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanContext {
    pub current_plan: Option<PlanCode>,
    pub requested_plan: PlanCode,
}

impl PlanContext {
    pub fn new(requested_plan: PlanCode) -> Self {
        Self {
            current_plan: None,
            requested_plan,
        }
    }

    pub fn with_current_plan(mut self, current_plan: Option<PlanCode>) -> Self {
        self.current_plan = current_plan;
        self
    }

    /// Leading line of a usage-based denial.
    pub fn summary(&self) -> String {
        match &self.current_plan {
            Some(current) => format!(
                "You can't switch from the {} plan to the {} plan yet.",
                current, self.requested_plan
            ),
            None => format!("You can't switch to the {} plan yet.", self.requested_plan),
        }
    }
}

/// Why a plan change was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DenyReason {
    /// Current usage is above the target plan's limit.
    UsageExceedsLimit {
        feature_label: String,
        limit: Limit,
        usage: u64,
    },

    /// Usage could not be measured and the target plan is capped.
    UsageUnverified { feature_label: String, limit: Limit },

    /// The billing customer behind the user could not be found.
    BillingProfileUnverified,
}

impl DenyReason {
    /// Get a user-facing message for the denial reason.
    pub fn user_message(&self) -> String {
        match self {
            DenyReason::UsageExceedsLimit {
                feature_label,
                limit,
                usage,
            } => format!(
                "Delete {} to {} or fewer (currently {}).",
                feature_label, limit, usage
            ),
            DenyReason::UsageUnverified {
                feature_label,
                limit,
            } => format!(
                "We couldn't confirm your current {} count. Reduce {} to {} or fewer and try again.",
                feature_label, feature_label, limit
            ),
            DenyReason::BillingProfileUnverified => BILLING_UNVERIFIED_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

/// Result of a gating decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateOutcome {
    /// The plan change may proceed.
    Allow,
    /// The plan change is blocked.
    Deny {
        summary: String,
        reasons: Vec<DenyReason>,
    },
}

impl GateOutcome {
    /// Deny because the billing profile could not be verified.
    pub fn billing_unverified() -> Self {
        GateOutcome::Deny {
            summary: BILLING_UNVERIFIED_MESSAGE.to_string(),
            reasons: vec![DenyReason::BillingProfileUnverified],
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GateOutcome::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, GateOutcome::Deny { .. })
    }

    /// Rendered reason strings, in order. Empty for `Allow`.
    pub fn reason_messages(&self) -> Vec<String> {
        match self {
            GateOutcome::Allow => Vec::new(),
            GateOutcome::Deny { reasons, .. } => reasons.iter().map(DenyReason::user_message).collect(),
        }
    }
}

/// Allows iff `usage <= limit`; otherwise denies with a remediation message.
pub fn decide(usage: u64, limit: Limit, feature_label: &str, context: &PlanContext) -> GateOutcome {
    if limit.permits(usage) {
        return GateOutcome::Allow;
    }

    GateOutcome::Deny {
        summary: context.summary(),
        reasons: vec![DenyReason::UsageExceedsLimit {
            feature_label: feature_label.to_string(),
            limit,
            usage,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn context(requested: &str) -> PlanContext {
        PlanContext::new(PlanCode::new(requested).unwrap())
    }

    #[test]
    fn usage_under_limit_is_allowed() {
        assert_eq!(decide(1, Limit::Bounded(2), "tracked accounts", &context("free")), GateOutcome::Allow);
    }

    #[test]
    fn usage_at_limit_is_allowed() {
        assert!(decide(2, Limit::Bounded(2), "tracked accounts", &context("free")).is_allowed());
    }

    #[test]
    fn zero_usage_against_zero_limit_is_allowed() {
        assert!(decide(0, Limit::ZERO, "tracked accounts", &context("free")).is_allowed());
    }

    #[test]
    fn usage_over_limit_is_denied_with_template_message() {
        let outcome = decide(3, Limit::Bounded(2), "tracked accounts", &context("free"));
        assert!(outcome.is_denied());
        assert_eq!(
            outcome.reason_messages(),
            vec!["Delete tracked accounts to 2 or fewer (currently 3).".to_string()]
        );
    }

    #[test]
    fn summary_names_requested_plan() {
        let outcome = decide(3, Limit::Bounded(2), "tracked accounts", &context("free"));
        match outcome {
            GateOutcome::Deny { summary, .. } => {
                assert_eq!(summary, "You can't switch to the free plan yet.")
            }
            GateOutcome::Allow => panic!("expected deny"),
        }
    }

    #[test]
    fn summary_names_both_plans_when_current_is_known() {
        let ctx = context("free").with_current_plan(Some(PlanCode::new("pro").unwrap()));
        assert_eq!(ctx.summary(), "You can't switch from the pro plan to the free plan yet.");
    }

    #[test]
    fn unlimited_never_denies() {
        assert!(decide(u64::MAX, Limit::Unlimited, "seats", &context("pro")).is_allowed());
    }

    #[test]
    fn billing_unverified_carries_fixed_message() {
        let outcome = GateOutcome::billing_unverified();
        assert_eq!(
            outcome.reason_messages(),
            vec!["We couldn't verify your billing profile. Please try again.".to_string()]
        );
    }

    #[test]
    fn unverified_usage_message_mentions_limit() {
        let reason = DenyReason::UsageUnverified {
            feature_label: "tracked accounts".to_string(),
            limit: Limit::Bounded(5),
        };
        let msg = reason.user_message();
        assert!(msg.contains("couldn't confirm"));
        assert!(msg.contains("5 or fewer"));
    }

    #[test]
    fn allow_has_no_reasons() {
        assert!(GateOutcome::Allow.reason_messages().is_empty());
    }

    #[test]
    fn outcome_serializes_with_decision_tag() {
        let outcome = decide(3, Limit::Bounded(2), "tracked accounts", &context("free"));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["decision"], "deny");
        assert_eq!(json["reasons"][0]["type"], "usage_exceeds_limit");
        assert_eq!(json["reasons"][0]["limit"], 2);
        assert_eq!(json["reasons"][0]["usage"], 3);
    }

    proptest! {
        #[test]
        fn allows_iff_usage_within_limit(usage in 0_u64..5_000_000_000, limit in 0_u32..2147483647) {
            let outcome = decide(usage, Limit::Bounded(limit), "items", &context("free"));
            prop_assert_eq!(outcome.is_allowed(), usage <= u64::from(limit));
        }
    }
}
