//! Measured usage and the policy applied when it cannot be measured.

use serde::{Deserialize, Serialize};

use super::decision::{DenyReason, GateOutcome, PlanContext};
use crate::domain::entitlement::Limit;
use crate::domain::foundation::UserId;

/// Current consumption of the tracked feature by one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub subject_id: UserId,
    pub count: u64,
}

/// What to do when the usage lookup fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageFallback {
    /// Treat unknown usage as over every bounded limit. Only an unlimited
    /// target plan is allowed.
    #[default]
    Conservative,
    /// Treat unknown usage as zero. The change is always allowed.
    Optimistic,
}

impl UsageFallback {
    /// Decides without a usage measurement.
    pub fn decide(&self, limit: Limit, feature_label: &str, context: &PlanContext) -> GateOutcome {
        match self {
            UsageFallback::Optimistic => GateOutcome::Allow,
            UsageFallback::Conservative if limit.is_unlimited() => GateOutcome::Allow,
            UsageFallback::Conservative => GateOutcome::Deny {
                summary: context.summary(),
                reasons: vec![DenyReason::UsageUnverified {
                    feature_label: feature_label.to_string(),
                    limit,
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PlanCode;

    fn context() -> PlanContext {
        PlanContext::new(PlanCode::new("free").unwrap())
    }

    #[test]
    fn default_is_conservative() {
        assert_eq!(UsageFallback::default(), UsageFallback::Conservative);
    }

    #[test]
    fn conservative_denies_bounded_limit() {
        let outcome = UsageFallback::Conservative.decide(Limit::Bounded(10), "seats", &context());
        assert!(outcome.is_denied());
    }

    #[test]
    fn conservative_allows_unlimited() {
        let outcome = UsageFallback::Conservative.decide(Limit::Unlimited, "seats", &context());
        assert!(outcome.is_allowed());
    }

    #[test]
    fn optimistic_always_allows() {
        let outcome = UsageFallback::Optimistic.decide(Limit::ZERO, "seats", &context());
        assert!(outcome.is_allowed());
    }

    #[test]
    fn fallback_deserializes_lowercase() {
        let parsed: UsageFallback = serde_json::from_str("\"optimistic\"").unwrap();
        assert_eq!(parsed, UsageFallback::Optimistic);
    }
}
