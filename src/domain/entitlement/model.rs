//! Canonical entitlement shape.
//!
//! Boundary adapters map each upstream schema variant into these types, so
//! resolution never needs to know which field names the source used. A
//! record may legitimately carry more than one identifier for the same thing
//! (e.g. both a `key` and a `code`); all of them are kept and any may match.

use serde::{Deserialize, Serialize};

use super::Limit;
use crate::domain::foundation::{FeatureKey, PlanCode, ValidationError};

/// Limit for one feature under one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimit {
    plan_codes: Vec<PlanCode>,
    limit: Limit,
}

impl PlanLimit {
    pub fn new(plan_code: PlanCode, limit: Limit) -> Self {
        Self {
            plan_codes: vec![plan_code],
            limit,
        }
    }

    /// Creates an entry known under several equivalent plan identifiers.
    pub fn with_aliases(plan_codes: Vec<PlanCode>, limit: Limit) -> Result<Self, ValidationError> {
        if plan_codes.is_empty() {
            return Err(ValidationError::empty_field("plan_code"));
        }
        Ok(Self { plan_codes, limit })
    }

    /// Returns true if any identifier of this entry equals `plan_code`.
    pub fn identifies(&self, plan_code: &PlanCode) -> bool {
        self.plan_codes.iter().any(|code| code == plan_code)
    }

    pub fn plan_codes(&self) -> &[PlanCode] {
        &self.plan_codes
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }
}

/// One feature's entitlement configuration across every plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    feature_keys: Vec<FeatureKey>,
    overall_limit: Limit,
    plans: Vec<PlanLimit>,
}

impl Entitlement {
    pub fn new(feature_key: FeatureKey, overall_limit: Limit) -> Self {
        Self {
            feature_keys: vec![feature_key],
            overall_limit,
            plans: Vec::new(),
        }
    }

    /// Creates an entitlement known under several equivalent feature keys.
    pub fn with_aliases(
        feature_keys: Vec<FeatureKey>,
        overall_limit: Limit,
    ) -> Result<Self, ValidationError> {
        if feature_keys.is_empty() {
            return Err(ValidationError::empty_field("feature_key"));
        }
        Ok(Self {
            feature_keys,
            overall_limit,
            plans: Vec::new(),
        })
    }

    /// Appends a per-plan entry, keeping upstream order.
    pub fn with_plan(mut self, plan: PlanLimit) -> Self {
        self.plans.push(plan);
        self
    }

    /// Returns true if any key of this record equals `feature_key`.
    pub fn is_for(&self, feature_key: &FeatureKey) -> bool {
        self.feature_keys.iter().any(|key| key == feature_key)
    }

    /// First per-plan entry identified by `plan_code`, in upstream order.
    pub fn plan_entry(&self, plan_code: &PlanCode) -> Option<&PlanLimit> {
        self.plans.iter().find(|plan| plan.identifies(plan_code))
    }

    pub fn feature_keys(&self) -> &[FeatureKey] {
        &self.feature_keys
    }

    pub fn overall_limit(&self) -> Limit {
        self.overall_limit
    }

    pub fn plans(&self) -> &[PlanLimit] {
        &self.plans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(code: &str) -> PlanCode {
        PlanCode::new(code).unwrap()
    }

    fn feature(key: &str) -> FeatureKey {
        FeatureKey::new(key).unwrap()
    }

    #[test]
    fn plan_limit_matches_any_alias() {
        let entry =
            PlanLimit::with_aliases(vec![plan("free"), plan("free_v2")], Limit::Bounded(2)).unwrap();
        assert!(entry.identifies(&plan("free")));
        assert!(entry.identifies(&plan("free_v2")));
        assert!(!entry.identifies(&plan("pro")));
    }

    #[test]
    fn plan_limit_requires_an_identifier() {
        assert!(PlanLimit::with_aliases(vec![], Limit::ZERO).is_err());
    }

    #[test]
    fn entitlement_requires_a_feature_key() {
        assert!(Entitlement::with_aliases(vec![], Limit::Unlimited).is_err());
    }

    #[test]
    fn plan_entry_is_first_match_in_order() {
        let ent = Entitlement::new(feature("seats"), Limit::Unlimited)
            .with_plan(PlanLimit::new(plan("free"), Limit::Bounded(1)))
            .with_plan(PlanLimit::new(plan("free"), Limit::Bounded(9)));
        assert_eq!(ent.plan_entry(&plan("free")).unwrap().limit(), Limit::Bounded(1));
        assert!(ent.plan_entry(&plan("pro")).is_none());
    }

    #[test]
    fn is_for_checks_every_key() {
        let ent = Entitlement::with_aliases(vec![feature("a"), feature("b")], Limit::ZERO).unwrap();
        assert!(ent.is_for(&feature("b")));
        assert!(!ent.is_for(&feature("c")));
    }
}
