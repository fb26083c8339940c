//! Effective limit resolution for one feature under one plan.

use serde::Serialize;

use super::{Entitlement, Limit};
use crate::domain::foundation::{FeatureKey, PlanCode};

/// Where a resolved limit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitSource {
    /// A per-plan entry matched the requested plan.
    PlanEntry,
    /// No per-plan entry matched; the entitlement's overall limit applies.
    OverallLimit,
    /// No entitlement exists for the feature. Deny-by-default.
    NoEntitlement,
}

/// A resolved limit together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub limit: Limit,
    pub source: LimitSource,
}

/// Resolves the limit for `feature_key` under `plan_code`, recording its source.
///
/// 1. The first entitlement whose key matches wins. None → `Limit::ZERO`.
/// 2. Within it, the first per-plan entry identified by `plan_code` wins.
/// 3. Otherwise the entitlement's overall limit applies.
///
/// A missing feature resolves to zero while a missing limit value resolves to
/// unlimited; both rules are deliberate and must not be unified.
pub fn resolve(entitlements: &[Entitlement], feature_key: &FeatureKey, plan_code: &PlanCode) -> Resolution {
    let Some(entitlement) = entitlements.iter().find(|e| e.is_for(feature_key)) else {
        return Resolution {
            limit: Limit::ZERO,
            source: LimitSource::NoEntitlement,
        };
    };

    match entitlement.plan_entry(plan_code) {
        Some(entry) => Resolution {
            limit: entry.limit(),
            source: LimitSource::PlanEntry,
        },
        None => Resolution {
            limit: entitlement.overall_limit(),
            source: LimitSource::OverallLimit,
        },
    }
}

/// Resolves just the limit. See [`resolve`].
pub fn resolve_limit(entitlements: &[Entitlement], feature_key: &FeatureKey, plan_code: &PlanCode) -> Limit {
    resolve(entitlements, feature_key, plan_code).limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::{PlanLimit, UNLIMITED_SENTINEL};
    use proptest::prelude::*;

    fn plan(code: &str) -> PlanCode {
        PlanCode::new(code).unwrap()
    }

    fn feature(key: &str) -> FeatureKey {
        FeatureKey::new(key).unwrap()
    }

    fn tracked_accounts() -> Vec<Entitlement> {
        vec![Entitlement::new(feature("tracked_accounts"), Limit::Unlimited)
            .with_plan(PlanLimit::new(plan("free"), Limit::Bounded(2)))]
    }

    #[test]
    fn empty_list_resolves_to_zero() {
        let resolution = resolve(&[], &feature("tracked_accounts"), &plan("free"));
        assert_eq!(resolution.limit, Limit::ZERO);
        assert_eq!(resolution.source, LimitSource::NoEntitlement);
    }

    #[test]
    fn unknown_feature_resolves_to_zero() {
        let limit = resolve_limit(&tracked_accounts(), &feature("projects"), &plan("free"));
        assert_eq!(limit, Limit::ZERO);
    }

    #[test]
    fn plan_entry_beats_overall_limit() {
        let resolution = resolve(&tracked_accounts(), &feature("tracked_accounts"), &plan("free"));
        assert_eq!(resolution.limit, Limit::Bounded(2));
        assert_eq!(resolution.source, LimitSource::PlanEntry);
    }

    #[test]
    fn falls_back_to_overall_limit_without_plan_entry() {
        let resolution = resolve(&tracked_accounts(), &feature("tracked_accounts"), &plan("pro"));
        assert_eq!(resolution.limit, Limit::Unlimited);
        assert_eq!(resolution.limit.as_sentinel(), UNLIMITED_SENTINEL);
        assert_eq!(resolution.source, LimitSource::OverallLimit);
    }

    #[test]
    fn first_matching_entitlement_wins() {
        let entitlements = vec![
            Entitlement::new(feature("tracked_accounts"), Limit::Bounded(5)),
            Entitlement::new(feature("tracked_accounts"), Limit::Bounded(50)),
        ];
        let limit = resolve_limit(&entitlements, &feature("tracked_accounts"), &plan("free"));
        assert_eq!(limit, Limit::Bounded(5));
    }

    #[test]
    fn feature_match_is_case_sensitive() {
        let limit = resolve_limit(&tracked_accounts(), &feature("Tracked_Accounts"), &plan("free"));
        assert_eq!(limit, Limit::ZERO);
    }

    #[test]
    fn plan_alias_is_matched() {
        let entitlements = vec![Entitlement::new(feature("seats"), Limit::Unlimited).with_plan(
            PlanLimit::with_aliases(vec![plan("starter"), plan("plan_starter")], Limit::Bounded(3))
                .unwrap(),
        )];
        let limit = resolve_limit(&entitlements, &feature("seats"), &plan("plan_starter"));
        assert_eq!(limit, Limit::Bounded(3));
    }

    #[test]
    fn input_is_not_mutated() {
        let entitlements = tracked_accounts();
        let before = entitlements.clone();
        let _ = resolve(&entitlements, &feature("tracked_accounts"), &plan("free"));
        assert_eq!(entitlements, before);
    }

    proptest! {
        #[test]
        fn missing_feature_always_resolves_to_zero(
            keys in proptest::collection::vec("[a-z]{1,8}", 0..6),
            overall in 0_u32..1000,
        ) {
            let entitlements: Vec<Entitlement> = keys
                .iter()
                .map(|k| Entitlement::new(feature(k), Limit::Bounded(overall)))
                .collect();
            // Upper-case letters never appear in the generated keys.
            let limit = resolve_limit(&entitlements, &feature("MISSING"), &plan("free"));
            prop_assert_eq!(limit, Limit::ZERO);
        }

        #[test]
        fn matching_plan_entry_always_wins(plan_limit in 0_u32..1000, overall in 0_u32..1000) {
            let entitlements = vec![Entitlement::new(feature("f"), Limit::Bounded(overall))
                .with_plan(PlanLimit::new(plan("other"), Limit::Unlimited))
                .with_plan(PlanLimit::new(plan("target"), Limit::Bounded(plan_limit)))];
            let limit = resolve_limit(&entitlements, &feature("f"), &plan("target"));
            prop_assert_eq!(limit, Limit::Bounded(plan_limit));
        }
    }
}
