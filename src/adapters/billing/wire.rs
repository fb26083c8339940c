//! Wire types for the billing management API.
//!
//! The entitlements endpoint has shipped more than one schema: features
//! arrive as `feature_key` or `feature_code`, maxima as
//! `entitlement_limit_max` or `max`, and plan identifiers as `plan_code`,
//! `key` or `code`. Every known variant is decoded here and mapped into the
//! canonical [`Entitlement`] shape; nothing past this module sees the aliases.

use serde::Deserialize;

use crate::domain::entitlement::{normalize, Entitlement, Limit, PlanLimit, RawLimit};
use crate::domain::foundation::{BillingCustomerId, FeatureKey, PlanCode, ValidationError};

/// Response of `GET /api/v1/users/{user_id}/billing`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingIdentityResponse {
    pub customer_id: Option<String>,
}

impl BillingIdentityResponse {
    /// Blank or missing ids mean "no customer".
    pub fn customer_id(self) -> Option<BillingCustomerId> {
        self.customer_id.and_then(|id| BillingCustomerId::new(id).ok())
    }
}

/// Response of `GET /api/v1/billing/entitlements`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntitlementsResponse {
    #[serde(default)]
    pub entitlements: Option<Vec<RawEntitlement>>,
}

/// One entitlement record in any known schema variant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntitlement {
    pub feature_key: Option<String>,
    pub feature_code: Option<String>,
    #[serde(default)]
    pub entitlement_limit_max: RawLimit,
    #[serde(default)]
    pub max: RawLimit,
    #[serde(default)]
    pub plans: Option<Vec<RawPlanLimit>>,
}

/// One per-plan limit in any known schema variant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlanLimit {
    pub plan_code: Option<String>,
    pub key: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub entitlement_limit_max: RawLimit,
    #[serde(default)]
    pub max: RawLimit,
}

/// Picks the first present limit field, in alias order.
fn first_limit(primary: &RawLimit, secondary: &RawLimit) -> Result<Limit, ValidationError> {
    if primary.is_absent() {
        normalize(secondary)
    } else {
        normalize(primary)
    }
}

/// Collects non-blank identifiers in alias order, without duplicates.
fn identifiers<T, F>(candidates: &[&Option<String>], make: F) -> Vec<T>
where
    T: PartialEq,
    F: Fn(String) -> Result<T, ValidationError>,
{
    let mut ids: Vec<T> = Vec::new();
    for candidate in candidates.iter().filter_map(|c| c.as_ref()) {
        if let Ok(id) = make(candidate.clone()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

impl RawPlanLimit {
    /// `Ok(None)` when the entry carries no usable plan identifier.
    pub fn into_plan_limit(self) -> Result<Option<PlanLimit>, ValidationError> {
        let codes = identifiers(&[&self.plan_code, &self.key, &self.code], PlanCode::new);
        if codes.is_empty() {
            return Ok(None);
        }
        let limit = first_limit(&self.entitlement_limit_max, &self.max)?;
        PlanLimit::with_aliases(codes, limit).map(Some)
    }
}

impl RawEntitlement {
    /// `Ok(None)` when the record carries no usable feature key.
    pub fn into_entitlement(self) -> Result<Option<Entitlement>, ValidationError> {
        let keys = identifiers(&[&self.feature_key, &self.feature_code], FeatureKey::new);
        if keys.is_empty() {
            return Ok(None);
        }
        let overall = first_limit(&self.entitlement_limit_max, &self.max)?;
        let mut entitlement = Entitlement::with_aliases(keys, overall)?;
        for raw_plan in self.plans.unwrap_or_default() {
            if let Some(plan) = raw_plan.into_plan_limit()? {
                entitlement = entitlement.with_plan(plan);
            }
        }
        Ok(Some(entitlement))
    }
}

impl EntitlementsResponse {
    /// Maps every record into canonical form, preserving order.
    ///
    /// A malformed limit anywhere fails the whole response; records without
    /// an identifier are dropped.
    pub fn into_entitlements(self) -> Result<Vec<Entitlement>, ValidationError> {
        let mut entitlements = Vec::new();
        for raw in self.entitlements.unwrap_or_default() {
            match raw.into_entitlement()? {
                Some(entitlement) => entitlements.push(entitlement),
                None => tracing::debug!("Dropping entitlement record without feature key"),
            }
        }
        Ok(entitlements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::resolve_limit;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Vec<Entitlement> {
        serde_json::from_value::<EntitlementsResponse>(value)
            .unwrap()
            .into_entitlements()
            .unwrap()
    }

    fn feature(key: &str) -> FeatureKey {
        FeatureKey::new(key).unwrap()
    }

    fn plan(code: &str) -> PlanCode {
        PlanCode::new(code).unwrap()
    }

    #[test]
    fn maps_feature_key_schema() {
        let entitlements = parse(json!({
            "entitlements": [{
                "feature_key": "tracked_accounts",
                "entitlement_limit_max": null,
                "plans": [{ "plan_code": "free", "entitlement_limit_max": 2 }]
            }]
        }));

        assert_eq!(
            entitlements,
            vec![Entitlement::new(feature("tracked_accounts"), Limit::Unlimited)
                .with_plan(PlanLimit::new(plan("free"), Limit::Bounded(2)))]
        );
    }

    #[test]
    fn maps_feature_code_schema() {
        let entitlements = parse(json!({
            "entitlements": [{
                "feature_code": "tracked_accounts",
                "max": "10",
                "plans": [{ "key": "starter", "max": 2147483647 }]
            }]
        }));

        let ent = &entitlements[0];
        assert!(ent.is_for(&feature("tracked_accounts")));
        assert_eq!(ent.overall_limit(), Limit::Bounded(10));
        assert_eq!(ent.plans()[0].limit(), Limit::Unlimited);
    }

    #[test]
    fn every_plan_alias_is_matchable() {
        let entitlements = parse(json!({
            "entitlements": [{
                "feature_key": "seats",
                "max": 100,
                "plans": [{ "plan_code": "a", "key": "b", "code": "c", "max": 4 }]
            }]
        }));

        for code in ["a", "b", "c"] {
            assert_eq!(
                resolve_limit(&entitlements, &feature("seats"), &plan(code)),
                Limit::Bounded(4)
            );
        }
    }

    #[test]
    fn both_feature_aliases_are_matchable() {
        let entitlements = parse(json!({
            "entitlements": [{ "feature_key": "x", "feature_code": "y", "max": 1 }]
        }));

        assert!(entitlements[0].is_for(&feature("x")));
        assert!(entitlements[0].is_for(&feature("y")));
    }

    #[test]
    fn primary_limit_field_wins_when_present() {
        let entitlements = parse(json!({
            "entitlements": [{ "feature_key": "x", "entitlement_limit_max": 3, "max": 9 }]
        }));
        assert_eq!(entitlements[0].overall_limit(), Limit::Bounded(3));
    }

    #[test]
    fn missing_limit_fields_mean_unlimited() {
        let entitlements = parse(json!({ "entitlements": [{ "feature_key": "x" }] }));
        assert_eq!(entitlements[0].overall_limit(), Limit::Unlimited);
    }

    #[test]
    fn missing_or_null_list_is_empty() {
        assert!(parse(json!({})).is_empty());
        assert!(parse(json!({ "entitlements": null })).is_empty());
    }

    #[test]
    fn records_without_identifiers_are_dropped() {
        let entitlements = parse(json!({
            "entitlements": [
                { "max": 5 },
                { "feature_key": "x", "plans": [{ "max": 1 }, { "code": "free", "max": 2 }] }
            ]
        }));

        assert_eq!(entitlements.len(), 1);
        assert_eq!(entitlements[0].plans().len(), 1);
    }

    #[test]
    fn order_is_preserved() {
        let entitlements = parse(json!({
            "entitlements": [
                { "feature_key": "x", "max": 1 },
                { "feature_code": "x", "max": 2 }
            ]
        }));
        assert_eq!(resolve_limit(&entitlements, &feature("x"), &plan("any")), Limit::Bounded(1));
    }

    #[test]
    fn decimal_limits_are_truncated_not_rejected() {
        let entitlements = parse(json!({
            "entitlements": [{
                "feature_key": "tracked_accounts",
                "max": 5.0,
                "plans": [
                    { "plan_code": "free", "max": "2.5" },
                    { "plan_code": "starter", "entitlement_limit_max": 2.9 }
                ]
            }]
        }));

        assert_eq!(
            entitlements,
            vec![Entitlement::new(feature("tracked_accounts"), Limit::Bounded(5))
                .with_plan(PlanLimit::new(plan("free"), Limit::Bounded(2)))
                .with_plan(PlanLimit::new(plan("starter"), Limit::Bounded(2)))]
        );
    }

    #[test]
    fn negative_decimal_limit_fails_the_response() {
        let response: EntitlementsResponse = serde_json::from_value(json!({
            "entitlements": [{ "feature_key": "x", "max": -1.5 }]
        }))
        .unwrap();
        assert!(response.into_entitlements().is_err());
    }

    #[test]
    fn malformed_limit_fails_the_response() {
        let response: EntitlementsResponse = serde_json::from_value(json!({
            "entitlements": [{ "feature_key": "x", "max": "plenty" }]
        }))
        .unwrap();
        assert!(response.into_entitlements().is_err());
    }

    #[test]
    fn blank_customer_id_means_none() {
        let response: BillingIdentityResponse =
            serde_json::from_value(json!({ "customer_id": "" })).unwrap();
        assert!(response.customer_id().is_none());

        let response: BillingIdentityResponse =
            serde_json::from_value(json!({ "customer_id": "customer_7" })).unwrap();
        assert_eq!(response.customer_id().unwrap().as_str(), "customer_7");
    }
}
