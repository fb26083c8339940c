//! Billing management API client.

use async_trait::async_trait;

use super::wire::{BillingIdentityResponse, EntitlementsResponse};
use crate::adapters::rest::RestClient;
use crate::domain::entitlement::Entitlement;
use crate::domain::foundation::{BillingCustomerId, UserId};
use crate::ports::{BillingIdentityLookup, CollaboratorError, EntitlementsSource};

/// Resolves billing identities and entitlements over HTTP.
///
/// Endpoints, relative to the configured base URL:
/// - `GET api/v1/users/{user_id}/billing` returns `{ "customer_id": ... }`
/// - `GET api/v1/billing/entitlements?customer_id=..&expand=plans&max_value=..`
#[derive(Clone)]
pub struct BillingApiClient {
    rest: RestClient,
}

impl BillingApiClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl BillingIdentityLookup for BillingApiClient {
    async fn get_billing_customer_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BillingCustomerId>, CollaboratorError> {
        let url = self
            .rest
            .url(&["api", "v1", "users", user_id.as_str(), "billing"]);
        let profile: Option<BillingIdentityResponse> = self.rest.get_json(url, &[]).await?;

        let customer_id = profile.and_then(BillingIdentityResponse::customer_id);
        if customer_id.is_none() {
            tracing::debug!(user_id = %user_id, "No billing customer on record");
        }
        Ok(customer_id)
    }
}

#[async_trait]
impl EntitlementsSource for BillingApiClient {
    async fn get_entitlements(
        &self,
        customer_id: &BillingCustomerId,
        feature_max_fallback: u32,
    ) -> Result<Vec<Entitlement>, CollaboratorError> {
        let url = self.rest.url(&["api", "v1", "billing", "entitlements"]);
        let query = [
            ("customer_id", customer_id.to_string()),
            ("expand", "plans".to_string()),
            ("max_value", feature_max_fallback.to_string()),
        ];

        let response: Option<EntitlementsResponse> = self.rest.get_json(url, &query).await?;
        let Some(response) = response else {
            return Err(CollaboratorError::not_found("entitlements"));
        };

        response.into_entitlements().map_err(|e| {
            tracing::warn!(customer_id = %customer_id, error = %e, "Malformed entitlement payload");
            CollaboratorError::invalid_response(e.to_string())
        })
    }
}
