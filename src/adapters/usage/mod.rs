//! Usage metering API adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::adapters::rest::RestClient;
use crate::domain::foundation::{FeatureKey, UserId};
use crate::domain::gate::UsageSnapshot;
use crate::ports::{CollaboratorError, UsageSource};

/// Response of `GET api/v1/usage/{feature_key}/subjects/{subject_id}`.
#[derive(Debug, Clone, Deserialize)]
struct UsageResponse {
    count: u64,
}

/// Reads live usage counts from the metering service.
///
/// A missing subject is reported as `NotFound` rather than zero usage, so
/// the gate's fallback policy decides what it means.
#[derive(Clone)]
pub struct UsageApiClient {
    rest: RestClient,
}

impl UsageApiClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl UsageSource for UsageApiClient {
    async fn get_usage(
        &self,
        subject_id: &UserId,
        feature_key: &FeatureKey,
    ) -> Result<UsageSnapshot, CollaboratorError> {
        let url = self.rest.url(&[
            "api",
            "v1",
            "usage",
            feature_key.as_str(),
            "subjects",
            subject_id.as_str(),
        ]);

        let response: Option<UsageResponse> = self.rest.get_json(url, &[]).await?;
        match response {
            Some(UsageResponse { count }) => Ok(UsageSnapshot {
                subject_id: subject_id.clone(),
                count,
            }),
            None => Err(CollaboratorError::not_found("usage subject")),
        }
    }
}
