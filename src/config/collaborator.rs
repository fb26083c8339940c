//! Collaborator API configuration (billing, usage)

use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Connection settings for one collaborator HTTP API.
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorConfig {
    /// Base URL, e.g. `https://billing.internal/`
    pub api_base_url: String,

    /// Bearer token, if the API requires one
    pub api_token: Option<SecretString>,

    /// Per-call time budget in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl CollaboratorConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_token: None,
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate, naming the section in errors.
    pub fn validate(&self, section: &'static str, production: bool) -> Result<(), ValidationError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired(section));
        }
        let url = Url::parse(&self.api_base_url).map_err(|_| ValidationError::InvalidUrl(section))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ValidationError::InvalidUrl(section));
        }
        if production && url.scheme() != "https" {
            return Err(ValidationError::UrlMustBeHttps(section));
        }
        if self.timeout_ms == 0 || self.timeout_ms > 60_000 {
            return Err(ValidationError::InvalidCollaboratorTimeout(section));
        }
        Ok(())
    }
}

fn default_timeout_ms() -> u64 {
    5_000
}
