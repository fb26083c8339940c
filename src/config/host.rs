//! Host callback configuration

use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Where denials are reported, besides the HTTP response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostConfig {
    /// Deny callback URL; denials are only logged when unset
    pub deny_callback_url: Option<String>,

    /// Bearer token for the callback
    pub callback_token: Option<SecretString>,

    /// Callback time budget in milliseconds
    pub callback_timeout_ms: Option<u64>,
}

impl HostConfig {
    pub fn callback_timeout(&self) -> Duration {
        Duration::from_millis(self.callback_timeout_ms.unwrap_or(5_000))
    }

    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        let Some(callback) = &self.deny_callback_url else {
            return Ok(());
        };
        let url = Url::parse(callback).map_err(|_| ValidationError::InvalidUrl("host callback"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl("host callback"));
        }
        if production && url.scheme() != "https" {
            return Err(ValidationError::UrlMustBeHttps("host callback"));
        }
        if matches!(self.callback_timeout_ms, Some(0)) {
            return Err(ValidationError::InvalidCollaboratorTimeout("host callback"));
        }
        Ok(())
    }
}
