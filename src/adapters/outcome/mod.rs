//! Outcome emitters: where a denial goes once it is decided.

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use crate::adapters::rest::RestClient;
use crate::ports::{CollaboratorError, OutcomeEmitter};

/// Body posted to the host's deny callback.
#[derive(Debug, Clone, Serialize)]
struct DenyCallback<'a> {
    decision: &'static str,
    summary: &'a str,
    reasons: &'a [String],
}

/// Posts denials to a host-provided callback URL.
#[derive(Clone)]
pub struct CallbackOutcomeEmitter {
    rest: RestClient,
    callback_url: Url,
}

impl CallbackOutcomeEmitter {
    pub fn new(rest: RestClient) -> Self {
        let callback_url = rest.base_url().clone();
        Self { rest, callback_url }
    }
}

#[async_trait]
impl OutcomeEmitter for CallbackOutcomeEmitter {
    async fn emit_deny(&self, summary: &str, reasons: &[String]) -> Result<(), CollaboratorError> {
        let body = DenyCallback {
            decision: "deny",
            summary,
            reasons,
        };
        self.rest.post_json(self.callback_url.clone(), &body).await
    }
}

/// Writes denials to the log. Used when no callback is configured and the
/// HTTP response is the only channel back to the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOutcomeEmitter;

#[async_trait]
impl OutcomeEmitter for LoggingOutcomeEmitter {
    async fn emit_deny(&self, summary: &str, reasons: &[String]) -> Result<(), CollaboratorError> {
        tracing::info!(summary = %summary, reasons = ?reasons, "Plan change denied");
        Ok(())
    }
}
