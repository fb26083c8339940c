//! Data Transfer Objects for the plan-change HTTP API.
//!
//! The request body is `PlanChangeTrigger` itself, so only responses live here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{Evaluation, Terminal};
use crate::domain::gate::GateOutcome;

/// Decision as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionView {
    Allow,
    Deny,
    /// Trigger incomplete; the host should let the change proceed.
    Aborted,
}

/// Response for a plan-change evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub evaluation_id: Uuid,
    pub decision: DecisionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
    /// Field that made the trigger incomplete, for aborted evaluations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_field: Option<String>,
    pub evaluated_at: DateTime<Utc>,
}

impl From<&Evaluation> for EvaluationResponse {
    fn from(evaluation: &Evaluation) -> Self {
        let mut response = Self {
            evaluation_id: evaluation.evaluation_id,
            decision: DecisionView::Allow,
            summary: None,
            reasons: None,
            missing_field: None,
            evaluated_at: evaluation.evaluated_at,
        };

        match &evaluation.terminal {
            Terminal::Decided(outcome) => {
                if let GateOutcome::Deny { summary, .. } = outcome {
                    response.decision = DecisionView::Deny;
                    response.summary = Some(summary.clone());
                    response.reasons = Some(outcome.reason_messages());
                }
            }
            Terminal::Aborted(err) => {
                response.decision = DecisionView::Aborted;
                response.missing_field = Some(err.field().to_string());
            }
        }
        response
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
