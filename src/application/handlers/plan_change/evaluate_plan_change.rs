//! EvaluatePlanChangeHandler - Gates a plan change on current usage.
//!
//! Sequences the collaborator calls for one evaluation:
//!
//! ```text
//! validate trigger -> billing customer -> entitlements -> usage -> decide
//! ```
//!
//! # Failure policy
//!
//! | Step | On failure |
//! |------|------------|
//! | Trigger validation | Abort, no calls, change proceeds (fail-open) |
//! | Billing identity | Deny with the fixed verification message (fail-closed) |
//! | Entitlements | Continue with no entitlements (limit resolves to 0) |
//! | Usage | Continue, `UsageFallback` decides |
//! | Deny emission | Logged, outcome unchanged |
//!
//! Every collaborator call runs under its own timeout; a timeout is handled
//! exactly like an error from that step. Dropping the returned future
//! abandons any in-flight call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::Instrument;
use uuid::Uuid;

use super::trigger::{PlanChangeRequest, PlanChangeTrigger};
use crate::domain::entitlement::{resolve, Entitlement, Resolution, UNLIMITED_SENTINEL};
use crate::domain::foundation::{BillingCustomerId, StateMachine, ValidationError};
use crate::domain::gate::{decide, GateOutcome, GateStage, TrackedFeature, UsageFallback};
use crate::ports::{
    BillingIdentityLookup, CollaboratorError, EntitlementsSource, OutcomeEmitter, UsageSource,
};

/// Per-step time budgets for collaborator calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTimeouts {
    pub billing_identity: Duration,
    pub entitlements: Duration,
    pub usage: Duration,
    pub emit: Duration,
}

impl Default for GateTimeouts {
    fn default() -> Self {
        Self {
            billing_identity: Duration::from_secs(5),
            entitlements: Duration::from_secs(5),
            usage: Duration::from_secs(5),
            emit: Duration::from_secs(5),
        }
    }
}

impl GateTimeouts {
    /// Same budget for every step.
    pub fn uniform(budget: Duration) -> Self {
        Self {
            billing_identity: budget,
            entitlements: budget,
            usage: budget,
            emit: budget,
        }
    }
}

/// How an evaluation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// A decision was reached (usage based, or the billing-verification deny).
    Decided(GateOutcome),
    /// The trigger was incomplete; nothing was evaluated.
    Aborted(ValidationError),
}

impl Terminal {
    /// Whether the host should let the plan change proceed.
    pub fn permits_change(&self) -> bool {
        match self {
            Terminal::Decided(outcome) => outcome.is_allowed(),
            Terminal::Aborted(_) => true,
        }
    }

    pub fn outcome(&self) -> Option<&GateOutcome> {
        match self {
            Terminal::Decided(outcome) => Some(outcome),
            Terminal::Aborted(_) => None,
        }
    }
}

/// Record of one evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub evaluation_id: Uuid,
    pub terminal: Terminal,
    /// Every stage entered, in order, starting with `Start`.
    pub stages: Vec<GateStage>,
    /// Present once the `Deciding` stage ran.
    pub resolution: Option<Resolution>,
    /// Measured usage; `None` if never fetched or unavailable.
    pub usage: Option<u64>,
    pub evaluated_at: DateTime<Utc>,
}

impl Evaluation {
    pub fn permits_change(&self) -> bool {
        self.terminal.permits_change()
    }

    pub fn final_stage(&self) -> GateStage {
        self.stages.last().copied().unwrap_or(GateStage::Start)
    }
}

/// Handler for plan-change gating.
///
/// Holds no per-evaluation state; one instance serves concurrent evaluations.
pub struct EvaluatePlanChangeHandler {
    billing: Arc<dyn BillingIdentityLookup>,
    entitlements: Arc<dyn EntitlementsSource>,
    usage: Arc<dyn UsageSource>,
    emitter: Arc<dyn OutcomeEmitter>,
    feature: TrackedFeature,
    usage_fallback: UsageFallback,
    timeouts: GateTimeouts,
}

impl EvaluatePlanChangeHandler {
    pub fn new(
        billing: Arc<dyn BillingIdentityLookup>,
        entitlements: Arc<dyn EntitlementsSource>,
        usage: Arc<dyn UsageSource>,
        emitter: Arc<dyn OutcomeEmitter>,
        feature: TrackedFeature,
    ) -> Self {
        Self {
            billing,
            entitlements,
            usage,
            emitter,
            feature,
            usage_fallback: UsageFallback::default(),
            timeouts: GateTimeouts::default(),
        }
    }

    pub fn with_usage_fallback(mut self, usage_fallback: UsageFallback) -> Self {
        self.usage_fallback = usage_fallback;
        self
    }

    pub fn with_timeouts(mut self, timeouts: GateTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn feature(&self) -> &TrackedFeature {
        &self.feature
    }

    /// Evaluates one plan-change trigger. Never fails; every collaborator
    /// problem ends in a degraded decision or a fixed terminal outcome.
    pub async fn handle(&self, trigger: &PlanChangeTrigger) -> Evaluation {
        let evaluation_id = Uuid::new_v4();
        let span = tracing::info_span!("plan_change_evaluation", %evaluation_id);
        self.evaluate(evaluation_id, trigger).instrument(span).await
    }

    async fn evaluate(&self, evaluation_id: Uuid, trigger: &PlanChangeTrigger) -> Evaluation {
        let mut run = Run::new(evaluation_id);

        run.advance(GateStage::ValidatingInput);
        let request = match trigger.to_request() {
            Ok(request) => request,
            Err(err) => {
                tracing::info!(
                    missing_field = err.field(),
                    "Plan change trigger incomplete, skipping evaluation"
                );
                run.advance(GateStage::Aborted);
                return run.finish(Terminal::Aborted(err));
            }
        };

        tracing::info!(
            user_id = %request.user_id,
            organization = %request.organization_code,
            requested_plan = %request.requested_plan(),
            feature = %self.feature.key,
            "Evaluating plan change"
        );

        run.advance(GateStage::ResolvingCustomer);
        let Some(customer_id) = self.resolve_customer(&request).await else {
            run.advance(GateStage::Denied);
            let outcome = GateOutcome::billing_unverified();
            self.emit(&outcome).await;
            return run.finish(Terminal::Decided(outcome));
        };

        run.advance(GateStage::FetchingEntitlements);
        let entitlements = self.fetch_entitlements(&customer_id).await;

        run.advance(GateStage::FetchingUsage);
        let usage = self.fetch_usage(&request).await;
        run.usage = usage;

        run.advance(GateStage::Deciding);
        let resolution = resolve(&entitlements, &self.feature.key, request.requested_plan());
        run.resolution = Some(resolution);

        let outcome = match usage {
            Some(count) => decide(count, resolution.limit, &self.feature.label, &request.plan),
            None => self
                .usage_fallback
                .decide(resolution.limit, &self.feature.label, &request.plan),
        };

        tracing::info!(
            limit = %resolution.limit,
            limit_source = ?resolution.source,
            usage = ?usage,
            allowed = outcome.is_allowed(),
            "Plan change decided"
        );

        if outcome.is_allowed() {
            run.advance(GateStage::Allowed);
        } else {
            run.advance(GateStage::Denied);
            self.emit(&outcome).await;
        }

        run.finish(Terminal::Decided(outcome))
    }

    async fn resolve_customer(&self, request: &PlanChangeRequest) -> Option<BillingCustomerId> {
        let lookup = self.billing.get_billing_customer_id(&request.user_id);
        match with_timeout(self.timeouts.billing_identity, lookup).await {
            Ok(Some(customer_id)) => Some(customer_id),
            Ok(None) => {
                tracing::warn!(user_id = %request.user_id, "No billing customer for user");
                None
            }
            Err(err) => {
                tracing::warn!(
                    user_id = %request.user_id,
                    error = %err,
                    "Billing identity lookup failed"
                );
                None
            }
        }
    }

    async fn fetch_entitlements(&self, customer_id: &BillingCustomerId) -> Vec<Entitlement> {
        let fetch = self
            .entitlements
            .get_entitlements(customer_id, UNLIMITED_SENTINEL);
        match with_timeout(self.timeouts.entitlements, fetch).await {
            Ok(entitlements) => {
                if entitlements.is_empty() {
                    tracing::info!(customer_id = %customer_id, "Customer has no entitlements");
                }
                entitlements
            }
            Err(err) => {
                tracing::warn!(
                    customer_id = %customer_id,
                    error = %err,
                    "Entitlements unavailable, continuing without them"
                );
                Vec::new()
            }
        }
    }

    async fn fetch_usage(&self, request: &PlanChangeRequest) -> Option<u64> {
        let fetch = self.usage.get_usage(&request.user_id, &self.feature.key);
        match with_timeout(self.timeouts.usage, fetch).await {
            Ok(snapshot) => Some(snapshot.count),
            Err(err) => {
                tracing::warn!(
                    subject_id = %request.user_id,
                    error = %err,
                    fallback = ?self.usage_fallback,
                    "Usage unavailable, applying fallback policy"
                );
                None
            }
        }
    }

    async fn emit(&self, outcome: &GateOutcome) {
        let GateOutcome::Deny { summary, .. } = outcome else {
            return;
        };
        let reasons = outcome.reason_messages();
        let emission = self.emitter.emit_deny(summary, &reasons);
        if let Err(err) = with_timeout(self.timeouts.emit, emission).await {
            tracing::error!(error = %err, "Failed to emit deny outcome");
        }
    }
}

/// Runs a collaborator call under a time budget.
async fn with_timeout<T, F>(budget: Duration, call: F) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(budget, call).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::timeout(budget)),
    }
}

/// Mutable bookkeeping for one evaluation.
struct Run {
    evaluation_id: Uuid,
    stage: GateStage,
    stages: Vec<GateStage>,
    resolution: Option<Resolution>,
    usage: Option<u64>,
}

impl Run {
    fn new(evaluation_id: Uuid) -> Self {
        Self {
            evaluation_id,
            stage: GateStage::Start,
            stages: vec![GateStage::Start],
            resolution: None,
            usage: None,
        }
    }

    fn advance(&mut self, next: GateStage) {
        match self.stage.transition_to(next) {
            Ok(stage) => {
                tracing::debug!(from = ?self.stage, to = ?stage, "Gate stage transition");
                self.stage = stage;
                self.stages.push(stage);
            }
            Err(err) => {
                debug_assert!(false, "{}", err);
                tracing::error!(error = %err, "Invalid gate stage transition");
            }
        }
    }

    fn finish(self, terminal: Terminal) -> Evaluation {
        Evaluation {
            evaluation_id: self.evaluation_id,
            terminal,
            stages: self.stages,
            resolution: self.resolution,
            usage: self.usage,
            evaluated_at: Utc::now(),
        }
    }
}
