//! Plan-change trigger payload and its validated form.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrganizationCode, PlanCode, UserId, ValidationError};
use crate::domain::gate::PlanContext;

/// Trigger payload as the host sends it.
///
/// Every field is optional on the wire; [`PlanChangeTrigger::to_request`]
/// decides whether the payload is usable.
///
/// ```json
/// {
///   "context": {
///     "billing": { "requestedPlanCode": "free", "currentPlanCode": "pro" },
///     "organization": { "code": "org_123" },
///     "user": { "id": "kp_abc" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanChangeTrigger {
    #[serde(default)]
    pub context: TriggerContext,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerContext {
    #[serde(default)]
    pub billing: BillingContext,
    #[serde(default)]
    pub organization: OrganizationContext,
    #[serde(default)]
    pub user: UserContext,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingContext {
    pub requested_plan_code: Option<String>,
    pub current_plan_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationContext {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub id: Option<String>,
}

impl PlanChangeTrigger {
    /// Convenience constructor for the three required fields.
    pub fn new(
        user_id: impl Into<String>,
        organization_code: impl Into<String>,
        requested_plan_code: impl Into<String>,
    ) -> Self {
        Self {
            context: TriggerContext {
                billing: BillingContext {
                    requested_plan_code: Some(requested_plan_code.into()),
                    current_plan_code: None,
                },
                organization: OrganizationContext {
                    code: Some(organization_code.into()),
                },
                user: UserContext {
                    id: Some(user_id.into()),
                },
            },
        }
    }

    pub fn with_current_plan(mut self, current_plan_code: impl Into<String>) -> Self {
        self.context.billing.current_plan_code = Some(current_plan_code.into());
        self
    }

    /// Extracts the required fields.
    ///
    /// Fails with `EmptyField` naming the first field that is missing or blank.
    /// A blank current plan is treated as unknown rather than as an error.
    pub fn to_request(&self) -> Result<PlanChangeRequest, ValidationError> {
        let ctx = &self.context;
        let user_id = UserId::new(ctx.user.id.clone().unwrap_or_default())?;
        let organization_code =
            OrganizationCode::new(ctx.organization.code.clone().unwrap_or_default())?;
        let requested_plan =
            PlanCode::new(ctx.billing.requested_plan_code.clone().unwrap_or_default())?;
        let current_plan = ctx
            .billing
            .current_plan_code
            .clone()
            .and_then(|code| PlanCode::new(code).ok());

        Ok(PlanChangeRequest {
            user_id,
            organization_code,
            plan: PlanContext::new(requested_plan).with_current_plan(current_plan),
        })
    }
}

/// A validated plan-change request. Lives for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanChangeRequest {
    pub user_id: UserId,
    pub organization_code: OrganizationCode,
    pub plan: PlanContext,
}

impl PlanChangeRequest {
    pub fn requested_plan(&self) -> &PlanCode {
        &self.plan.requested_plan
    }
}
