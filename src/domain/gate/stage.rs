//! Stages of a single plan-change evaluation.
//!
//! ```text
//! Start -> ValidatingInput -> ResolvingCustomer -> FetchingEntitlements
//!       -> FetchingUsage -> Deciding -> Allowed | Denied
//!
//! ValidatingInput   --[required field missing]--> Aborted
//! ResolvingCustomer --[no billing customer]-----> Denied
//! ```

use serde::Serialize;

use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStage {
    Start,
    ValidatingInput,
    ResolvingCustomer,
    FetchingEntitlements,
    FetchingUsage,
    Deciding,
    Allowed,
    Denied,
    Aborted,
}

impl StateMachine for GateStage {
    fn valid_transitions(&self) -> Vec<Self> {
        use GateStage::*;
        match self {
            Start => vec![ValidatingInput],
            ValidatingInput => vec![ResolvingCustomer, Aborted],
            ResolvingCustomer => vec![FetchingEntitlements, Denied],
            FetchingEntitlements => vec![FetchingUsage],
            FetchingUsage => vec![Deciding],
            Deciding => vec![Allowed, Denied],
            Allowed | Denied | Aborted => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_valid() {
        let path = [
            GateStage::Start,
            GateStage::ValidatingInput,
            GateStage::ResolvingCustomer,
            GateStage::FetchingEntitlements,
            GateStage::FetchingUsage,
            GateStage::Deciding,
            GateStage::Allowed,
        ];
        for pair in path.windows(2) {
            assert_eq!(pair[0].transition_to(pair[1]), Ok(pair[1]));
        }
    }

    #[test]
    fn only_validation_can_abort() {
        assert!(GateStage::ValidatingInput.can_transition_to(&GateStage::Aborted));
        assert!(!GateStage::ResolvingCustomer.can_transition_to(&GateStage::Aborted));
        assert!(!GateStage::FetchingUsage.can_transition_to(&GateStage::Aborted));
    }

    #[test]
    fn customer_resolution_can_deny_directly() {
        assert!(GateStage::ResolvingCustomer.can_transition_to(&GateStage::Denied));
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(GateStage::ValidatingInput
            .transition_to(GateStage::Deciding)
            .is_err());
    }

    #[test]
    fn terminal_stages() {
        assert!(GateStage::Allowed.is_terminal());
        assert!(GateStage::Denied.is_terminal());
        assert!(GateStage::Aborted.is_terminal());
        assert!(!GateStage::Deciding.is_terminal());
    }
}
