//! Status transition contract

use mx_core::error::MxError;
use mx_core::result::MxResult;
use mx_models::WorkOrderStatus;

/// Outcome of checking a requested status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCheck {
    /// Target equals the current status; nothing to record
    Unchanged,
    /// Listed in the transition table
    Allowed,
    /// Outside the table, let through because enforcement is off
    Forced,
}

impl TransitionCheck {
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Decides whether a status change may be applied
#[derive(Debug, Clone, Copy)]
pub struct StatusTransitionContract {
    enforce: bool,
}

impl Default for StatusTransitionContract {
    fn default() -> Self {
        Self::enforcing()
    }
}

impl StatusTransitionContract {
    pub fn new(enforce: bool) -> Self {
        Self { enforce }
    }

    pub fn enforcing() -> Self {
        Self { enforce: true }
    }

    pub fn check(&self, from: WorkOrderStatus, to: WorkOrderStatus) -> MxResult<TransitionCheck> {
        if from == to {
            return Ok(TransitionCheck::Unchanged);
        }
        if from.can_transition_to(to) {
            return Ok(TransitionCheck::Allowed);
        }
        if self.enforce {
            Err(MxError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            })
        } else {
            Ok(TransitionCheck::Forced)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WorkOrderStatus::*;

    #[test]
    fn test_legal_transition() {
        let contract = StatusTransitionContract::enforcing();
        assert_eq!(contract.check(OnHold, InProgress).unwrap(), TransitionCheck::Allowed);
    }

    #[test]
    fn test_same_status_is_unchanged() {
        let contract = StatusTransitionContract::enforcing();
        let check = contract.check(Open, Open).unwrap();
        assert_eq!(check, TransitionCheck::Unchanged);
        assert!(!check.is_change());
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let contract = StatusTransitionContract::enforcing();
        let err = contract.check(Open, Completed).unwrap_err();
        assert!(matches!(err, MxError::InvalidTransition { ref from, ref to } if from == "open" && to == "completed"));
    }

    #[test]
    fn test_illegal_transition_forced_when_not_enforcing() {
        let contract = StatusTransitionContract::new(false);
        assert_eq!(contract.check(Archived, Open).unwrap(), TransitionCheck::Forced);
    }
}
