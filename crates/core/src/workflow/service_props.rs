//! Property-based tests for WorkflowService.

use proptest::prelude::*;
use procura_shared::types::EmployeeId;

use crate::request::RequestStatus;
use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{Decision, WorkflowAction};

/// Strategy for generating random RequestStatus values.
fn arb_status() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        Just(RequestStatus::Draft),
        Just(RequestStatus::Submitted),
        Just(RequestStatus::Reviewed),
        Just(RequestStatus::Approved),
        Just(RequestStatus::Confirmed),
        Just(RequestStatus::Finished),
        Just(RequestStatus::Rejected),
    ]
}

/// Strategy for generating employee ids.
fn arb_employee() -> impl Strategy<Value = EmployeeId> {
    "[A-Z]{1,3}[0-9]{1,5}".prop_map(EmployeeId::new)
}

fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Approve), Just(Decision::Reject)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every successful action lands on a status reachable by a valid transition.
    #[test]
    fn prop_decisions_follow_transition_table(
        status in arb_status(),
        decision in arb_decision(),
        user in arb_employee()
    ) {
        if let Ok(action) = WorkflowService::decide(status, decision, user, None) {
            prop_assert!(WorkflowService::is_valid_transition(status, action.new_status()));
        }
    }

    /// Closed requests refuse every decision as view-only.
    #[test]
    fn prop_closed_requests_are_view_only(
        status in prop_oneof![Just(RequestStatus::Finished), Just(RequestStatus::Rejected)],
        decision in arb_decision(),
        user in arb_employee()
    ) {
        let result = WorkflowService::decide(status, decision, user, None);
        prop_assert_eq!(result, Err(WorkflowError::ViewOnly(status)));
    }

    /// Approval advances exactly one step and the label names the new status.
    #[test]
    fn prop_approve_advances_one_step(status in arb_status(), user in arb_employee()) {
        match WorkflowService::approve(status, user, None) {
            Ok(action) => {
                prop_assert!(status.awaits_decision());
                prop_assert_eq!(action.new_status().code(), status.code() + 1);
                prop_assert_eq!(action.activity(), action.new_status().as_str());
            }
            Err(_) => prop_assert!(!status.awaits_decision()),
        }
    }

    /// Only drafts can be submitted.
    #[test]
    fn prop_submit_only_from_draft(status in arb_status(), user in arb_employee()) {
        let result = WorkflowService::submit(status, user.clone());
        if status == RequestStatus::Draft {
            let is_submit = matches!(
                result,
                Ok(WorkflowAction::Submit { ref submitted_by, .. }) if *submitted_by == user
            );
            prop_assert!(is_submit);
        } else {
            let is_invalid = matches!(result, Err(WorkflowError::InvalidTransition { .. }));
            prop_assert!(is_invalid);
        }
    }

    /// Nothing ever transitions back into Draft.
    #[test]
    fn prop_no_transition_into_draft(from in arb_status()) {
        prop_assert!(!WorkflowService::is_valid_transition(from, RequestStatus::Draft));
    }
}

#[cfg(test)]
mod edge_case_tests {
    use super::*;

    /// All 49 combinations of is_valid_transition.
    #[test]
    fn test_is_valid_transition_all_combinations() {
        let statuses = [
            RequestStatus::Draft,
            RequestStatus::Submitted,
            RequestStatus::Reviewed,
            RequestStatus::Approved,
            RequestStatus::Confirmed,
            RequestStatus::Finished,
            RequestStatus::Rejected,
        ];
        let valid = [
            (RequestStatus::Draft, RequestStatus::Submitted),
            (RequestStatus::Submitted, RequestStatus::Reviewed),
            (RequestStatus::Reviewed, RequestStatus::Approved),
            (RequestStatus::Approved, RequestStatus::Confirmed),
            (RequestStatus::Confirmed, RequestStatus::Finished),
            (RequestStatus::Submitted, RequestStatus::Rejected),
            (RequestStatus::Reviewed, RequestStatus::Rejected),
            (RequestStatus::Approved, RequestStatus::Rejected),
            (RequestStatus::Confirmed, RequestStatus::Rejected),
        ];

        for from in statuses {
            for to in statuses {
                assert_eq!(
                    WorkflowService::is_valid_transition(from, to),
                    valid.contains(&(from, to)),
                    "is_valid_transition({from:?}, {to:?})"
                );
            }
        }
    }
}
