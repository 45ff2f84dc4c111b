//! Workflow service for purchase request state transitions.
//!
//! This module implements the state machine the backend enforces, so the
//! client can refuse an impossible action before issuing a call.

use chrono::Utc;
use procura_shared::types::EmployeeId;

use crate::request::RequestStatus;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{Decision, WorkflowAction};

/// Stateless service for purchase request workflow transitions.
///
/// All methods are associated functions that validate a transition and
/// return the matching `WorkflowAction`.
pub struct WorkflowService;

impl WorkflowService {
    /// Submit a draft request.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Submit)` if the request is a draft
    /// * `Err(WorkflowError::InvalidTransition)` otherwise
    pub fn submit(
        current_status: RequestStatus,
        submitted_by: EmployeeId,
    ) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            RequestStatus::Draft => Ok(WorkflowAction::Submit {
                new_status: RequestStatus::Submitted,
                submitted_by,
                submitted_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Submitted,
            }),
        }
    }

    /// Returns the status and activity label one approval step ahead.
    #[must_use]
    pub const fn next_approval_step(
        current_status: RequestStatus,
    ) -> Option<(RequestStatus, &'static str)> {
        match current_status {
            RequestStatus::Submitted => Some((RequestStatus::Reviewed, "Reviewed")),
            RequestStatus::Reviewed => Some((RequestStatus::Approved, "Approved")),
            RequestStatus::Approved => Some((RequestStatus::Confirmed, "Confirmed")),
            _ => None,
        }
    }

    /// Approve the current reviewing step.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Approve)` for Submitted, Reviewed and Approved
    /// * `Err(WorkflowError::ViewOnly)` for Finished and Rejected
    /// * `Err(WorkflowError::NothingToApprove)` otherwise
    pub fn approve(
        current_status: RequestStatus,
        decided_by: EmployeeId,
        remark: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        if current_status.is_view_only() {
            return Err(WorkflowError::ViewOnly(current_status));
        }

        let (new_status, activity) = Self::next_approval_step(current_status)
            .ok_or(WorkflowError::NothingToApprove(current_status))?;

        Ok(WorkflowAction::Approve {
            new_status,
            activity,
            decided_by,
            decided_at: Utc::now(),
            remark: normalize_remark(remark),
        })
    }

    /// Reject a request under review.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Reject)` for Submitted, Reviewed, Approved, Confirmed
    /// * `Err(WorkflowError::ViewOnly)` for Finished and Rejected
    /// * `Err(WorkflowError::InvalidTransition)` for Draft
    pub fn reject(
        current_status: RequestStatus,
        decided_by: EmployeeId,
        remark: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        if current_status.is_view_only() {
            return Err(WorkflowError::ViewOnly(current_status));
        }

        if !Self::is_valid_transition(current_status, RequestStatus::Rejected) {
            return Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Rejected,
            });
        }

        Ok(WorkflowAction::Reject {
            new_status: RequestStatus::Rejected,
            decided_by,
            decided_at: Utc::now(),
            remark: normalize_remark(remark),
        })
    }

    /// Take a reviewing decision.
    pub fn decide(
        current_status: RequestStatus,
        decision: Decision,
        decided_by: EmployeeId,
        remark: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        match decision {
            Decision::Approve => Self::approve(current_status, decided_by, remark),
            Decision::Reject => Self::reject(current_status, decided_by, remark),
        }
    }

    /// Record goods as received on a confirmed request.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Receive)` if the request is confirmed
    /// * `Err(WorkflowError::InvalidTransition)` otherwise
    pub fn receive(
        current_status: RequestStatus,
        received_by: EmployeeId,
    ) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            RequestStatus::Confirmed => Ok(WorkflowAction::Receive {
                new_status: RequestStatus::Finished,
                received_by,
                received_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Finished,
            }),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Draft → Submitted
    /// - Submitted → Reviewed → Approved → Confirmed → Finished
    /// - Submitted | Reviewed | Approved | Confirmed → Rejected
    #[must_use]
    pub fn is_valid_transition(from: RequestStatus, to: RequestStatus) -> bool {
        matches!(
            (from, to),
            (RequestStatus::Draft, RequestStatus::Submitted)
                | (RequestStatus::Submitted, RequestStatus::Reviewed)
                | (RequestStatus::Reviewed, RequestStatus::Approved)
                | (RequestStatus::Approved, RequestStatus::Confirmed)
                | (RequestStatus::Confirmed, RequestStatus::Finished)
                | (
                    RequestStatus::Submitted
                        | RequestStatus::Reviewed
                        | RequestStatus::Approved
                        | RequestStatus::Confirmed,
                    RequestStatus::Rejected
                )
        )
    }
}

fn normalize_remark(remark: Option<String>) -> Option<String> {
    remark
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}
