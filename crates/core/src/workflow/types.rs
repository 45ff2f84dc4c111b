//! Workflow domain types for purchase request decisions.

use chrono::{DateTime, Utc};
use procura_shared::types::EmployeeId;
use serde::{Deserialize, Serialize};

use crate::request::RequestStatus;

/// Decision taken on a request under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Move the request one reviewing step forward.
    Approve,
    /// Stop the request.
    Reject,
}

/// Workflow action representing a state transition with audit data.
///
/// Each variant captures the resulting status and the activity label the
/// backend records for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Submit a draft request.
    Submit {
        /// The new status after submission.
        new_status: RequestStatus,
        /// The employee submitting.
        submitted_by: EmployeeId,
        /// When the request was submitted.
        submitted_at: DateTime<Utc>,
    },
    /// Approve the current reviewing step.
    Approve {
        /// The new status after this step.
        new_status: RequestStatus,
        /// Activity label recorded by the backend, e.g. "Reviewed".
        activity: &'static str,
        /// The employee deciding.
        decided_by: EmployeeId,
        /// When the decision was taken.
        decided_at: DateTime<Utc>,
        /// Optional remark.
        remark: Option<String>,
    },
    /// Reject the request.
    Reject {
        /// The new status after rejection.
        new_status: RequestStatus,
        /// The employee deciding.
        decided_by: EmployeeId,
        /// When the decision was taken.
        decided_at: DateTime<Utc>,
        /// Optional remark.
        remark: Option<String>,
    },
    /// Record goods as received on a confirmed request.
    Receive {
        /// The new status after receiving.
        new_status: RequestStatus,
        /// The employee receiving.
        received_by: EmployeeId,
        /// When the goods were received.
        received_at: DateTime<Utc>,
    },
}

impl WorkflowAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> RequestStatus {
        match self {
            Self::Submit { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::Receive { new_status, .. } => *new_status,
        }
    }

    /// Returns the activity label the backend records for this action.
    #[must_use]
    pub fn activity(&self) -> &'static str {
        match self {
            Self::Approve { activity, .. } => *activity,
            Self::Submit { .. } | Self::Reject { .. } | Self::Receive { .. } => {
                self.new_status().as_str()
            }
        }
    }

    /// Returns the remark attached to a decision, if any.
    #[must_use]
    pub fn remark(&self) -> Option<&str> {
        match self {
            Self::Approve { remark, .. } | Self::Reject { remark, .. } => remark.as_deref(),
            Self::Submit { .. } | Self::Receive { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_of_approve_is_step_label() {
        let action = WorkflowAction::Approve {
            new_status: RequestStatus::Reviewed,
            activity: "Reviewed",
            decided_by: EmployeeId::new("E1"),
            decided_at: Utc::now(),
            remark: Some("ok".to_string()),
        };
        assert_eq!(action.activity(), "Reviewed");
        assert_eq!(action.remark(), Some("ok"));
    }

    #[test]
    fn test_activity_of_reject_is_status_label() {
        let action = WorkflowAction::Reject {
            new_status: RequestStatus::Rejected,
            decided_by: EmployeeId::new("E1"),
            decided_at: Utc::now(),
            remark: None,
        };
        assert_eq!(action.activity(), "Rejected");
        assert_eq!(action.remark(), None);
    }
}
