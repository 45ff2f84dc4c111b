//! Workflow error types for purchase request decisions.

use thiserror::Error;

use crate::request::RequestStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: RequestStatus,
        /// The attempted target status.
        to: RequestStatus,
    },

    /// No approval step follows the current status.
    #[error("No approval step follows status {0}")]
    NothingToApprove(RequestStatus),

    /// The request is closed and can only be viewed.
    #[error("Request is {0} and can only be viewed")]
    ViewOnly(RequestStatus),
}

impl WorkflowError {
    /// Returns the error code for reporting.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NothingToApprove(_) => "NOTHING_TO_APPROVE",
            Self::ViewOnly(_) => "VIEW_ONLY",
        }
    }
}
