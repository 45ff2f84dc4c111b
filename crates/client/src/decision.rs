//! Reviewing decisions and goods receipt.
//!
//! Approving is gated on the reviewer having opened every document of the
//! request in the current [`ReviewSession`]. Rejecting is not gated.

use std::sync::Arc;

use procura_core::request::PurchaseRequest;
use procura_core::review::ReviewSession;
use procura_core::workflow::{WorkflowAction, WorkflowError, WorkflowService};
use procura_shared::AppError;
use procura_shared::types::{DocumentId, EmployeeId, RequestNumber};
use thiserror::Error;
use tracing::info;

use crate::api::{ClientError, ProcurementApi, StatusChange};

/// Errors from taking a decision.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecisionError {
    /// The request or its documents could not be loaded.
    #[error("request is unavailable: {0}")]
    Unavailable(ClientError),

    /// Some documents have not been opened yet.
    #[error("{} document(s) must be viewed before approving", .0.len())]
    UnviewedDocuments(Vec<DocumentId>),

    /// The request status does not allow the decision.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Recording the decision failed.
    #[error("decision could not be recorded: {0}")]
    Transition(ClientError),
}

impl DecisionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(e) => e.error_code(),
            Self::UnviewedDocuments(_) => "UNVIEWED_DOCUMENTS",
            Self::Workflow(e) => e.error_code(),
            Self::Transition(_) => "TRANSITION_FAILED",
        }
    }
}

impl From<DecisionError> for AppError {
    fn from(err: DecisionError) -> Self {
        match err {
            DecisionError::Unavailable(e) | DecisionError::Transition(e) => e.into(),
            other => Self::Forbidden(other.to_string()),
        }
    }
}

/// Takes reviewing decisions on requests.
pub struct DecisionService<A: ProcurementApi> {
    api: Arc<A>,
}

impl<A: ProcurementApi> DecisionService<A> {
    /// Creates a decision service.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Approves the current reviewing step.
    ///
    /// Finished and rejected requests are view-only. Nothing is recorded
    /// unless every document was opened in `session`.
    pub async fn approve(
        &self,
        number: &RequestNumber,
        session: &ReviewSession,
        decided_by: EmployeeId,
        remark: Option<String>,
    ) -> Result<StatusChange, DecisionError> {
        let request = self.load(number).await?;
        let action = WorkflowService::approve(request.status, decided_by, remark)?;

        let documents = self
            .api
            .list_documents(number)
            .await
            .map_err(DecisionError::Unavailable)?;
        let unviewed: Vec<DocumentId> = session
            .unviewed(&documents)
            .into_iter()
            .map(|doc| doc.id)
            .collect();
        if !unviewed.is_empty() {
            return Err(DecisionError::UnviewedDocuments(unviewed));
        }

        self.record(number, &action).await
    }

    /// Rejects the request.
    pub async fn reject(
        &self,
        number: &RequestNumber,
        decided_by: EmployeeId,
        remark: Option<String>,
    ) -> Result<StatusChange, DecisionError> {
        let request = self.load(number).await?;
        let action = WorkflowService::reject(request.status, decided_by, remark)?;
        self.record(number, &action).await
    }

    /// Records goods received on a confirmed request.
    pub async fn receive(
        &self,
        number: &RequestNumber,
        received_by: EmployeeId,
    ) -> Result<StatusChange, DecisionError> {
        let request = self.load(number).await?;
        let action = WorkflowService::receive(request.status, received_by)?;
        self.record(number, &action).await
    }

    async fn load(&self, number: &RequestNumber) -> Result<PurchaseRequest, DecisionError> {
        self.api
            .get_request(number)
            .await
            .map_err(DecisionError::Unavailable)
    }

    async fn record(
        &self,
        number: &RequestNumber,
        action: &WorkflowAction,
    ) -> Result<StatusChange, DecisionError> {
        let change = StatusChange::from(action);
        self.api
            .record_status(number, &change)
            .await
            .map_err(DecisionError::Transition)?;
        info!(pr_number = %number, activity = %change.activity, "decision recorded");
        Ok(change)
    }
}
