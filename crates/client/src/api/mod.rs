//! Procurement backend API.
//!
//! # Modules
//!
//! - `error` - Client error types
//! - `http` - `reqwest` implementation of the API

pub mod error;
pub mod http;

use std::future::Future;

use chrono::{DateTime, Utc};
use procura_core::amortization::AmortizationPeriod;
use procura_core::request::{
    ApprovalAssignment, BasicInfo, Document, LineItem, PendingDocument, PurchaseOrder,
    PurchaseRequest, RequestFilter, RequestStatus, RequestSummary,
};
use procura_core::section::{AdditionalInfoRecord, PurchaseSubType, PurchaseType};
use procura_core::workflow::WorkflowAction;
use procura_shared::types::{
    DocumentId, EmployeeId, OrderNumber, PageRequest, PageResponse, RequestNumber,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::ClientError;
pub use http::HttpProcurementApi;

/// Result type of backend calls.
pub type ApiResult<T> = Result<T, ClientError>;

/// Status change recorded by the backend for a workflow action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    /// Status after the action.
    pub status: RequestStatus,
    /// Activity label, e.g. "Reviewed".
    pub activity: String,
    /// Employee acting.
    pub actor: EmployeeId,
    /// When the action was taken.
    pub at: DateTime<Utc>,
    /// Optional remark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl From<&WorkflowAction> for StatusChange {
    fn from(action: &WorkflowAction) -> Self {
        let (actor, at) = match action {
            WorkflowAction::Submit {
                submitted_by,
                submitted_at,
                ..
            } => (submitted_by, submitted_at),
            WorkflowAction::Approve {
                decided_by,
                decided_at,
                ..
            }
            | WorkflowAction::Reject {
                decided_by,
                decided_at,
                ..
            } => (decided_by, decided_at),
            WorkflowAction::Receive {
                received_by,
                received_at,
                ..
            } => (received_by, received_at),
        };
        Self {
            status: action.new_status(),
            activity: action.activity().to_string(),
            actor: actor.clone(),
            at: *at,
            remark: action.remark().map(str::to_string),
        }
    }
}

/// Display name of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeName {
    /// Employee id as stored by the backend.
    pub id: EmployeeId,
    /// Full name.
    pub name: String,
}

/// Operations of the procurement REST backend.
///
/// Implemented over HTTP by [`HttpProcurementApi`]; tests provide in-memory
/// implementations.
pub trait ProcurementApi: Send + Sync + 'static {
    /// Create a request from its basic information and return its number.
    fn create_request(
        &self,
        basic: &BasicInfo,
    ) -> impl Future<Output = ApiResult<RequestNumber>> + Send;

    /// Update the basic information of a request.
    fn update_request(
        &self,
        number: &RequestNumber,
        basic: &BasicInfo,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// Fetch a request.
    fn get_request(
        &self,
        number: &RequestNumber,
    ) -> impl Future<Output = ApiResult<PurchaseRequest>> + Send;

    /// List requests, one page at a time.
    fn list_requests(
        &self,
        filter: &RequestFilter,
        page: PageRequest,
    ) -> impl Future<Output = ApiResult<PageResponse<RequestSummary>>> + Send;

    /// Fetch the additional-information record of a request.
    fn get_additional_info(
        &self,
        number: &RequestNumber,
    ) -> impl Future<Output = ApiResult<AdditionalInfoRecord>> + Send;

    /// Upsert the additional-information record of a request.
    fn save_additional_info(
        &self,
        number: &RequestNumber,
        payload: Value,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// Fetch the line items of a request.
    fn get_items(
        &self,
        number: &RequestNumber,
    ) -> impl Future<Output = ApiResult<Vec<LineItem>>> + Send;

    /// Replace all line items of a request.
    fn replace_items(
        &self,
        number: &RequestNumber,
        items: &[LineItem],
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// Fetch the approval assignment of a request.
    fn get_approval(
        &self,
        number: &RequestNumber,
    ) -> impl Future<Output = ApiResult<ApprovalAssignment>> + Send;

    /// Upsert the approval assignment of a request.
    fn save_approval(
        &self,
        number: &RequestNumber,
        approval: &ApprovalAssignment,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// List the documents of a request.
    fn list_documents(
        &self,
        number: &RequestNumber,
    ) -> impl Future<Output = ApiResult<Vec<Document>>> + Send;

    /// Upload one document.
    fn upload_document(
        &self,
        number: &RequestNumber,
        document: &PendingDocument,
    ) -> impl Future<Output = ApiResult<Document>> + Send;

    /// Set the full list of documents attached to a request.
    fn sync_documents(
        &self,
        number: &RequestNumber,
        ids: &[DocumentId],
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// Record a workflow status change.
    fn record_status(
        &self,
        number: &RequestNumber,
        change: &StatusChange,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// Fetch all purchase types.
    fn purchase_types(&self) -> impl Future<Output = ApiResult<Vec<PurchaseType>>> + Send;

    /// Fetch the sub-types of a purchase type.
    fn purchase_sub_types(
        &self,
        type_id: i32,
    ) -> impl Future<Output = ApiResult<Vec<PurchaseSubType>>> + Send;

    /// Look up employee names in one batch.
    fn lookup_employees(
        &self,
        ids: &[String],
    ) -> impl Future<Output = ApiResult<Vec<EmployeeName>>> + Send;

    /// Fetch a purchase order.
    fn get_order(
        &self,
        number: &OrderNumber,
    ) -> impl Future<Output = ApiResult<PurchaseOrder>> + Send;

    /// Fetch the amortization schedule of an order.
    fn get_amortization(
        &self,
        number: &OrderNumber,
    ) -> impl Future<Output = ApiResult<Vec<AmortizationPeriod>>> + Send;

    /// Cancel one amortization period.
    fn cancel_period(
        &self,
        number: &OrderNumber,
        period: u32,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// Release one amortization period.
    fn release_period(
        &self,
        number: &OrderNumber,
        period: u32,
    ) -> impl Future<Output = ApiResult<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use procura_core::workflow::WorkflowService;

    #[test]
    fn test_status_change_from_approval() {
        let action = WorkflowService::approve(
            RequestStatus::Submitted,
            EmployeeId::new("E7"),
            Some("looks fine".to_string()),
        )
        .unwrap();
        let change = StatusChange::from(&action);
        assert_eq!(change.status, RequestStatus::Reviewed);
        assert_eq!(change.activity, "Reviewed");
        assert_eq!(change.actor, EmployeeId::new("E7"));
        assert_eq!(change.remark.as_deref(), Some("looks fine"));
    }

    #[test]
    fn test_status_change_json() {
        let action = WorkflowService::submit(RequestStatus::Draft, EmployeeId::new("E1")).unwrap();
        let json = serde_json::to_value(StatusChange::from(&action)).unwrap();
        assert_eq!(json["status"], 1);
        assert_eq!(json["activity"], "Submitted");
        assert!(json.get("remark").is_none());
    }
}
