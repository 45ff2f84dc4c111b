//! Purchase request domain types.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use procura_shared::types::{DocumentId, EmployeeId, OrderNumber, RequestNumber};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::RequestStatus;

/// Basic information entered on the first wizard step.
///
/// This is also the create/update payload of the parent record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    /// Employee raising the request.
    pub requestor: EmployeeId,
    /// Employee the purchase is for.
    pub applicant: EmployeeId,
    /// Company code.
    pub company: String,
    /// Purchase type id, when the record carries it directly.
    #[serde(default)]
    pub type_id: Option<i32>,
    /// Purchase sub-type id, when the record carries it directly.
    #[serde(default)]
    pub sub_type_id: Option<i32>,
    /// Legacy formatted type: `"{Type} {Category}"`, a bare type name, or an id.
    #[serde(default)]
    pub purchase_type: Option<String>,
    /// Legacy formatted sub-type name or id.
    #[serde(default)]
    pub purchase_sub_type: Option<String>,
    /// Short name of the request.
    pub name: String,
    /// Free-text remark.
    #[serde(default)]
    pub remark: Option<String>,
}

/// A purchase request as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Request number.
    pub number: RequestNumber,
    /// Basic information.
    #[serde(flatten)]
    pub basic: BasicInfo,
    /// Workflow status.
    pub status: RequestStatus,
    /// Total amount as computed by the backend.
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A line item of a purchase request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Inventory item reference.
    #[serde(default)]
    pub inventory_id: Option<i64>,
    /// Item name.
    pub name: String,
    /// Item description.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit of measure.
    pub unit: String,
    /// Ordered quantity. Must be positive.
    pub quantity: i64,
    /// ISO currency code.
    pub currency: String,
    /// Price per unit. Must not be negative.
    pub unit_price: Decimal,
    /// Amount computed by the backend, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

impl LineItem {
    /// Amount for display: the backend's amount when present, otherwise
    /// quantity × unit price.
    #[must_use]
    pub fn effective_amount(&self) -> Decimal {
        self.amount
            .unwrap_or_else(|| Decimal::from(self.quantity) * self.unit_price)
    }
}

/// Sums the effective amounts of a set of line items.
#[must_use]
pub fn total_amount(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::effective_amount).sum()
}

/// A document persisted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document id.
    pub id: DocumentId,
    /// Original filename.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Storage path on the backend.
    pub path: String,
}

/// A file attached in the wizard but not uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDocument {
    /// Original filename.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// File contents.
    pub content: Bytes,
}

impl PendingDocument {
    /// Creates a pending document.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }
}

/// Reviewer, approver and confirmer assigned to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalAssignment {
    /// Employee reviewing the request.
    #[serde(default)]
    pub reviewer: Option<EmployeeId>,
    /// Employee approving the request.
    #[serde(default)]
    pub approver: Option<EmployeeId>,
    /// Employee confirming the request.
    #[serde(default)]
    pub confirmer: Option<EmployeeId>,
}

impl ApprovalAssignment {
    /// Returns true if no role is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles().iter().all(|(_, id)| id.is_none())
    }

    /// Returns true if all three roles are assigned.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.roles().iter().all(|(_, id)| id.is_some())
    }

    /// Role names paired with their assignees; blank ids count as unassigned.
    #[must_use]
    pub fn roles(&self) -> [(&'static str, Option<&EmployeeId>); 3] {
        fn set(id: &Option<EmployeeId>) -> Option<&EmployeeId> {
            id.as_ref().filter(|id| !id.is_blank())
        }

        [
            ("reviewer", set(&self.reviewer)),
            ("approver", set(&self.approver)),
            ("confirmer", set(&self.confirmer)),
        ]
    }
}

/// A purchase order generated from an approved request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    /// Order number.
    pub number: OrderNumber,
    /// Request the order was generated from.
    pub request_number: RequestNumber,
    /// Vendor name.
    pub vendor: String,
    /// Total amount of the order.
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    /// Issue date.
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
}

/// A row of the purchase request list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    /// Request number.
    pub number: RequestNumber,
    /// Request name.
    pub name: String,
    /// Employee raising the request.
    pub requestor: EmployeeId,
    /// Workflow status.
    pub status: RequestStatus,
    /// Total amount.
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Filter applied to the purchase request list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// Only requests in this status.
    pub status: Option<RequestStatus>,
    /// Free-text search over number and name.
    pub search: Option<String>,
    /// Only requests raised by this employee.
    pub requestor: Option<EmployeeId>,
}

impl RequestFilter {
    /// Query-string pairs for the list endpoint; blank values are dropped.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.code().to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(requestor) = self.requestor.as_ref().filter(|id| !id.is_blank()) {
            pairs.push(("requestor", requestor.as_str().trim().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: i64, unit_price: Decimal, amount: Option<Decimal>) -> LineItem {
        LineItem {
            inventory_id: Some(1),
            name: "Laptop".to_string(),
            description: None,
            unit: "pcs".to_string(),
            quantity,
            currency: "IDR".to_string(),
            unit_price,
            amount,
        }
    }

    #[test]
    fn test_effective_amount_computed() {
        assert_eq!(item(3, dec!(2.50), None).effective_amount(), dec!(7.50));
    }

    #[test]
    fn test_effective_amount_prefers_server() {
        assert_eq!(
            item(3, dec!(2.50), Some(dec!(7.00))).effective_amount(),
            dec!(7.00)
        );
    }

    #[test]
    fn test_total_amount() {
        let items = vec![
            item(1, dec!(100), None),
            item(2, dec!(50), None),
            item(1, dec!(10), Some(dec!(9))),
        ];
        assert_eq!(total_amount(&items), dec!(209));
        assert_eq!(total_amount(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_approval_assignment_states() {
        let mut assignment = ApprovalAssignment::default();
        assert!(assignment.is_empty());
        assert!(!assignment.is_complete());

        assignment.reviewer = Some(EmployeeId::new("E1"));
        assert!(!assignment.is_empty());
        assert!(!assignment.is_complete());

        assignment.approver = Some(EmployeeId::new("E2"));
        assignment.confirmer = Some(EmployeeId::new("  "));
        assert!(!assignment.is_complete());

        assignment.confirmer = Some(EmployeeId::new("E3"));
        assert!(assignment.is_complete());
    }

    #[test]
    fn test_roles_borrow_assignees() {
        let assignment = ApprovalAssignment {
            reviewer: Some(EmployeeId::new("E1")),
            approver: Some(EmployeeId::new(" ")),
            confirmer: None,
        };

        let roles = assignment.roles();

        assert_eq!(roles[0], ("reviewer", assignment.reviewer.as_ref()));
        assert_eq!(roles[1], ("approver", None));
        assert_eq!(roles[2], ("confirmer", None));
    }

    #[test]
    fn test_request_deserializes_flat_record() {
        let json = r#"{
            "number": "PR-1",
            "requestor": "E1",
            "applicant": "E2",
            "company": "ACME",
            "typeId": 6,
            "subTypeId": 2,
            "name": "Cloud billing",
            "status": 0
        }"#;
        let request: PurchaseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.number.as_str(), "PR-1");
        assert_eq!(request.basic.type_id, Some(6));
        assert_eq!(request.basic.purchase_type, None);
        assert_eq!(request.status, RequestStatus::Draft);
    }

    #[test]
    fn test_filter_query_pairs() {
        let filter = RequestFilter {
            status: Some(RequestStatus::Submitted),
            search: Some("  ".to_string()),
            requestor: Some(EmployeeId::new(" E9 ")),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("status", "1".to_string()), ("requestor", "E9".to_string())]
        );
    }
}
