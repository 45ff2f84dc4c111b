//! View models consumed by screens.

use std::collections::HashMap;

use procura_core::amortization::AmortizationPeriod;
use procura_core::request::{ApprovalAssignment, Document, LineItem, PurchaseOrder, PurchaseRequest};
use procura_core::section::{AdditionalInfo, SectionKind};
use procura_shared::types::{DocumentId, EmployeeId};
use rust_decimal::Decimal;

/// Employee display names keyed by normalized id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeNames(HashMap<String, String>);

impl EmployeeNames {
    /// Wraps a name map keyed by normalized id.
    #[must_use]
    pub fn new(names: HashMap<String, String>) -> Self {
        Self(names)
    }

    /// Display name of an employee, or the raw id when the directory does
    /// not know it.
    #[must_use]
    pub fn display(&self, id: &EmployeeId) -> String {
        self.0
            .get(&id.normalized())
            .cloned()
            .unwrap_or_else(|| id.as_str().trim().to_string())
    }

    /// Display name of an optional assignee; blank when unassigned.
    #[must_use]
    pub fn display_opt(&self, id: Option<&EmployeeId>) -> String {
        id.map(|id| self.display(id)).unwrap_or_default()
    }
}

/// Everything a request detail screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestView {
    /// The request.
    pub request: PurchaseRequest,
    /// Line items; empty if they could not be loaded.
    pub items: Vec<LineItem>,
    /// Documents; empty if they could not be loaded.
    pub documents: Vec<Document>,
    /// Approval assignment; unassigned if it could not be loaded.
    pub approval: ApprovalAssignment,
    /// Section kind resolved from the request type.
    pub section: SectionKind,
    /// Additional information. `None` hides the section.
    pub additional: Option<AdditionalInfo>,
    /// Purchase type label.
    pub type_label: Option<String>,
    /// Purchase sub-type label.
    pub sub_type_label: Option<String>,
    /// Total amount: the backend total when present, else the item sum.
    pub total: Decimal,
    /// Names of the employees on the request.
    pub names: EmployeeNames,
}

impl RequestView {
    /// Returns true if the additional section is shown.
    #[must_use]
    pub fn shows_additional(&self) -> bool {
        self.additional.is_some()
    }

    /// Display name of the requestor.
    #[must_use]
    pub fn requestor_name(&self) -> String {
        self.names.display(&self.request.basic.requestor)
    }

    /// Display name of the applicant.
    #[must_use]
    pub fn applicant_name(&self) -> String {
        self.names.display(&self.request.basic.applicant)
    }
}

/// Request detail as shown to a reviewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalView {
    /// The request.
    pub request: RequestView,
    /// Finished and rejected requests accept no decision.
    pub view_only: bool,
    /// Activity an approval records now, e.g. "Reviewed".
    pub next_activity: Option<&'static str>,
    /// Documents the reviewer has not opened yet.
    pub unviewed: Vec<DocumentId>,
}

impl ApprovalView {
    /// Returns true if an approve decision would be accepted now.
    #[must_use]
    pub fn can_approve(&self) -> bool {
        !self.view_only && self.next_activity.is_some() && self.unviewed.is_empty()
    }
}

/// Request detail as shown on goods receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiveView {
    /// The request.
    pub request: RequestView,
    /// Whether goods can be received now.
    pub can_receive: bool,
}

/// Purchase order detail.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    /// The order.
    pub order: PurchaseOrder,
    /// Request the order came from; `None` if it could not be loaded.
    pub request: Option<RequestView>,
    /// Amortization schedule; empty when the order is not billed.
    pub schedule: Vec<AmortizationPeriod>,
}
