//! Client-side model of a request being edited in the wizard.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use procura_core::draft::Section;
use procura_core::request::{
    ApprovalAssignment, BasicInfo, Document, LineItem, PendingDocument, PurchaseRequest,
    RequestStatus, total_amount,
};
use procura_core::section::AdditionalInfo;
use procura_shared::types::{DocumentId, RequestNumber};
use rust_decimal::Decimal;

static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a draft for coalescing saves: its request number, or a
/// per-instance id while the parent record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraftKey {
    /// Persisted draft.
    Number(RequestNumber),
    /// Draft without a request number yet.
    Unsaved(u64),
}

impl std::fmt::Display for DraftKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Unsaved(id) => write!(f, "unsaved#{id}"),
        }
    }
}

/// A purchase request being edited, with the sections changed since they
/// were last saved.
///
/// Clones share the local identity of the draft they were cloned from.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRequest {
    local_id: u64,
    number: Option<RequestNumber>,
    status: RequestStatus,
    basic: BasicInfo,
    additional: Option<AdditionalInfo>,
    items: Vec<LineItem>,
    approval: ApprovalAssignment,
    documents: Vec<Document>,
    pending: Vec<PendingDocument>,
    changed: HashSet<Section>,
}

impl DraftRequest {
    /// Starts a new draft. Every section counts as changed.
    #[must_use]
    pub fn new(basic: BasicInfo) -> Self {
        Self {
            local_id: NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed),
            number: None,
            status: RequestStatus::Draft,
            basic,
            additional: None,
            items: Vec::new(),
            approval: ApprovalAssignment::default(),
            documents: Vec::new(),
            pending: Vec::new(),
            changed: Section::ORDER.into_iter().collect(),
        }
    }

    /// Reopens a persisted draft. Nothing counts as changed.
    #[must_use]
    pub fn from_saved(
        request: PurchaseRequest,
        additional: Option<AdditionalInfo>,
        items: Vec<LineItem>,
        approval: ApprovalAssignment,
        documents: Vec<Document>,
    ) -> Self {
        Self {
            local_id: NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed),
            number: Some(request.number),
            status: request.status,
            basic: request.basic,
            additional,
            items,
            approval,
            documents,
            pending: Vec::new(),
            changed: HashSet::new(),
        }
    }

    /// Request number, once the parent record exists.
    #[must_use]
    pub fn number(&self) -> Option<&RequestNumber> {
        self.number.as_ref()
    }

    /// Coalescing identity of the draft.
    #[must_use]
    pub fn key(&self) -> DraftKey {
        self.number
            .clone()
            .map_or(DraftKey::Unsaved(self.local_id), DraftKey::Number)
    }

    /// Workflow status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns true while the request can still be edited.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    /// Basic information.
    #[must_use]
    pub fn basic(&self) -> &BasicInfo {
        &self.basic
    }

    /// Additional information, if entered.
    #[must_use]
    pub fn additional(&self) -> Option<&AdditionalInfo> {
        self.additional.as_ref()
    }

    /// Line items.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Approval assignment.
    #[must_use]
    pub fn approval(&self) -> &ApprovalAssignment {
        &self.approval
    }

    /// Documents already uploaded.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Documents attached but not uploaded yet.
    #[must_use]
    pub fn pending_documents(&self) -> &[PendingDocument] {
        &self.pending
    }

    /// Uploaded plus pending documents.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len() + self.pending.len()
    }

    /// Sum of the line item amounts.
    #[must_use]
    pub fn total(&self) -> Decimal {
        total_amount(&self.items)
    }

    /// Returns true if the section changed since it was last saved.
    #[must_use]
    pub fn is_changed(&self, section: Section) -> bool {
        self.changed.contains(&section)
    }

    /// Replaces the basic information.
    pub fn set_basic(&mut self, basic: BasicInfo) {
        self.basic = basic;
        self.changed.insert(Section::Basic);
    }

    /// Replaces the additional information.
    pub fn set_additional(&mut self, additional: Option<AdditionalInfo>) {
        self.additional = additional;
        self.changed.insert(Section::Additional);
    }

    /// Replaces all line items.
    pub fn set_items(&mut self, items: Vec<LineItem>) {
        self.items = items;
        self.changed.insert(Section::Items);
    }

    /// Appends a line item.
    pub fn add_item(&mut self, item: LineItem) {
        self.items.push(item);
        self.changed.insert(Section::Items);
    }

    /// Removes the line item at `index`, if it exists.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        if index >= self.items.len() {
            return None;
        }
        self.changed.insert(Section::Items);
        Some(self.items.remove(index))
    }

    /// Replaces the approval assignment.
    pub fn set_approval(&mut self, approval: ApprovalAssignment) {
        self.approval = approval;
        self.changed.insert(Section::Approval);
    }

    /// Attaches a file to upload on the next save.
    pub fn attach(&mut self, document: PendingDocument) {
        self.pending.push(document);
        self.changed.insert(Section::Documents);
    }

    /// Detaches an uploaded document.
    pub fn detach(&mut self, id: DocumentId) -> bool {
        let before = self.documents.len();
        self.documents.retain(|doc| doc.id != id);
        let removed = self.documents.len() != before;
        if removed {
            self.changed.insert(Section::Documents);
        }
        removed
    }

    /// Records the number issued for the parent record.
    pub fn set_number(&mut self, number: RequestNumber) {
        self.number = Some(number);
    }

    /// Records the status after a workflow action.
    pub(crate) fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    /// Moves a pending document to the uploaded list.
    pub(crate) fn uploaded(&mut self, filename: &str, document: Document) {
        if let Some(pos) = self.pending.iter().position(|p| p.filename == filename) {
            self.pending.remove(pos);
        }
        self.documents.push(document);
    }

    /// Marks a section saved.
    pub fn mark_saved(&mut self, section: Section) {
        self.changed.remove(&section);
    }
}
