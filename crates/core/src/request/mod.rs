//! Purchase request model.
//!
//! # Modules
//!
//! - `status` - Workflow status mirrored from the backend
//! - `types` - Request, line item, document and assignment types

pub mod status;
pub mod types;

pub use status::RequestStatus;
pub use types::{
    ApprovalAssignment, BasicInfo, Document, LineItem, PendingDocument, PurchaseOrder,
    PurchaseRequest, RequestFilter, RequestSummary, total_amount,
};
