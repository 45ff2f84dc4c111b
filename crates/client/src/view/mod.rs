//! Screen view composition.
//!
//! # Modules
//!
//! - `composer` - Loads and assembles views
//! - `types` - View models
//! - `error` - View error types

pub mod composer;
pub mod error;
pub mod types;

pub use composer::ViewComposer;
pub use error::ViewError;
pub use types::{ApprovalView, EmployeeNames, OrderView, ReceiveView, RequestView};
