//! Purchase request workflow.
//!
//! This module mirrors the request lifecycle state machine the backend
//! enforces, so the client rejects impossible actions before calling it.
//!
//! # Modules
//!
//! - `types` - Decisions and workflow actions
//! - `error` - Workflow-specific error types
//! - `service` - State transition logic

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::WorkflowService;
pub use types::{Decision, WorkflowAction};
