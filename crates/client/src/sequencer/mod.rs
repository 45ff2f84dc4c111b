//! Draft submission sequencing.
//!
//! # Modules
//!
//! - `service` - Ordered, coalesced section saves and submission
//! - `report` - Per-section outcome of a save
//! - `error` - Sequencing error types

pub mod error;
pub mod report;
pub mod service;

pub use error::SequenceError;
pub use report::{SaveReport, StepOutcome};
pub use service::DraftSequencer;
