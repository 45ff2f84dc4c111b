//! Procurement workflow client for Procura.
//!
//! Everything that talks to the procurement backend lives here; the rules it
//! applies come from `procura-core`.
//!
//! # Modules
//!
//! - `api` - Backend API trait and its HTTP implementation
//! - `cache` - Session-long reference data cache
//! - `coalesce` - In-flight request coalescing
//! - `store` - Draft client-state persistence
//! - `draft` - Client-side draft model
//! - `sequencer` - Ordered draft saving and submission
//! - `view` - Screen view composition
//! - `decision` - Reviewing decisions
//! - `release` - Amortization period actions

pub mod api;
pub mod cache;
pub mod client;
pub mod coalesce;
pub mod decision;
pub mod draft;
pub mod release;
pub mod sequencer;
pub mod store;
pub mod view;

pub use api::{ClientError, HttpProcurementApi, ProcurementApi, StatusChange};
pub use cache::ReferenceCache;
pub use client::Procura;
pub use decision::{DecisionError, DecisionService};
pub use draft::{DraftKey, DraftRequest};
pub use release::{ReleaseError, ReleaseService};
pub use sequencer::{DraftSequencer, SaveReport, SequenceError, StepOutcome};
pub use store::{DraftStore, FileDraftStore, MemoryDraftStore};
pub use view::{ViewComposer, ViewError};
