//! Shared types, errors, and configuration for Procura.
//!
//! This crate provides common types used across all other crates:
//! - Typed identifiers for requests, orders, documents and employees
//! - Pagination types for list views
//! - The user-facing error taxonomy
//! - Configuration management
//! - Tracing subscriber setup for host applications

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::ClientConfig;
pub use error::{AppError, AppResult};
