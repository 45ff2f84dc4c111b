//! Core business logic for Procura.
//!
//! This crate contains pure procurement workflow logic with ZERO network
//! dependencies. All domain types, resolution rules and validation live here.
//!
//! # Modules
//!
//! - `request` - Purchase request model and status
//! - `section` - Conditional additional-information sections
//! - `workflow` - Request status state machine
//! - `validation` - Final-submission validation
//! - `draft` - Local draft client-state
//! - `review` - Document review tracking for approvals
//! - `amortization` - Billing schedules of purchase orders

pub mod amortization;
pub mod draft;
pub mod request;
pub mod review;
pub mod section;
pub mod validation;
pub mod workflow;
