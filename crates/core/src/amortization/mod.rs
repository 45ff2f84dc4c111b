//! Amortization schedules of billed purchase orders.
//!
//! # Modules
//!
//! - `schedule` - Splitting an order total into monthly periods
//! - `error` - Schedule and period errors

pub mod error;
pub mod schedule;

pub use error::AmortizationError;
pub use schedule::{
    AmortizationPeriod, PeriodStatus, build_schedule, ensure_cancellable, ensure_releasable,
};
