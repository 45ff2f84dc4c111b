//! Amortization error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use super::schedule::PeriodStatus;

/// Errors from building or acting on an amortization schedule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AmortizationError {
    /// Billing information has no start period.
    #[error("billing start period is not set")]
    MissingStart,

    /// No period count could be derived.
    #[error("billing period count must be greater than zero")]
    NoPeriods,

    /// End period is before the start period.
    #[error("billing end period {end} is before start period {start}")]
    EndBeforeStart {
        /// Start of the billing.
        start: NaiveDate,
        /// End of the billing.
        end: NaiveDate,
    },

    /// Total to amortize is negative.
    #[error("amount to amortize cannot be negative: {0}")]
    NegativeTotal(Decimal),

    /// Period is not part of the schedule.
    #[error("period {0} does not exist")]
    UnknownPeriod(u32),

    /// Period is not open any more.
    #[error("period {period} is already {status}")]
    PeriodClosed {
        /// Period index.
        period: u32,
        /// Current status.
        status: PeriodStatus,
    },

    /// An earlier period is still open.
    #[error("period {period} cannot be released before period {pending}")]
    EarlierPeriodOpen {
        /// Period asked for.
        period: u32,
        /// Earliest open period.
        pending: u32,
    },
}

impl AmortizationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingStart => "MISSING_BILLING_START",
            Self::NoPeriods => "NO_BILLING_PERIODS",
            Self::EndBeforeStart { .. } => "BILLING_END_BEFORE_START",
            Self::NegativeTotal(_) => "NEGATIVE_AMORTIZATION_TOTAL",
            Self::UnknownPeriod(_) => "UNKNOWN_PERIOD",
            Self::PeriodClosed { .. } => "PERIOD_CLOSED",
            Self::EarlierPeriodOpen { .. } => "EARLIER_PERIOD_OPEN",
        }
    }
}
