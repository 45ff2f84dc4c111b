//! Monthly amortization schedule.
//!
//! A billed order is spread over `period_count` monthly periods starting at
//! the billing start. Every period but the last carries the total divided by
//! the count, rounded down to cents; the last period absorbs the remainder so
//! the schedule always sums to the total.

use std::fmt;

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::AmortizationError;
use crate::section::BillingFields;

const DECIMAL_PLACES: u32 = 2;

/// Status of an amortization period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Not yet released.
    Open,
    /// Released to the ledger.
    Released,
    /// Cancelled.
    Cancelled,
}

impl PeriodStatus {
    /// Returns the lowercase status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Released => "released",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationPeriod {
    /// 1-based period index.
    pub period: u32,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Amount amortized in the period.
    pub amount: Decimal,
    /// Current status.
    pub status: PeriodStatus,
}

impl AmortizationPeriod {
    /// Returns true if the period has not been released or cancelled.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }

    /// Returns true if the date falls within the period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Splits `total` into monthly periods following the billing fields.
///
/// All periods are created open.
pub fn build_schedule(
    billing: &BillingFields,
    total: Decimal,
) -> Result<Vec<AmortizationPeriod>, AmortizationError> {
    let start = billing.start_period.ok_or(AmortizationError::MissingStart)?;
    if let Some(end) = billing.end_period
        && end < start
    {
        return Err(AmortizationError::EndBeforeStart { start, end });
    }
    if total < Decimal::ZERO {
        return Err(AmortizationError::NegativeTotal(total));
    }

    let count = billing
        .effective_period_count()
        .filter(|count| *count > 0)
        .ok_or(AmortizationError::NoPeriods)?;

    let total = total.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
    let count_dec = Decimal::from(count);
    let base = (total / count_dec).round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::ToZero);
    let last = total - base * (count_dec - Decimal::ONE);

    (0..count)
        .map(|index| {
            let start_date = start
                .checked_add_months(Months::new(index))
                .ok_or(AmortizationError::NoPeriods)?;
            let end_date = start_date
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .ok_or(AmortizationError::NoPeriods)?;
            Ok(AmortizationPeriod {
                period: index + 1,
                start_date,
                end_date,
                amount: if index + 1 == count { last } else { base },
                status: PeriodStatus::Open,
            })
        })
        .collect()
}

fn ensure_open(
    schedule: &[AmortizationPeriod],
    period: u32,
) -> Result<&AmortizationPeriod, AmortizationError> {
    let found = schedule
        .iter()
        .find(|p| p.period == period)
        .ok_or(AmortizationError::UnknownPeriod(period))?;
    if found.is_open() {
        Ok(found)
    } else {
        Err(AmortizationError::PeriodClosed {
            period,
            status: found.status,
        })
    }
}

/// Checks that a period can be cancelled.
pub fn ensure_cancellable(
    schedule: &[AmortizationPeriod],
    period: u32,
) -> Result<&AmortizationPeriod, AmortizationError> {
    ensure_open(schedule, period)
}

/// Checks that a period can be released.
///
/// Periods are released in order: an earlier open period blocks a later one.
pub fn ensure_releasable(
    schedule: &[AmortizationPeriod],
    period: u32,
) -> Result<&AmortizationPeriod, AmortizationError> {
    let target = ensure_open(schedule, period)?;
    if let Some(earlier) = schedule
        .iter()
        .find(|p| p.period < period && p.is_open())
    {
        return Err(AmortizationError::EarlierPeriodOpen {
            period,
            pending: earlier.period,
        });
    }
    Ok(target)
}
