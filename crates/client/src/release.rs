//! Release and cancellation of amortization periods.

use std::sync::Arc;

use procura_core::amortization::{
    AmortizationError, AmortizationPeriod, ensure_cancellable, ensure_releasable,
};
use procura_shared::AppError;
use procura_shared::types::OrderNumber;
use thiserror::Error;
use tracing::info;

use crate::api::{ClientError, ProcurementApi};

/// Errors from acting on an amortization period.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReleaseError {
    /// The schedule could not be loaded.
    #[error("amortization schedule is unavailable: {0}")]
    Unavailable(ClientError),

    /// The period does not qualify.
    #[error(transparent)]
    Period(#[from] AmortizationError),

    /// The backend refused the action.
    #[error("period action failed: {0}")]
    Backend(ClientError),
}

impl From<ReleaseError> for AppError {
    fn from(err: ReleaseError) -> Self {
        match err {
            ReleaseError::Unavailable(e) | ReleaseError::Backend(e) => e.into(),
            ReleaseError::Period(e @ AmortizationError::UnknownPeriod(_)) => {
                Self::NotFound(e.to_string())
            }
            ReleaseError::Period(e) => Self::Forbidden(e.to_string()),
        }
    }
}

/// Releases and cancels amortization periods of purchase orders.
pub struct ReleaseService<A: ProcurementApi> {
    api: Arc<A>,
}

impl<A: ProcurementApi> ReleaseService<A> {
    /// Creates a release service.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Current schedule of an order.
    pub async fn schedule(
        &self,
        order: &OrderNumber,
    ) -> Result<Vec<AmortizationPeriod>, ReleaseError> {
        self.api
            .get_amortization(order)
            .await
            .map_err(ReleaseError::Unavailable)
    }

    /// Cancels an open period.
    pub async fn cancel_period(&self, order: &OrderNumber, period: u32) -> Result<(), ReleaseError> {
        let schedule = self.schedule(order).await?;
        ensure_cancellable(&schedule, period)?;
        self.api
            .cancel_period(order, period)
            .await
            .map_err(ReleaseError::Backend)?;
        info!(po_number = %order, period, "period cancelled");
        Ok(())
    }

    /// Releases the earliest open period.
    pub async fn release_period(&self, order: &OrderNumber, period: u32) -> Result<(), ReleaseError> {
        let schedule = self.schedule(order).await?;
        ensure_releasable(&schedule, period)?;
        self.api
            .release_period(order, period)
            .await
            .map_err(ReleaseError::Backend)?;
        info!(po_number = %order, period, "period released");
        Ok(())
    }
}
