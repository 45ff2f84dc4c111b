//! View composition error types.

use procura_shared::AppError;
use thiserror::Error;

use crate::api::ClientError;

/// Errors from composing a view.
///
/// Only the parent record of a view is required; failures of its children
/// degrade to empty sections instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
    /// The record the view is about could not be loaded.
    #[error("{what} is unavailable: {source}")]
    Unavailable {
        /// Record that failed.
        what: String,
        /// Backend failure.
        source: ClientError,
    },
}

impl ViewError {
    pub(crate) fn unavailable(what: impl Into<String>) -> impl FnOnce(ClientError) -> Self {
        let what = what.into();
        move |source| Self::Unavailable { what, source }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { source, .. } => source.error_code(),
        }
    }
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::Unavailable { what, source } if source.is_not_found() => Self::NotFound(what),
            ViewError::Unavailable { what, source } => Self::Network(format!("{what}: {source}")),
        }
    }
}
