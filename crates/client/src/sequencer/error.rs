//! Draft sequencing error types.

use procura_core::draft::Section;
use procura_core::section::SectionKind;
use procura_core::validation::ValidationReport;
use procura_core::workflow::WorkflowError;
use procura_shared::AppError;
use thiserror::Error;

use crate::api::ClientError;

/// Errors from saving or submitting a draft.
///
/// Cloneable so that callers coalesced onto one save share its failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// Final submission validation failed.
    #[error("{0}")]
    Validation(ValidationReport),

    /// The section needs the parent record, which does not exist yet.
    #[error("{0} cannot be saved before the request has a number")]
    MissingRequestNumber(Section),

    /// A request must carry at least one item.
    #[error("at least one item is required")]
    NoItems,

    /// The entered additional information does not fit the request type.
    #[error("additional information is {found:?} but the request type needs {expected}")]
    SectionMismatch {
        /// Kind resolved from the request type.
        expected: SectionKind,
        /// Kind of the entered information, if any.
        found: Option<SectionKind>,
    },

    /// A document upload failed.
    #[error("upload of {filename} failed: {source}")]
    Upload {
        /// File that failed.
        filename: String,
        /// Backend failure.
        source: ClientError,
    },

    /// A backend call of a required step failed.
    #[error("saving {section} failed: {source}")]
    Step {
        /// Step that failed.
        section: Section,
        /// Backend failure.
        source: ClientError,
    },

    /// The request cannot move to the next status.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Recording the status change failed.
    #[error("status change failed: {0}")]
    Transition(ClientError),
}

impl SequenceError {
    pub(crate) fn step(section: Section) -> impl Fn(ClientError) -> Self {
        move |source| Self::Step { section, source }
    }

    /// Step the failure belongs to, if any.
    #[must_use]
    pub const fn section(&self) -> Option<Section> {
        match self {
            Self::MissingRequestNumber(section) | Self::Step { section, .. } => Some(*section),
            Self::NoItems => Some(Section::Items),
            Self::SectionMismatch { .. } => Some(Section::Additional),
            Self::Upload { .. } => Some(Section::Documents),
            Self::Validation(_) | Self::Workflow(_) | Self::Transition(_) => None,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MissingRequestNumber(_) => "MISSING_REQUEST_NUMBER",
            Self::NoItems => "NO_ITEMS",
            Self::SectionMismatch { .. } => "SECTION_MISMATCH",
            Self::Upload { .. } => "UPLOAD_FAILED",
            Self::Step { .. } => "STEP_FAILED",
            Self::Workflow(e) => e.error_code(),
            Self::Transition(_) => "TRANSITION_FAILED",
        }
    }
}

impl From<SequenceError> for AppError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::Validation(report) => Self::Validation(report.summary()),
            SequenceError::NoItems => Self::Validation(SequenceError::NoItems.to_string()),
            SequenceError::Workflow(e) => Self::Forbidden(e.to_string()),
            SequenceError::Transition(e) => e.into(),
            other => Self::Sequencing {
                step: other
                    .section()
                    .map_or_else(|| "submission".to_string(), |s| s.to_string()),
                message: other.to_string(),
            },
        }
    }
}
