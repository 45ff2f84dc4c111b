//! Application-wide error types.
//!
//! Every failure in the workflow layer ends up as one of these, carrying the
//! message shown to the user. Nothing here is fatal: control always returns
//! to the current screen.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// The backend could not be reached or answered with a failure.
    #[error("Network error: {0}")]
    Network(String),

    /// A required record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client-side validation failed; the message is the aggregated summary.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required step of a multi-step save failed.
    #[error("Save failed at {step}: {message}")]
    Sequencing {
        /// Name of the step that failed.
        step: String,
        /// Underlying failure message.
        message: String,
    },

    /// The action is not allowed in the current state.
    #[error("Not allowed: {0}")]
    Forbidden(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Returns the HTTP-like status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::Sequencing { .. } => 409,
            Self::Network(_) => 502,
            Self::Config(_) => 500,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "NETWORK_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Sequencing { .. } => "SEQUENCING_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Returns true for validation failures, which are reported inline
    /// instead of through an alert.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Network(String::new()).status_code(), 502);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::Config(String::new()).status_code(), 500);
        assert_eq!(
            AppError::Sequencing {
                step: String::new(),
                message: String::new()
            }
            .status_code(),
            409
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Network(String::new()).error_code(),
            "NETWORK_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "FORBIDDEN");
        assert_eq!(AppError::Config(String::new()).error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Network("timeout".into()).to_string(),
            "Network error: timeout"
        );
        assert_eq!(
            AppError::Sequencing {
                step: "items".into(),
                message: "boom".into()
            }
            .to_string(),
            "Save failed at items: boom"
        );
        assert_eq!(
            AppError::Validation("at least one item is required".into()).to_string(),
            "Validation error: at least one item is required"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(AppError::Validation(String::new()).is_validation());
        assert!(!AppError::Network(String::new()).is_validation());
    }
}
