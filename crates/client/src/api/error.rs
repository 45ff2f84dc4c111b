//! Backend client error types.

use procura_shared::AppError;
use thiserror::Error;

/// Errors returned by a [`ProcurementApi`](super::ProcurementApi).
///
/// Cloneable so that every caller awaiting a coalesced request receives the
/// same failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the status reason.
        message: String,
    },

    /// The backend could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Returns true for [`ClientError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Status { .. } => "BACKEND_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(what) => Self::NotFound(what),
            ClientError::InvalidRequest(msg) => Self::Validation(msg),
            other => Self::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_app_not_found() {
        let err: AppError = ClientError::NotFound("purchase request PR-1".to_string()).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_status_maps_to_network() {
        let err: AppError = ClientError::Status {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "NETWORK_ERROR");
        assert!(err.to_string().contains("boom"));
    }
}
