//! Purchase request status as mirrored from the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Purchase request status in the approval workflow.
///
/// The valid transitions are:
/// - Draft → Submitted (submit)
/// - Submitted → Reviewed → Approved → Confirmed (approve, one step each)
/// - Confirmed → Finished (receive)
/// - Submitted | Reviewed | Approved | Confirmed → Rejected (reject)
///
/// The backend stores the status as a small integer, so that is also the
/// wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RequestStatus {
    /// Being drafted in the wizard.
    Draft,
    /// Submitted for review.
    Submitted,
    /// Reviewed, waiting for approval.
    Reviewed,
    /// Approved, waiting for confirmation.
    Approved,
    /// Confirmed, waiting for goods to be received.
    Confirmed,
    /// Goods received; the request is closed.
    Finished,
    /// Rejected at one of the reviewing steps.
    Rejected,
}

impl RequestStatus {
    /// Returns the numeric code used by the backend.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Draft => 0,
            Self::Submitted => 1,
            Self::Reviewed => 2,
            Self::Approved => 3,
            Self::Confirmed => 4,
            Self::Finished => 5,
            Self::Rejected => 6,
        }
    }

    /// Parses a backend status code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Draft),
            1 => Some(Self::Submitted),
            2 => Some(Self::Reviewed),
            3 => Some(Self::Approved),
            4 => Some(Self::Confirmed),
            5 => Some(Self::Finished),
            6 => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::Reviewed => "Reviewed",
            Self::Approved => "Approved",
            Self::Confirmed => "Confirmed",
            Self::Finished => "Finished",
            Self::Rejected => "Rejected",
        }
    }

    /// Only drafts can be edited through the wizard.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if no decision can be taken anymore.
    #[must_use]
    pub const fn is_view_only(self) -> bool {
        matches!(self, Self::Finished | Self::Rejected)
    }

    /// Returns true while the request waits on a reviewing decision.
    #[must_use]
    pub const fn awaits_decision(self) -> bool {
        matches!(self, Self::Submitted | Self::Reviewed | Self::Approved)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RequestStatus> for u8 {
    fn from(status: RequestStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for RequestStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown request status code {code}"))
    }
}
