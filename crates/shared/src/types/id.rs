//! Typed identifiers for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `OrderNumber` where a
//! `RequestNumber` is expected. Numbers are issued by the backend, so these
//! wrap the backend's representation instead of generating values locally.

use serde::{Deserialize, Serialize};

/// Macro to generate string-backed ID wrappers.
macro_rules! string_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a backend-issued identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(RequestNumber, "Number of a purchase request, issued on creation.");
string_id!(OrderNumber, "Number of a purchase order generated from a request.");

/// Identifier of an employee in the directory.
///
/// The directory is inconsistent about case and padding, so comparisons and
/// cache keys go through [`EmployeeId::normalized`]. The default value is
/// blank, matching an untouched form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Wraps a raw employee identifier as entered or returned by the backend.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the trimmed, lower-cased key used for lookups.
    #[must_use]
    pub fn normalized(&self) -> String {
        normalize_employee_key(&self.0)
    }

    /// Returns true if the identifier is blank after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Normalizes an employee key: surrounding whitespace removed, lower-cased.
#[must_use]
pub fn normalize_employee_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Identifier of a document persisted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
