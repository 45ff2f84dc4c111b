//! Conditional section resolution.
//!
//! The purchase type and sub-type decide which optional "additional
//! information" section a request carries, if any. Every read and write of
//! that section is gated on [`resolve`], so requests that have none never
//! cause a network call for it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Optional data section attached to a purchase request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// No additional information applies.
    None,
    /// Billing period information.
    Billing,
    /// Site and sales-order number information.
    SiteNumber,
    /// Both billing and site information.
    Subscription,
}

impl SectionKind {
    /// Returns true if the section exists and must be fetched or persisted.
    #[must_use]
    pub const fn requires_fetch(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns true if the section carries billing fields.
    #[must_use]
    pub const fn has_billing(self) -> bool {
        matches!(self, Self::Billing | Self::Subscription)
    }

    /// Returns true if the section carries site fields.
    #[must_use]
    pub const fn has_site(self) -> bool {
        matches!(self, Self::SiteNumber | Self::Subscription)
    }

    /// Returns the stable name of the section.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Billing => "billing",
            Self::SiteNumber => "site_number",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a (type, sub-type) pair to the section it carries.
///
/// The rule groups are mutually exclusive, so the match order is irrelevant.
/// A missing or zero type id yields [`SectionKind::None`].
#[must_use]
pub const fn resolve(type_id: Option<i32>, sub_type_id: Option<i32>) -> SectionKind {
    let Some(type_id) = type_id else {
        return SectionKind::None;
    };

    match (type_id, sub_type_id) {
        (5 | 7, _) => SectionKind::Subscription,
        (6, Some(2)) => SectionKind::Billing,
        (8, Some(4)) | (2, Some(1 | 3)) | (4, Some(3)) | (3, Some(4 | 5)) => {
            SectionKind::SiteNumber
        }
        _ => SectionKind::None,
    }
}
