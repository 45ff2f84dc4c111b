//! Additional information attached to a purchase request.
//!
//! The backend stores one flat record; which of its fields mean anything
//! depends on the [`SectionKind`]. On the client side the section is a
//! tagged union so each kind carries exactly its own fields.

use chrono::{Datelike, NaiveDate};
use procura_shared::types::RequestNumber;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::SectionKind;

/// Billing period fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingFields {
    /// First day of the billed period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_period: Option<NaiveDate>,
    /// Last day of the billed period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_period: Option<NaiveDate>,
    /// Number of billing periods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_count: Option<u32>,
    /// Billing type label, e.g. "Monthly".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_type: Option<String>,
}

impl BillingFields {
    /// Period count as entered, or the number of calendar months touched by
    /// the start and end dates.
    #[must_use]
    pub fn effective_period_count(&self) -> Option<u32> {
        if let Some(count) = self.period_count {
            return Some(count);
        }
        let (start, end) = (self.start_period?, self.end_period?);
        months_spanned(start, end)
    }
}

/// Counts calendar months from `start` to `end`, both inclusive.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn months_spanned(start: NaiveDate, end: NaiveDate) -> Option<u32> {
    if end < start {
        return None;
    }
    let months = (end.year() - start.year()) * 12 + end.month0() as i32 - start.month0() as i32;
    u32::try_from(months + 1).ok()
}

/// Site and sales-order fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFields {
    /// Reference to the SO-number record. Omitted from payloads when unset,
    /// since the backend enforces it as a foreign key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sonumb_id: Option<i64>,
    /// Site identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// Site name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    /// Sales-order number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so_number: Option<String>,
}

/// Additional information of a request, shaped by its section kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdditionalInfo {
    /// Billing period information.
    Billing(BillingFields),
    /// Site and sales-order information.
    SiteNumber(SiteFields),
    /// Both billing and site information.
    Subscription {
        /// Billing period information.
        billing: BillingFields,
        /// Site and sales-order information.
        site: SiteFields,
    },
}

/// Flat additional-information record as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfoRecord {
    /// Owning request.
    #[serde(default)]
    pub pr_number: Option<RequestNumber>,
    /// Billing fields.
    #[serde(flatten)]
    pub billing: BillingFields,
    /// Site fields.
    #[serde(flatten)]
    pub site: SiteFields,
}

impl AdditionalInfo {
    /// Returns an empty section of the given kind, or `None` if the kind
    /// carries no section.
    #[must_use]
    pub fn empty(kind: SectionKind) -> Option<Self> {
        Self::from_parts(kind, BillingFields::default(), SiteFields::default())
    }

    /// Shapes a backend record by section kind, dropping unrelated fields.
    #[must_use]
    pub fn from_record(kind: SectionKind, record: AdditionalInfoRecord) -> Option<Self> {
        Self::from_parts(kind, record.billing, record.site)
    }

    fn from_parts(kind: SectionKind, billing: BillingFields, site: SiteFields) -> Option<Self> {
        match kind {
            SectionKind::None => None,
            SectionKind::Billing => Some(Self::Billing(billing)),
            SectionKind::SiteNumber => Some(Self::SiteNumber(site)),
            SectionKind::Subscription => Some(Self::Subscription { billing, site }),
        }
    }

    /// Returns the kind of this section.
    #[must_use]
    pub const fn kind(&self) -> SectionKind {
        match self {
            Self::Billing(_) => SectionKind::Billing,
            Self::SiteNumber(_) => SectionKind::SiteNumber,
            Self::Subscription { .. } => SectionKind::Subscription,
        }
    }

    /// Billing fields, if this kind has them.
    #[must_use]
    pub const fn billing(&self) -> Option<&BillingFields> {
        match self {
            Self::Billing(billing) | Self::Subscription { billing, .. } => Some(billing),
            Self::SiteNumber(_) => None,
        }
    }

    /// Site fields, if this kind has them.
    #[must_use]
    pub const fn site(&self) -> Option<&SiteFields> {
        match self {
            Self::SiteNumber(site) | Self::Subscription { site, .. } => Some(site),
            Self::Billing(_) => None,
        }
    }

    /// Builds the upsert payload: the request number plus the set fields of
    /// this kind only.
    #[must_use]
    pub fn to_payload(&self, number: &RequestNumber) -> Value {
        let mut payload = Map::new();
        payload.insert("prNumber".to_string(), Value::String(number.to_string()));
        if let Some(billing) = self.billing() {
            merge_object(&mut payload, billing);
        }
        if let Some(site) = self.site() {
            merge_object(&mut payload, site);
        }
        Value::Object(payload)
    }
}

fn merge_object<T: Serialize>(target: &mut Map<String, Value>, fields: &T) {
    if let Ok(Value::Object(map)) = serde_json::to_value(fields) {
        target.extend(map);
    }
}
