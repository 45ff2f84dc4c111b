//! Purchase type reference data and id resolution.
//!
//! Older requests carry their type as a formatted display string instead of
//! a numeric id. [`resolve_reference_id`] is the one place that turns either
//! form into an id; every view and the sequencer go through it.

use serde::{Deserialize, Serialize};

use super::kind::{SectionKind, resolve};
use crate::request::BasicInfo;

/// A purchase type from the reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseType {
    /// Type id.
    pub id: i32,
    /// Type name.
    pub name: String,
    /// Category shown after the name, e.g. "Capex".
    #[serde(default)]
    pub category: Option<String>,
}

/// A purchase sub-type from the reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSubType {
    /// Sub-type id.
    pub id: i32,
    /// Owning type id.
    pub type_id: i32,
    /// Sub-type name.
    pub name: String,
}

/// Reference data that can be matched against a legacy display string.
pub trait ReferenceLabel {
    /// Numeric id of the entry.
    fn id(&self) -> i32;

    /// Returns true if `label` names this entry.
    fn matches_label(&self, label: &str) -> bool;

    /// Label shown to users.
    fn display_label(&self) -> String;
}

impl ReferenceLabel for PurchaseType {
    fn id(&self) -> i32 {
        self.id
    }

    fn matches_label(&self, label: &str) -> bool {
        label.eq_ignore_ascii_case(self.name.trim())
            || label.eq_ignore_ascii_case(self.display_label().as_str())
    }

    fn display_label(&self) -> String {
        match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => {
                format!("{} {category}", self.name.trim())
            }
            _ => self.name.trim().to_string(),
        }
    }
}

impl ReferenceLabel for PurchaseSubType {
    fn id(&self) -> i32 {
        self.id
    }

    fn matches_label(&self, label: &str) -> bool {
        label.eq_ignore_ascii_case(self.name.trim())
    }

    fn display_label(&self) -> String {
        self.name.trim().to_string()
    }
}

/// Resolves an id from a direct field, a legacy label, or a numeric string.
///
/// Tiers, first success wins:
/// 1. a positive direct id;
/// 2. a reference whose label matches the trimmed legacy string, ignoring
///    ASCII case;
/// 3. the legacy string parsed as a positive integer.
#[must_use]
pub fn resolve_reference_id<R: ReferenceLabel>(
    direct: Option<i32>,
    legacy: Option<&str>,
    references: &[R],
) -> Option<i32> {
    if let Some(id) = direct.filter(|id| *id > 0) {
        return Some(id);
    }

    let legacy = legacy.map(str::trim).filter(|s| !s.is_empty())?;

    if let Some(reference) = references.iter().find(|r| r.matches_label(legacy)) {
        return Some(reference.id());
    }

    legacy.parse::<i32>().ok().filter(|id| *id > 0)
}

/// Looks up the display label for an id.
#[must_use]
pub fn label_for<R: ReferenceLabel>(id: Option<i32>, references: &[R]) -> Option<String> {
    let id = id?;
    references
        .iter()
        .find(|r| r.id() == id)
        .map(ReferenceLabel::display_label)
}

/// Resolved type and sub-type of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTypes {
    /// Purchase type id.
    pub type_id: Option<i32>,
    /// Purchase sub-type id.
    pub sub_type_id: Option<i32>,
}

impl ResolvedTypes {
    /// Resolves the type of a request against the type list.
    ///
    /// Use this first: the sub-type list to pass to [`Self::with_sub_type`]
    /// depends on the type.
    #[must_use]
    pub fn type_only(basic: &BasicInfo, types: &[PurchaseType]) -> Self {
        Self {
            type_id: resolve_reference_id(basic.type_id, basic.purchase_type.as_deref(), types),
            sub_type_id: None,
        }
    }

    /// Resolves the sub-type against the sub-types of the resolved type.
    #[must_use]
    pub fn with_sub_type(self, basic: &BasicInfo, sub_types: &[PurchaseSubType]) -> Self {
        Self {
            type_id: self.type_id,
            sub_type_id: resolve_reference_id(
                basic.sub_type_id,
                basic.purchase_sub_type.as_deref(),
                sub_types,
            ),
        }
    }

    /// Section kind carried by these types.
    #[must_use]
    pub const fn section(&self) -> SectionKind {
        resolve(self.type_id, self.sub_type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> Vec<PurchaseType> {
        vec![
            PurchaseType {
                id: 5,
                name: "Subscription".to_string(),
                category: Some("Opex".to_string()),
            },
            PurchaseType {
                id: 6,
                name: "Service".to_string(),
                category: None,
            },
        ]
    }

    fn sub_types() -> Vec<PurchaseSubType> {
        vec![
            PurchaseSubType {
                id: 1,
                type_id: 6,
                name: "One-off".to_string(),
            },
            PurchaseSubType {
                id: 2,
                type_id: 6,
                name: "Recurring".to_string(),
            },
        ]
    }

    #[test]
    fn test_direct_id_wins() {
        assert_eq!(resolve_reference_id(Some(6), Some("Subscription Opex"), &types()), Some(6));
    }

    #[test]
    fn test_zero_direct_id_falls_through() {
        assert_eq!(resolve_reference_id(Some(0), Some("Service"), &types()), Some(6));
    }

    #[test]
    fn test_formatted_label_match() {
        assert_eq!(resolve_reference_id(None, Some("Subscription Opex"), &types()), Some(5));
        assert_eq!(resolve_reference_id(None, Some(" subscription opex "), &types()), Some(5));
    }

    #[test]
    fn test_bare_name_match() {
        assert_eq!(resolve_reference_id(None, Some("Subscription"), &types()), Some(5));
    }

    #[test]
    fn test_numeric_string_fallback() {
        assert_eq!(resolve_reference_id(None, Some("7"), &types()), Some(7));
        assert_eq!(resolve_reference_id::<PurchaseType>(None, Some("7"), &[]), Some(7));
    }

    #[test]
    fn test_unresolvable() {
        assert_eq!(resolve_reference_id(None, Some("Hardware"), &types()), None);
        assert_eq!(resolve_reference_id(None, Some("-3"), &types()), None);
        assert_eq!(resolve_reference_id(None, Some("  "), &types()), None);
        assert_eq!(resolve_reference_id(None, None, &types()), None);
    }

    #[test]
    fn test_display_label() {
        let types = types();
        assert_eq!(types[0].display_label(), "Subscription Opex");
        assert_eq!(types[1].display_label(), "Service");
        assert_eq!(label_for(Some(6), &types), Some("Service".to_string()));
        assert_eq!(label_for(Some(9), &types), None);
        assert_eq!(label_for(None, &types), None);
    }

    #[test]
    fn test_resolved_types_from_legacy_strings() {
        let basic = BasicInfo {
            purchase_type: Some("Service".to_string()),
            purchase_sub_type: Some("Recurring".to_string()),
            ..BasicInfo::default()
        };
        let resolved = ResolvedTypes::type_only(&basic, &types()).with_sub_type(&basic, &sub_types());
        assert_eq!(resolved.type_id, Some(6));
        assert_eq!(resolved.sub_type_id, Some(2));
        assert_eq!(resolved.section(), SectionKind::Billing);
    }

    #[test]
    fn test_resolved_types_missing_type_is_none_section() {
        let resolved = ResolvedTypes::type_only(&BasicInfo::default(), &types());
        assert_eq!(resolved.type_id, None);
        assert_eq!(resolved.section(), SectionKind::None);
    }
}
