//! Draft client-state.
//!
//! A local, non-authoritative record of how far the user got in the wizard
//! and which sections were already persisted during this session. It lets a
//! retried save skip work; it never decides what the backend holds.

use std::fmt;

use chrono::{DateTime, Utc};
use procura_shared::types::RequestNumber;
use serde::{Deserialize, Serialize};

use crate::validation::WizardStep;

/// A persistable section of a draft request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// The parent record.
    Basic,
    /// Billing and/or site information.
    Additional,
    /// Line items.
    Items,
    /// Approval assignment.
    Approval,
    /// Documents.
    Documents,
}

impl Section {
    /// Sections in the order they are persisted.
    pub const ORDER: [Self; 5] = [
        Self::Basic,
        Self::Additional,
        Self::Items,
        Self::Approval,
        Self::Documents,
    ];

    /// Returns the stable section name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Additional => "additional",
            Self::Items => "items",
            Self::Approval => "approval",
            Self::Documents => "documents",
        }
    }

    /// Wizard step where the section is edited.
    #[must_use]
    pub const fn step(self) -> WizardStep {
        match self {
            Self::Basic => WizardStep::BasicInformation,
            Self::Additional => WizardStep::AdditionalInformation,
            Self::Items => WizardStep::LineItems,
            Self::Approval => WizardStep::Approval,
            Self::Documents => WizardStep::Documents,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which child sections have been persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSections {
    /// Line items saved.
    pub items: bool,
    /// Approval assignment saved.
    pub approval: bool,
    /// Documents saved.
    pub documents: bool,
    /// Additional information saved.
    pub additional: bool,
}

impl SavedSections {
    /// Returns the flag of a section. The parent record has no flag: having a
    /// request number is what marks it saved.
    #[must_use]
    pub const fn get(&self, section: Section) -> bool {
        match section {
            Section::Basic => false,
            Section::Additional => self.additional,
            Section::Items => self.items,
            Section::Approval => self.approval,
            Section::Documents => self.documents,
        }
    }

    /// Sets the flag of a section.
    pub fn set(&mut self, section: Section, saved: bool) {
        match section {
            Section::Basic => {}
            Section::Additional => self.additional = saved,
            Section::Items => self.items = saved,
            Section::Approval => self.approval = saved,
            Section::Documents => self.documents = saved,
        }
    }
}

/// Local record of a draft in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftState {
    /// Request number, once the parent record exists.
    pub pr_number: Option<RequestNumber>,
    /// Last wizard step the user was on.
    pub step: WizardStep,
    /// Persisted sections.
    pub saved: SavedSections,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

impl DraftState {
    /// Creates the state of a fresh draft.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pr_number: None,
            step: WizardStep::BasicInformation,
            saved: SavedSections::default(),
            updated_at: Utc::now(),
        }
    }

    /// Records the request number issued for the parent record.
    pub fn set_number(&mut self, number: RequestNumber) {
        if self.pr_number.as_ref() != Some(&number) {
            self.saved = SavedSections::default();
        }
        self.pr_number = Some(number);
        self.touch();
    }

    /// Marks a section persisted.
    pub fn mark_saved(&mut self, section: Section) {
        self.saved.set(section, true);
        self.touch();
    }

    /// Marks a section as needing a save.
    pub fn mark_unsaved(&mut self, section: Section) {
        self.saved.set(section, false);
        self.touch();
    }

    /// Returns true if the section was persisted this session.
    #[must_use]
    pub fn is_saved(&self, section: Section) -> bool {
        match section {
            Section::Basic => self.pr_number.is_some(),
            other => self.saved.get(other),
        }
    }

    /// Moves the wizard to a step.
    pub fn go_to(&mut self, step: WizardStep) {
        self.step = step;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for DraftState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_nothing_saved() {
        let state = DraftState::new();
        for section in Section::ORDER {
            assert!(!state.is_saved(section));
        }
        assert_eq!(state.step, WizardStep::BasicInformation);
    }

    #[test]
    fn test_number_marks_basic_saved() {
        let mut state = DraftState::new();
        state.set_number(RequestNumber::new("PR-1"));
        assert!(state.is_saved(Section::Basic));
    }

    #[test]
    fn test_mark_saved_and_unsaved() {
        let mut state = DraftState::new();
        state.mark_saved(Section::Items);
        assert!(state.is_saved(Section::Items));
        assert!(!state.is_saved(Section::Approval));
        state.mark_unsaved(Section::Items);
        assert!(!state.is_saved(Section::Items));
    }

    #[test]
    fn test_new_number_resets_flags() {
        let mut state = DraftState::new();
        state.set_number(RequestNumber::new("PR-1"));
        state.mark_saved(Section::Documents);
        state.set_number(RequestNumber::new("PR-1"));
        assert!(state.is_saved(Section::Documents));
        state.set_number(RequestNumber::new("PR-2"));
        assert!(!state.is_saved(Section::Documents));
    }

    #[test]
    fn test_json_shape() {
        let mut state = DraftState::new();
        state.set_number(RequestNumber::new("PR-9"));
        state.mark_saved(Section::Approval);
        state.go_to(WizardStep::Documents);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["prNumber"], "PR-9");
        assert_eq!(json["step"], "documents");
        assert_eq!(json["saved"]["approval"], true);
        let back: DraftState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
