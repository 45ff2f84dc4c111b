//! Outcome of a multi-step draft save.

use procura_core::draft::Section;
use procura_shared::types::RequestNumber;

/// What happened to one section during a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Sent to the backend.
    Saved,
    /// Already saved and unchanged.
    Skipped,
    /// The section does not apply, nothing to send.
    NotApplicable,
    /// Best-effort step failed; later steps still ran.
    SoftFailed(String),
}

/// Per-section outcome of [`DraftSequencer::save_draft_all`](super::DraftSequencer::save_draft_all).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    number: RequestNumber,
    steps: Vec<(Section, StepOutcome)>,
}

impl SaveReport {
    pub(crate) fn new(number: RequestNumber) -> Self {
        Self {
            number,
            steps: Vec::with_capacity(Section::ORDER.len()),
        }
    }

    pub(crate) fn record(&mut self, section: Section, outcome: StepOutcome) {
        self.steps.push((section, outcome));
    }

    /// Request number the draft was saved under.
    #[must_use]
    pub fn number(&self) -> &RequestNumber {
        &self.number
    }

    /// Outcomes in save order.
    #[must_use]
    pub fn steps(&self) -> &[(Section, StepOutcome)] {
        &self.steps
    }

    /// Outcome of one section.
    #[must_use]
    pub fn outcome(&self, section: Section) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, outcome)| outcome)
    }

    /// Sections sent to the backend.
    pub fn saved(&self) -> impl Iterator<Item = Section> + '_ {
        self.steps
            .iter()
            .filter(|(_, outcome)| *outcome == StepOutcome::Saved)
            .map(|(section, _)| *section)
    }

    /// Best-effort failures, if any.
    pub fn warnings(&self) -> impl Iterator<Item = (Section, &str)> {
        self.steps.iter().filter_map(|(section, outcome)| match outcome {
            StepOutcome::SoftFailed(message) => Some((*section, message.as_str())),
            _ => None,
        })
    }
}
