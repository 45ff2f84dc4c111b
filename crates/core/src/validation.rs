//! Final-submission validation of a draft request.
//!
//! Unlike the per-step checks of the wizard, submission validation never
//! stops at the first problem: every failing field is collected into one
//! [`ValidationReport`] so the user sees the whole list at once.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::request::{ApprovalAssignment, BasicInfo, LineItem};
use crate::section::{AdditionalInfo, ResolvedTypes, SectionKind};

/// Wizard steps, in the order the user walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Requestor, company, type and name.
    BasicInformation,
    /// Billing and/or site information, when the type calls for it.
    AdditionalInformation,
    /// Line items.
    LineItems,
    /// Reviewer, approver and confirmer.
    Approval,
    /// Supporting documents.
    Documents,
}

impl WizardStep {
    /// All steps in wizard order.
    pub const ALL: [Self; 5] = [
        Self::BasicInformation,
        Self::AdditionalInformation,
        Self::LineItems,
        Self::Approval,
        Self::Documents,
    ];

    /// One-based position of the step in the wizard.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::BasicInformation => 1,
            Self::AdditionalInformation => 2,
            Self::LineItems => 3,
            Self::Approval => 4,
            Self::Documents => 5,
        }
    }

    /// Returns the step at a one-based position.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::BasicInformation),
            2 => Some(Self::AdditionalInformation),
            3 => Some(Self::LineItems),
            4 => Some(Self::Approval),
            5 => Some(Self::Documents),
            _ => None,
        }
    }

    /// Returns the step title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::BasicInformation => "Basic Information",
            Self::AdditionalInformation => "Additional Information",
            Self::LineItems => "Items",
            Self::Approval => "Approval",
            Self::Documents => "Documents",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A validation failure tied to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Step holding the field.
    pub step: WizardStep,
    /// Field key, e.g. `items[1].quantity`.
    pub field: String,
    /// Message shown beneath the field.
    pub message: String,
}

/// All validation failures of a submission attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationReport {}

impl ValidationReport {
    fn push(&mut self, step: WizardStep, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            step,
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns every failure in wizard order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The field to focus and scroll into view.
    #[must_use]
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    /// Failures of one step.
    pub fn for_step(&self, step: WizardStep) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.step == step)
    }

    /// One line per failure, prefixed by its step.
    #[must_use]
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.step, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Everything final submission checks.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionInput<'a> {
    /// Basic information.
    pub basic: &'a BasicInfo,
    /// Resolved type and sub-type.
    pub types: ResolvedTypes,
    /// Additional information, if entered.
    pub additional: Option<&'a AdditionalInfo>,
    /// Line items.
    pub items: &'a [LineItem],
    /// Approval assignment.
    pub approval: &'a ApprovalAssignment,
    /// Number of persisted plus pending documents.
    pub document_count: usize,
}

/// Validates all five wizard steps and aggregates the failures.
///
/// # Errors
///
/// Returns the full [`ValidationReport`] if any field fails.
pub fn validate_submission(input: &SubmissionInput<'_>) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::default();

    validate_basic(input, &mut report);
    validate_additional(input.types.section(), input.additional, &mut report);
    validate_items(input.items, &mut report);
    validate_approval(input.approval, &mut report);

    if input.document_count == 0 {
        report.push(
            WizardStep::Documents,
            "documents",
            "at least one document is required",
        );
    }

    report.into_result()
}

fn validate_basic(input: &SubmissionInput<'_>, report: &mut ValidationReport) {
    let step = WizardStep::BasicInformation;
    let basic = input.basic;

    if basic.requestor.is_blank() {
        report.push(step, "requestor", "requestor is required");
    }
    if basic.applicant.is_blank() {
        report.push(step, "applicant", "applicant is required");
    }
    if basic.company.trim().is_empty() {
        report.push(step, "company", "company is required");
    }
    if input.types.type_id.is_none() {
        report.push(step, "type", "purchase type is required");
    }
    if basic.name.trim().is_empty() {
        report.push(step, "name", "name is required");
    }
}

fn validate_additional(
    kind: SectionKind,
    additional: Option<&AdditionalInfo>,
    report: &mut ValidationReport,
) {
    let step = WizardStep::AdditionalInformation;
    if !kind.requires_fetch() {
        return;
    }

    let Some(info) = additional.filter(|info| info.kind() == kind) else {
        report.push(step, "additional", format!("{kind} information is required"));
        return;
    };

    if let Some(billing) = info.billing() {
        match (billing.start_period, billing.end_period) {
            (None, _) => report.push(step, "startPeriod", "start period is required"),
            (_, None) => report.push(step, "endPeriod", "end period is required"),
            (Some(start), Some(end)) if end < start => {
                report.push(step, "endPeriod", "end period cannot be before start period");
            }
            _ => {}
        }
        if billing.effective_period_count().is_none_or(|count| count == 0) {
            report.push(step, "periodCount", "period count must be greater than zero");
        }
    }

    if let Some(site) = info.site() {
        if site
            .so_number
            .as_deref()
            .is_none_or(|so| so.trim().is_empty())
        {
            report.push(step, "soNumber", "SO number is required");
        }
    }
}

fn validate_items(items: &[LineItem], report: &mut ValidationReport) {
    let step = WizardStep::LineItems;
    if items.is_empty() {
        report.push(step, "items", "at least one item is required");
        return;
    }

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        if item.name.trim().is_empty() {
            report.push(
                step,
                format!("items[{index}].name"),
                format!("Item {position}: name is required"),
            );
        }
        if item.quantity <= 0 {
            report.push(
                step,
                format!("items[{index}].quantity"),
                format!("Item {position}: quantity must be greater than zero"),
            );
        }
        if item.unit_price < Decimal::ZERO {
            report.push(
                step,
                format!("items[{index}].unitPrice"),
                format!("Item {position}: unit price cannot be negative"),
            );
        }
    }
}

fn validate_approval(approval: &ApprovalAssignment, report: &mut ValidationReport) {
    for (role, assignee) in approval.roles() {
        if assignee.is_none() {
            report.push(WizardStep::Approval, role, format!("{role} is required"));
        }
    }
}
