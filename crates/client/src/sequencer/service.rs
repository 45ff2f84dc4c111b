//! Draft submission sequencer.
//!
//! A draft is persisted as five sections in a fixed order: the parent record
//! first (it issues the request number the others hang off), then additional
//! information, line items, approval assignment and documents. Every section
//! save is coalesced per (draft, section): a second save requested while
//! one is running awaits the running one. Only drafts still in Draft status
//! can be saved.

use std::sync::Arc;

use procura_core::draft::{DraftState, Section};
use procura_core::request::{Document, PendingDocument};
use procura_core::validation::{SubmissionInput, WizardStep, validate_submission};
use procura_core::workflow::{WorkflowError, WorkflowService};
use procura_shared::types::{DocumentId, EmployeeId, RequestNumber};
use tracing::{debug, info, warn};

use super::error::SequenceError;
use super::report::{SaveReport, StepOutcome};
use crate::api::{ProcurementApi, StatusChange};
use crate::cache::ReferenceCache;
use crate::coalesce::InFlight;
use crate::draft::{DraftKey, DraftRequest};
use crate::store::{DraftStore, slot_name};

/// Result of one coalesced section save.
#[derive(Debug, Clone)]
struct SectionSaved {
    number: RequestNumber,
    uploaded: Vec<Document>,
}

impl SectionSaved {
    fn new(number: RequestNumber) -> Self {
        Self {
            number,
            uploaded: Vec::new(),
        }
    }
}

type SaveKey = (DraftKey, Section);

/// Persists drafts section by section and submits them.
pub struct DraftSequencer<A: ProcurementApi, S: DraftStore> {
    api: Arc<A>,
    store: Arc<S>,
    references: Arc<ReferenceCache<A>>,
    in_flight: InFlight<SaveKey, Result<SectionSaved, SequenceError>>,
}

impl<A: ProcurementApi, S: DraftStore> DraftSequencer<A, S> {
    /// Creates a sequencer.
    #[must_use]
    pub fn new(api: Arc<A>, store: Arc<S>, references: Arc<ReferenceCache<A>>) -> Self {
        Self {
            api,
            store,
            references,
            in_flight: InFlight::new(),
        }
    }

    /// Returns true if a save of `section` is running for the draft.
    #[must_use]
    pub fn is_saving(&self, draft: &DraftRequest, section: Section) -> bool {
        self.in_flight.is_running(&(draft.key(), section))
    }

    /// Stored client-state of a draft.
    pub async fn draft_state(&self, number: Option<&RequestNumber>) -> DraftState {
        match self.store.load(number).await {
            Ok(state) => state.unwrap_or_default(),
            Err(err) => {
                warn!(slot = %slot_name(number), error = %err, "failed to load draft state");
                DraftState::new()
            }
        }
    }

    /// Remembers the wizard step the user is on.
    pub async fn remember_step(&self, number: Option<&RequestNumber>, step: WizardStep) {
        let mut state = self.draft_state(number).await;
        state.go_to(step);
        if let Err(err) = self.store.save(number, &state).await {
            warn!(slot = %slot_name(number), error = %err, "failed to save draft state");
        }
    }

    /// Creates or updates the parent record and returns its number.
    pub async fn save_basic(&self, draft: &DraftRequest) -> Result<RequestNumber, SequenceError> {
        ensure_editable(draft)?;
        let key = (draft.key(), Section::Basic);
        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let existing = draft.number().cloned();
        let basic = draft.basic().clone();

        let saved = self
            .in_flight
            .run(key, move || async move {
                let number = match existing {
                    Some(number) => {
                        api.update_request(&number, &basic)
                            .await
                            .map_err(SequenceError::step(Section::Basic))?;
                        debug!(pr_number = %number, "request updated");
                        number
                    }
                    None => {
                        let number = api
                            .create_request(&basic)
                            .await
                            .map_err(SequenceError::step(Section::Basic))?;
                        info!(pr_number = %number, "request created");
                        adopt_new_slot(store.as_ref(), &number).await;
                        number
                    }
                };
                mark_state(store.as_ref(), &number, Section::Basic).await;
                Ok(SectionSaved::new(number))
            })
            .await?;
        Ok(saved.number)
    }

    /// Saves the additional information when the request type calls for it.
    pub async fn save_additional(&self, draft: &DraftRequest) -> Result<StepOutcome, SequenceError> {
        ensure_editable(draft)?;
        let kind = self
            .references
            .resolve_types(draft.basic())
            .await
            .section();
        if !kind.requires_fetch() {
            debug!("request type has no additional section");
            return Ok(StepOutcome::NotApplicable);
        }

        let number = require_number(draft, Section::Additional)?;
        let info = draft
            .additional()
            .filter(|info| info.kind() == kind)
            .ok_or_else(|| SequenceError::SectionMismatch {
                expected: kind,
                found: draft.additional().map(|info| info.kind()),
            })?;
        let payload = info.to_payload(&number);

        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        self.in_flight
            .run((draft.key(), Section::Additional), move || async move {
                api.save_additional_info(&number, payload)
                    .await
                    .map_err(SequenceError::step(Section::Additional))?;
                debug!(pr_number = %number, %kind, "additional information saved");
                mark_state(store.as_ref(), &number, Section::Additional).await;
                Ok(SectionSaved::new(number))
            })
            .await?;
        Ok(StepOutcome::Saved)
    }

    /// Replaces the line items of the request.
    pub async fn save_items(&self, draft: &DraftRequest) -> Result<StepOutcome, SequenceError> {
        ensure_editable(draft)?;
        let number = require_number(draft, Section::Items)?;
        if draft.items().is_empty() {
            return Err(SequenceError::NoItems);
        }

        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let items = draft.items().to_vec();
        self.in_flight
            .run((draft.key(), Section::Items), move || async move {
                api.replace_items(&number, &items)
                    .await
                    .map_err(SequenceError::step(Section::Items))?;
                debug!(pr_number = %number, count = items.len(), "items saved");
                mark_state(store.as_ref(), &number, Section::Items).await;
                Ok(SectionSaved::new(number))
            })
            .await?;
        Ok(StepOutcome::Saved)
    }

    /// Saves the approval assignment when any role is set.
    pub async fn save_approval(&self, draft: &DraftRequest) -> Result<StepOutcome, SequenceError> {
        ensure_editable(draft)?;
        let number = require_number(draft, Section::Approval)?;
        if draft.approval().is_empty() {
            return Ok(StepOutcome::NotApplicable);
        }

        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let approval = draft.approval().clone();
        self.in_flight
            .run((draft.key(), Section::Approval), move || async move {
                api.save_approval(&number, &approval)
                    .await
                    .map_err(SequenceError::step(Section::Approval))?;
                debug!(pr_number = %number, "approval saved");
                mark_state(store.as_ref(), &number, Section::Approval).await;
                Ok(SectionSaved::new(number))
            })
            .await?;
        Ok(StepOutcome::Saved)
    }

    /// Uploads pending documents one by one, then sets the full document
    /// list. The first failed upload stops the step.
    ///
    /// Returns the uploaded documents in the order they were pending.
    pub async fn save_documents(
        &self,
        draft: &DraftRequest,
    ) -> Result<Vec<Document>, SequenceError> {
        ensure_editable(draft)?;
        let number = require_number(draft, Section::Documents)?;

        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let pending: Vec<PendingDocument> = draft.pending_documents().to_vec();
        let mut ids: Vec<DocumentId> = draft.documents().iter().map(|doc| doc.id).collect();

        let saved = self
            .in_flight
            .run((draft.key(), Section::Documents), move || async move {
                let mut uploaded = Vec::with_capacity(pending.len());
                for document in &pending {
                    let stored = api.upload_document(&number, document).await.map_err(|source| {
                        SequenceError::Upload {
                            filename: document.filename.clone(),
                            source,
                        }
                    })?;
                    debug!(pr_number = %number, filename = %document.filename, "document uploaded");
                    ids.push(stored.id);
                    uploaded.push(stored);
                }

                api.sync_documents(&number, &ids)
                    .await
                    .map_err(SequenceError::step(Section::Documents))?;
                mark_state(store.as_ref(), &number, Section::Documents).await;
                Ok(SectionSaved { number, uploaded })
            })
            .await?;
        Ok(saved.uploaded)
    }

    /// Saves every section of the draft in order.
    ///
    /// A section is skipped when the stored client-state says it was saved
    /// and the draft has not changed it since. A draft without items records
    /// the items step as not applicable. Additional information is
    /// best-effort; any other failure stops the save at that section.
    pub async fn save_draft_all(
        &self,
        draft: &mut DraftRequest,
    ) -> Result<SaveReport, SequenceError> {
        ensure_editable(draft)?;
        let state = self.draft_state(draft.number()).await;
        let skip = |draft: &DraftRequest, section: Section| {
            state.is_saved(section) && !draft.is_changed(section)
        };

        let basic_outcome = if skip(draft, Section::Basic) {
            StepOutcome::Skipped
        } else {
            let number = self.save_basic(draft).await?;
            draft.set_number(number);
            draft.mark_saved(Section::Basic);
            StepOutcome::Saved
        };
        let number = require_number(draft, Section::Basic)?;
        let mut report = SaveReport::new(number.clone());
        report.record(Section::Basic, basic_outcome);

        let additional = if skip(draft, Section::Additional) {
            StepOutcome::Skipped
        } else {
            match self.save_additional(draft).await {
                Ok(outcome) => {
                    draft.mark_saved(Section::Additional);
                    outcome
                }
                Err(err) => {
                    warn!(pr_number = %number, error = %err, "additional information not saved");
                    StepOutcome::SoftFailed(err.to_string())
                }
            }
        };
        report.record(Section::Additional, additional);

        let items = if skip(draft, Section::Items) {
            StepOutcome::Skipped
        } else if draft.items().is_empty() {
            debug!(pr_number = %number, "draft has no items");
            StepOutcome::NotApplicable
        } else {
            let outcome = self.save_items(draft).await?;
            draft.mark_saved(Section::Items);
            outcome
        };
        report.record(Section::Items, items);

        let approval = if skip(draft, Section::Approval) {
            StepOutcome::Skipped
        } else {
            let outcome = self.save_approval(draft).await?;
            draft.mark_saved(Section::Approval);
            outcome
        };
        report.record(Section::Approval, approval);

        let documents = if skip(draft, Section::Documents) {
            StepOutcome::Skipped
        } else {
            let filenames: Vec<String> = draft
                .pending_documents()
                .iter()
                .map(|doc| doc.filename.clone())
                .collect();
            let uploaded = self.save_documents(draft).await?;
            for (filename, document) in filenames.iter().zip(uploaded) {
                draft.uploaded(filename, document);
            }
            draft.mark_saved(Section::Documents);
            StepOutcome::Saved
        };
        report.record(Section::Documents, documents);

        info!(
            pr_number = %number,
            saved = report.saved().count(),
            "draft saved"
        );
        Ok(report)
    }

    /// Validates, saves and submits the draft.
    ///
    /// Exactly one status change is recorded. The stored client-state of the
    /// draft is cleared once the backend accepted the submission.
    pub async fn submit(
        &self,
        draft: &mut DraftRequest,
        submitted_by: EmployeeId,
    ) -> Result<SaveReport, SequenceError> {
        let action = WorkflowService::submit(draft.status(), submitted_by)?;

        let types = self.references.resolve_types(draft.basic()).await;
        validate_submission(&SubmissionInput {
            basic: draft.basic(),
            types,
            additional: draft.additional(),
            items: draft.items(),
            approval: draft.approval(),
            document_count: draft.document_count(),
        })
        .map_err(SequenceError::Validation)?;

        let report = self.save_draft_all(draft).await?;
        let number = report.number().clone();

        self.api
            .record_status(&number, &StatusChange::from(&action))
            .await
            .map_err(SequenceError::Transition)?;
        draft.set_status(action.new_status());
        info!(pr_number = %number, "request submitted");

        if let Err(err) = self.store.clear(Some(&number)).await {
            warn!(pr_number = %number, error = %err, "failed to clear draft state");
        }
        Ok(report)
    }
}

fn ensure_editable(draft: &DraftRequest) -> Result<(), SequenceError> {
    if draft.is_editable() {
        Ok(())
    } else {
        Err(WorkflowError::ViewOnly(draft.status()).into())
    }
}

fn require_number(draft: &DraftRequest, section: Section) -> Result<RequestNumber, SequenceError> {
    draft
        .number()
        .cloned()
        .ok_or(SequenceError::MissingRequestNumber(section))
}

/// Moves the client-state of a new draft to the slot of its issued number.
async fn adopt_new_slot<S: DraftStore>(store: &S, number: &RequestNumber) {
    let state = match store.load(None).await {
        Ok(state) => state.unwrap_or_default(),
        Err(err) => {
            warn!(error = %err, "failed to load new draft state");
            DraftState::new()
        }
    };
    if let Err(err) = store.save(Some(number), &state).await {
        warn!(pr_number = %number, error = %err, "failed to save draft state");
    }
    if let Err(err) = store.clear(None).await {
        warn!(error = %err, "failed to clear new draft state");
    }
}

async fn mark_state<S: DraftStore>(store: &S, number: &RequestNumber, section: Section) {
    let mut state = match store.load(Some(number)).await {
        Ok(state) => state.unwrap_or_default(),
        Err(err) => {
            warn!(pr_number = %number, error = %err, "failed to load draft state");
            DraftState::new()
        }
    };
    state.set_number(number.clone());
    state.mark_saved(section);
    if let Err(err) = store.save(Some(number), &state).await {
        warn!(pr_number = %number, error = %err, "failed to save draft state");
    }
}
