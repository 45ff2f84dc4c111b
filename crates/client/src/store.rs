//! Draft client-state persistence.
//!
//! Stores are advisory: losing a draft state only means the next save does
//! a little more work.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use procura_core::draft::DraftState;
use procura_shared::config::DraftConfig;
use procura_shared::types::RequestNumber;
use thiserror::Error;

/// Slot name of a draft that has no request number yet.
pub const NEW_DRAFT_SLOT: &str = "new";

/// Errors from a draft store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("draft store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored state could not be read or written as JSON.
    #[error("draft state is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage key of a draft: its request number, or the "new" slot.
#[must_use]
pub fn slot_name(number: Option<&RequestNumber>) -> String {
    number.map_or_else(|| NEW_DRAFT_SLOT.to_string(), ToString::to_string)
}

/// Local storage of draft client-states.
pub trait DraftStore: Send + Sync + 'static {
    /// Loads the state of a draft, if any.
    fn load(
        &self,
        number: Option<&RequestNumber>,
    ) -> impl Future<Output = Result<Option<DraftState>, StoreError>> + Send;

    /// Saves the state of a draft.
    fn save(
        &self,
        number: Option<&RequestNumber>,
        state: &DraftState,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes the state of a draft.
    fn clear(
        &self,
        number: Option<&RequestNumber>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// In-memory store, lost with the process.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    states: Mutex<HashMap<Option<RequestNumber>, DraftState>>,
}

impl MemoryDraftStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_states<R>(
        &self,
        f: impl FnOnce(&mut HashMap<Option<RequestNumber>, DraftState>) -> R,
    ) -> R {
        let mut guard = self
            .states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }
}

impl DraftStore for MemoryDraftStore {
    async fn load(&self, number: Option<&RequestNumber>) -> Result<Option<DraftState>, StoreError> {
        let slot = number.cloned();
        Ok(self.with_states(|states| states.get(&slot).cloned()))
    }

    async fn save(
        &self,
        number: Option<&RequestNumber>,
        state: &DraftState,
    ) -> Result<(), StoreError> {
        let slot = number.cloned();
        self.with_states(|states| states.insert(slot, state.clone()));
        Ok(())
    }

    async fn clear(&self, number: Option<&RequestNumber>) -> Result<(), StoreError> {
        let slot = number.cloned();
        self.with_states(|states| states.remove(&slot));
        Ok(())
    }
}

/// One JSON file per draft under a directory.
///
/// A new draft is stored as `new.json`. A numbered draft is stored as
/// `pr-{number}.json` with every byte other than an ASCII letter, digit or
/// `-` written as `_` plus two hex digits, so distinct numbers never share
/// a file.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    /// Creates a store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store from configuration.
    #[must_use]
    pub fn from_config(config: &DraftConfig) -> Self {
        Self::new(config.dir.clone())
    }

    /// Directory holding the drafts.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, number: Option<&RequestNumber>) -> PathBuf {
        let file = number.map_or_else(
            || format!("{NEW_DRAFT_SLOT}.json"),
            |number| format!("pr-{}.json", encode_slot(number.as_str())),
        );
        self.dir.join(file)
    }
}

fn encode_slot(number: &str) -> String {
    let mut encoded = String::with_capacity(number.len());
    for byte in number.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "_{byte:02x}");
        }
    }
    encoded
}

impl DraftStore for FileDraftStore {
    async fn load(&self, number: Option<&RequestNumber>) -> Result<Option<DraftState>, StoreError> {
        match tokio::fs::read(self.path_for(number)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(
        &self,
        number: Option<&RequestNumber>,
        state: &DraftState,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(number), bytes).await?;
        Ok(())
    }

    async fn clear(&self, number: Option<&RequestNumber>) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(number)).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
