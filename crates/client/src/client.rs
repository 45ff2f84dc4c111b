//! Wiring of the workflow services around one backend.

use std::sync::Arc;

use procura_shared::{AppError, ClientConfig};
use tracing::info;

use crate::api::{HttpProcurementApi, ProcurementApi};
use crate::cache::ReferenceCache;
use crate::decision::DecisionService;
use crate::release::ReleaseService;
use crate::sequencer::DraftSequencer;
use crate::store::{DraftStore, FileDraftStore};
use crate::view::ViewComposer;

/// All workflow services sharing one backend and one reference cache.
pub struct Procura<A: ProcurementApi, S: DraftStore> {
    /// Reference data cache.
    pub references: Arc<ReferenceCache<A>>,
    /// Draft saving and submission.
    pub drafts: DraftSequencer<A, S>,
    /// Screen views.
    pub views: ViewComposer<A>,
    /// Reviewing decisions and goods receipt.
    pub decisions: DecisionService<A>,
    /// Amortization period actions.
    pub release: ReleaseService<A>,
}

impl Procura<HttpProcurementApi, FileDraftStore> {
    /// Connects to the configured backend, keeping drafts in the configured
    /// directory.
    pub fn connect(config: &ClientConfig) -> Result<Self, AppError> {
        let api = HttpProcurementApi::new(&config.backend)?;
        info!(base_url = %api.base_url(), "procurement backend configured");
        let store = FileDraftStore::from_config(&config.drafts);
        Ok(Self::new(Arc::new(api), Arc::new(store), config))
    }
}

impl<A: ProcurementApi, S: DraftStore> Procura<A, S> {
    /// Wires the services around an API and a draft store.
    #[must_use]
    pub fn new(api: Arc<A>, store: Arc<S>, config: &ClientConfig) -> Self {
        let references = Arc::new(ReferenceCache::new(Arc::clone(&api), &config.cache));
        Self {
            drafts: DraftSequencer::new(Arc::clone(&api), store, Arc::clone(&references)),
            views: ViewComposer::new(Arc::clone(&api), Arc::clone(&references)),
            decisions: DecisionService::new(Arc::clone(&api)),
            release: ReleaseService::new(api),
            references,
        }
    }
}
