//! Reference data cache.
//!
//! Purchase types, sub-types and employee names change rarely and are read
//! by every screen. Each is fetched at most once per session: concurrent
//! readers of a key share a single backend call. Failed fetches are logged,
//! yield an empty result and are not cached, so the next read retries.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use moka::future::Cache;
use procura_core::request::BasicInfo;
use procura_core::section::{PurchaseSubType, PurchaseType, ResolvedTypes, label_for};
use procura_shared::config::CacheConfig;
use procura_shared::types::EmployeeId;
use tracing::{debug, warn};

use crate::api::{ClientError, ProcurementApi};
use crate::coalesce::InFlight;

type NameBatch = Result<Arc<HashMap<String, String>>, ClientError>;

/// Session-long cache of reference data.
pub struct ReferenceCache<A: ProcurementApi> {
    api: Arc<A>,
    types: Cache<(), Arc<Vec<PurchaseType>>>,
    sub_types: Cache<i32, Arc<Vec<PurchaseSubType>>>,
    employees: Cache<String, String>,
    lookups: InFlight<String, NameBatch>,
}

impl<A: ProcurementApi> ReferenceCache<A> {
    /// Creates an empty cache in front of `api`.
    #[must_use]
    pub fn new(api: Arc<A>, config: &CacheConfig) -> Self {
        Self {
            api,
            types: Cache::builder().max_capacity(1).build(),
            sub_types: Cache::builder().max_capacity(config.max_capacity).build(),
            employees: Cache::builder().max_capacity(config.max_capacity).build(),
            lookups: InFlight::new(),
        }
    }

    /// All purchase types.
    pub async fn purchase_types(&self) -> Arc<Vec<PurchaseType>> {
        let result = self
            .types
            .try_get_with((), async {
                debug!("loading purchase types");
                self.api.purchase_types().await.map(Arc::new)
            })
            .await;

        result.unwrap_or_else(|err| {
            warn!(error = %err, "failed to load purchase types");
            Arc::new(Vec::new())
        })
    }

    /// Sub-types of a purchase type.
    pub async fn purchase_sub_types(&self, type_id: i32) -> Arc<Vec<PurchaseSubType>> {
        let result = self
            .sub_types
            .try_get_with(type_id, async {
                debug!(type_id, "loading purchase sub-types");
                self.api.purchase_sub_types(type_id).await.map(Arc::new)
            })
            .await;

        result.unwrap_or_else(|err| {
            warn!(type_id, error = %err, "failed to load purchase sub-types");
            Arc::new(Vec::new())
        })
    }

    /// Resolves the type and sub-type ids of a request through the reference
    /// id cascade.
    pub async fn resolve_types(&self, basic: &BasicInfo) -> ResolvedTypes {
        let types = self.purchase_types().await;
        let resolved = ResolvedTypes::type_only(basic, &types);
        match resolved.type_id {
            Some(type_id) => {
                let sub_types = self.purchase_sub_types(type_id).await;
                resolved.with_sub_type(basic, &sub_types)
            }
            None => resolved,
        }
    }

    /// Display labels of resolved types.
    pub async fn type_labels(&self, resolved: ResolvedTypes) -> (Option<String>, Option<String>) {
        let types = self.purchase_types().await;
        let type_label = label_for(resolved.type_id, &types);
        let sub_type_label = match resolved.type_id {
            Some(type_id) => label_for(
                resolved.sub_type_id,
                &self.purchase_sub_types(type_id).await,
            ),
            None => None,
        };
        (type_label, sub_type_label)
    }

    /// Display names of employees, keyed by normalized id.
    ///
    /// Ids already cached are answered locally; the rest are looked up in a
    /// single batch. Ids the directory does not know are absent from the map.
    pub async fn employee_names(&self, ids: &[EmployeeId]) -> HashMap<String, String> {
        let keys: BTreeSet<String> = ids
            .iter()
            .map(EmployeeId::normalized)
            .filter(|key| !key.is_empty())
            .collect();

        let mut names = HashMap::with_capacity(keys.len());
        let mut missing = Vec::new();
        for key in keys {
            match self.employees.get(&key).await {
                Some(name) => {
                    names.insert(key, name);
                }
                None => missing.push(key),
            }
        }
        if missing.is_empty() {
            return names;
        }

        let api = Arc::clone(&self.api);
        let batch = missing.clone();
        let fetched = self
            .lookups
            .run(missing.join(","), move || async move {
                let rows = api.lookup_employees(&batch).await?;
                Ok(Arc::new(
                    rows.into_iter()
                        .map(|row| (row.id.normalized(), row.name))
                        .collect::<HashMap<_, _>>(),
                ))
            })
            .await;

        match fetched {
            Ok(found) => {
                for key in missing {
                    if let Some(name) = found.get(&key) {
                        self.employees.insert(key.clone(), name.clone()).await;
                        names.insert(key, name.clone());
                    }
                }
            }
            Err(err) => {
                warn!(count = missing.len(), error = %err, "failed to look up employee names");
            }
        }
        names
    }

    /// Display name of one employee, or its raw id when unknown.
    pub async fn employee_name(&self, id: &EmployeeId) -> String {
        self.employee_names(std::slice::from_ref(id))
            .await
            .remove(&id.normalized())
            .unwrap_or_else(|| id.as_str().trim().to_string())
    }
}
