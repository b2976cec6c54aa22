//! Application services: load an aggregate, apply the client's descriptor,
//! save it back.

mod activity;
mod entry;
mod logbook;

pub use activity::ActivityService;
pub use entry::LogbookEntryService;
pub use logbook::LogbookService;

use logbook_config::{AppConfig, PagingSettings};
use logbook_core::ReconcilePolicy;
use logbook_storage::DynStorage;

/// What every service needs: the store and the settings that shape updates.
#[derive(Clone)]
pub struct ServiceContext {
    pub storage: DynStorage,
    pub policy: ReconcilePolicy,
    pub paging: PagingSettings,
    pub max_conflict_attempts: u32,
}

impl ServiceContext {
    pub fn new(storage: DynStorage, config: &AppConfig) -> Self {
        Self {
            storage,
            policy: config.reconcile,
            paging: config.paging.clone(),
            max_conflict_attempts: config.retry.max_conflict_attempts,
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("backend", &self.storage.backend_name())
            .field("policy", &self.policy)
            .field("paging", &self.paging)
            .field("max_conflict_attempts", &self.max_conflict_attempts)
            .finish()
    }
}
