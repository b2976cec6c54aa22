use std::sync::Arc;

use logbook_storage::DynStorage;

use crate::InMemoryStorage;

/// Supported storage backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage implemented on top of papaya::HashMap
    InMemoryPapaya,
}

/// Storage-specific configuration options.
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// Initial capacity of the entry and activity maps.
    pub preallocate_items: Option<usize>,
}

/// Factory configuration to construct a storage instance.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub options: StorageOptions,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemoryPapaya,
            options: StorageOptions::default(),
        }
    }
}

/// Create a storage instance based on the provided configuration.
///
/// For now, only the in-memory papaya backend is supported.
pub fn create_storage(config: &StorageConfig) -> DynStorage {
    match config.backend {
        StorageBackend::InMemoryPapaya => {
            Arc::new(InMemoryStorage::with_options(config.options.clone()))
        }
    }
}
