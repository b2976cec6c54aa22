//! Wiring: configuration in, services out.

use logbook_config::{AppConfig, ConfigError, StorageBackendKind, StorageSettings};
use logbook_db_memory::{StorageBackend, StorageConfig, StorageOptions, create_storage};
use logbook_storage::DynStorage;
use tracing::info;

use crate::observability::init_tracing_from_config;
use crate::services::{ActivityService, LogbookEntryService, LogbookService, ServiceContext};

#[derive(Clone)]
pub struct LogbookApp {
    config: AppConfig,
    storage: DynStorage,
    logbooks: LogbookService,
}

impl LogbookApp {
    /// Builds the storage backend and services for an already loaded config.
    pub fn from_config(config: AppConfig) -> Self {
        let storage = create_storage(&storage_config(&config.storage));
        let ctx = ServiceContext::new(storage.clone(), &config);

        let activities = ActivityService::new(ctx.clone());
        let entries = LogbookEntryService::new(ctx.clone(), activities);
        let logbooks = LogbookService::new(ctx, entries);

        info!(
            app = %config.application.name,
            backend = storage.backend_name(),
            foreign_identities = ?config.reconcile.foreign_identities,
            duplicate_identities = ?config.reconcile.duplicate_identities,
            "logbook services ready"
        );
        Self {
            config,
            storage,
            logbooks,
        }
    }

    /// Loads configuration from `path` (or `logbook.toml`) and the
    /// environment, installs the tracing subscriber, and builds the app.
    pub fn bootstrap(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = logbook_config::loader::load_config(path)?;
        init_tracing_from_config(&config.logging);
        Ok(Self::from_config(config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn storage(&self) -> &DynStorage {
        &self.storage
    }

    pub fn logbooks(&self) -> &LogbookService {
        &self.logbooks
    }

    pub fn entries(&self) -> &LogbookEntryService {
        self.logbooks.entries()
    }

    pub fn activities(&self) -> &ActivityService {
        self.logbooks.entries().activities()
    }
}

impl std::fmt::Debug for LogbookApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogbookApp")
            .field("backend", &self.storage.backend_name())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for LogbookApp {
    fn default() -> Self {
        Self::from_config(AppConfig::default())
    }
}

fn storage_config(settings: &StorageSettings) -> StorageConfig {
    let backend = match settings.backend {
        StorageBackendKind::Memory => StorageBackend::InMemoryPapaya,
    };
    StorageConfig {
        backend,
        options: StorageOptions {
            preallocate_items: settings.preallocate_items,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_default_config() {
        let app = LogbookApp::default();
        assert_eq!(app.storage().backend_name(), "memory");
        assert_eq!(app.config().application.name, "logbook");

        let debug = format!("{app:?}");
        assert!(debug.contains("backend: \"memory\""));
        assert!(debug.contains("application"));
    }

    #[test]
    fn test_bootstrap_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[reconcile]\nforeign_identities = \"treat_as_new\"\n\n[logging]\nlevel = \"warn\"\n"
        )
        .unwrap();

        let app = LogbookApp::bootstrap(file.path().to_str()).unwrap();
        assert_eq!(
            app.config().reconcile.foreign_identities,
            logbook_core::ForeignIdentityPolicy::TreatAsNew
        );
        assert_eq!(app.config().logging.level, "warn");
    }

    #[test]
    fn test_storage_config_mapping() {
        let settings = StorageSettings {
            backend: StorageBackendKind::Memory,
            preallocate_items: Some(64),
        };
        let mapped = storage_config(&settings);
        assert_eq!(mapped.backend, StorageBackend::InMemoryPapaya);
        assert_eq!(mapped.options.preallocate_items, Some(64));
    }
}
