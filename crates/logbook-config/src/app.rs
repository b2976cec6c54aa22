use logbook_core::ReconcilePolicy;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub application: ApplicationSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub paging: PagingSettings,
    /// How child collections treat foreign and repeated identities
    #[serde(default)]
    pub reconcile: ReconcilePolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub retry: RetrySettings,
}

// Default derived via field defaults

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.application.name.trim().is_empty() {
            return Err(ConfigError::validation("application.name must not be empty"));
        }
        // Paging validations
        if self.paging.default_page_size == 0 {
            return Err(ConfigError::validation(
                "paging.default_page_size must be > 0",
            ));
        }
        if self.paging.max_page_size == 0 {
            return Err(ConfigError::validation("paging.max_page_size must be > 0"));
        }
        if self.paging.default_page_size > self.paging.max_page_size {
            return Err(ConfigError::validation(
                "paging.default_page_size must be <= paging.max_page_size",
            ));
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level must be one of {valid_levels:?}"
            )));
        }
        if self.retry.max_conflict_attempts == 0 {
            return Err(ConfigError::validation(
                "retry.max_conflict_attempts must be > 0",
            ));
        }
        Ok(())
    }

    /// Parses a TOML document on top of the defaults and validates it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::parse(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
fn default_app_name() -> String {
    "logbook".into()
}
impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackendKind,
    /// Initial capacity hint for the in-memory maps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preallocate_items: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PagingSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}
fn default_page_size() -> usize {
    10
}
fn default_max_page_size() -> usize {
    100
}
impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PagingSettings {
    /// Requested size, or the default, capped at the maximum.
    pub fn effective_size(&self, requested: Option<usize>) -> usize {
        requested
            .filter(|size| *size > 0)
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrySettings {
    /// Attempts for one load-reconcile-save cycle, including the first
    #[serde(default = "default_max_conflict_attempts")]
    pub max_conflict_attempts: u32,
}
fn default_max_conflict_attempts() -> u32 {
    3
}
impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_conflict_attempts: default_max_conflict_attempts(),
        }
    }
}
