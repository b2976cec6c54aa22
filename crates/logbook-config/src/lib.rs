//! Configuration for the logbook application.
//!
//! Settings are layered: serde defaults, then an optional `logbook.toml`
//! file, then `LOGBOOK__SECTION__KEY` environment variables. The merged
//! result is validated before it is handed out.
//!
//! ```ignore
//! let config = logbook_config::loader::load_config(Some("logbook.toml"))?;
//! println!("page size {}", config.paging.default_page_size);
//! ```

mod app;
pub mod loader;

pub use app::{
    AppConfig, ApplicationSettings, LoggingConfig, PagingSettings, RetrySettings, StorageBackendKind,
    StorageSettings,
};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
