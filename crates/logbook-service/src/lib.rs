//! Logbook application services.
//!
//! Every write follows the same cycle: load the aggregate, apply the
//! client's descriptor with [`logbook_core::apply_changes`] semantics, and
//! save it back through the store, which checks version tokens for the
//! aggregate and each retained child. A stale save surfaces as
//! [`ServiceError::ConcurrencyConflict`]; the modify operations retry it a
//! bounded number of times from a fresh load.
//!
//! ```ignore
//! let app = LogbookApp::bootstrap(Some("logbook.toml"))?;
//! let logbook = app.logbooks().create_logbook(&LogbookDto { name: "Erg".into(), ..Default::default() }).await?;
//! ```

pub mod app;
pub mod error;
pub mod observability;
pub mod retry;
pub mod services;
pub mod validation;

pub use app::LogbookApp;
pub use error::{Result, ServiceError};
pub use retry::retry_on_conflict;
pub use services::{ActivityService, LogbookEntryService, LogbookService, ServiceContext};
