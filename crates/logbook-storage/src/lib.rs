//! # logbook-storage
//!
//! Persistence contract for the logbook domain.
//!
//! This crate defines the traits and types every storage backend implements.
//! It does not contain any implementations; those live in separate crates.
//!
//! ## Overview
//!
//! [`Aggregate`] describes a root entity the store versions as one unit
//! together with the children it owns. [`Repository`] stores one aggregate
//! kind, and [`LogbookStorage`] bundles the repositories an application
//! needs.
//!
//! ## Example
//!
//! ```ignore
//! use logbook_storage::{LogbookStorage, StorageError};
//!
//! async fn rename(storage: &dyn LogbookStorage, id: Identity) -> Result<(), StorageError> {
//!     let mut logbook = storage
//!         .logbooks()
//!         .find_by_id(id)
//!         .await?
//!         .ok_or_else(|| StorageError::not_found("Logbook", id))?;
//!     logbook.update_from(&LogbookDto { name: "Erg".into(), ..logbook.as_dto() })?;
//!     storage.logbooks().save(logbook).await?;
//!     Ok(())
//! }
//! ```

mod aggregates;
mod error;
mod traits;
mod types;

// Re-export everything from submodules
pub use error::{ErrorCategory, StorageError};
pub use traits::{Aggregate, LogbookStorage, Repository};
pub use types::{IdentitySequence, Page, PageRequest};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn LogbookStorage>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use logbook_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::{Aggregate, LogbookStorage, Repository};
    pub use crate::types::{IdentitySequence, Page, PageRequest};
    pub use crate::{DynStorage, StorageResult};
}
