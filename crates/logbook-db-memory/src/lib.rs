//! In-memory storage backend for the logbook.
//!
//! This crate provides an in-memory implementation of the `LogbookStorage`
//! trait from `logbook-storage`, using papaya lock-free HashMap for
//! concurrent access.
//!
//! # Example
//!
//! ```ignore
//! use logbook_core::Logbook;
//! use logbook_db_memory::InMemoryStorage;
//! use logbook_storage::LogbookStorage;
//!
//! let storage = InMemoryStorage::new();
//! let logbook = storage.logbooks().save(Logbook::new("Erg")?).await?;
//! assert!(logbook.id().is_some());
//! ```

pub mod factory;
pub mod storage;

pub use factory::{StorageBackend, StorageConfig, StorageOptions, create_storage};
pub use logbook_storage::{DynStorage, LogbookStorage, StorageError};
pub use storage::{InMemoryStorage, MemoryRepository};
