//! Storage traits for the logbook persistence layer.

use std::fmt::Debug;

use async_trait::async_trait;
use logbook_core::{
    Activity, Identity, Logbook, LogbookEntry, Timestamp, VersionMismatch, VersionToken,
};

use crate::error::StorageError;
use crate::types::{Page, PageRequest};

/// A root entity stored and versioned as one unit together with the children
/// it owns.
///
/// The store calls the hooks below while holding its write gate; they must
/// not block.
pub trait Aggregate: Clone + Debug + Send + Sync + 'static {
    /// Kind name used in errors and logs.
    const KIND: &'static str;

    /// Order of listings returned by `find_by_parent` and `find_all`.
    type SortKey: Ord;

    fn id(&self) -> Option<Identity>;

    fn version(&self) -> VersionToken;

    fn set_version(&mut self, version: VersionToken);

    /// Back-reference to the owning aggregate, if this kind has one.
    fn parent(&self) -> Option<Identity> {
        None
    }

    fn sort_key(&self) -> Self::SortKey;

    /// Key that must be unique across all aggregates of this kind.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Structural checks before anything is written.
    fn validate_for_save(&self) -> Result<(), StorageError> {
        Ok(())
    }

    /// Receives the store-assigned identity on first save.
    fn assign_identity(&mut self, identity: Identity, now: Timestamp);

    /// Kind name of the owned children, for conflict errors.
    fn child_kind(&self) -> &'static str {
        "Child"
    }

    /// Checks the tokens of retained children against the stored copy.
    fn verify_children(&self, _persisted: &Self) -> Result<(), VersionMismatch> {
        Ok(())
    }

    /// Gives identities to pending children and bumps changed ones.
    fn stamp_children(
        &mut self,
        _persisted: Option<&Self>,
        _next_identity: &mut dyn FnMut() -> Identity,
        _now: Timestamp,
    ) {
    }
}

/// Persistence contract for one aggregate kind.
///
/// Implementations must be thread-safe (`Send + Sync`); every `save` is
/// atomic with respect to other saves and to readers.
#[async_trait]
pub trait Repository<A: Aggregate>: Send + Sync {
    /// Persists the aggregate and returns the stored copy.
    ///
    /// A new aggregate (no identity) receives one; an existing one must
    /// carry the stored version token, as must each retained child.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::VersionConflict` if any token is stale, in
    /// which case nothing is written.
    /// Returns `StorageError::NotFound` if the aggregate has an identity the
    /// store does not know.
    /// Returns `StorageError::AlreadyExists` if its unique key is taken.
    async fn save(&self, aggregate: A) -> Result<A, StorageError>;

    /// Reads an aggregate by identity. Returns `None` if it does not exist.
    async fn find_by_id(&self, id: Identity) -> Result<Option<A>, StorageError>;

    /// Reads an aggregate by its unique key.
    async fn find_by_unique_key(&self, key: &str) -> Result<Option<A>, StorageError>;

    /// Every aggregate, sorted by `Aggregate::sort_key`.
    async fn find_all(&self) -> Result<Vec<A>, StorageError>;

    /// One page of the aggregates whose back-reference is `parent`.
    async fn find_by_parent(
        &self,
        parent: Identity,
        page: PageRequest,
    ) -> Result<Page<A>, StorageError>;

    /// Deletes the given aggregates with their children. Unknown identities
    /// are skipped. Returns how many were deleted.
    async fn delete_all(&self, ids: &[Identity]) -> Result<usize, StorageError>;

    async fn count(&self) -> Result<usize, StorageError>;
}

/// The set of repositories a logbook application works against.
pub trait LogbookStorage: Send + Sync {
    fn logbooks(&self) -> &dyn Repository<Logbook>;

    fn entries(&self) -> &dyn Repository<LogbookEntry>;

    fn activities(&self) -> &dyn Repository<Activity>;

    /// Returns the backend name for logging.
    fn backend_name(&self) -> &'static str;
}
