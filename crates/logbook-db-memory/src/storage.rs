use std::fmt;

use async_trait::async_trait;
use logbook_core::{Activity, Identity, Logbook, LogbookEntry, VersionToken, now_utc};
use logbook_storage::{
    Aggregate, IdentitySequence, LogbookStorage, Page, PageRequest, Repository, StorageError,
    StorageResult,
};
use papaya::HashMap as PapayaHashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::factory::StorageOptions;

/// Lock-free repository for one aggregate kind.
///
/// Readers go straight to the papaya map and always observe a complete
/// aggregate. Writers are serialized by `write_gate`, so the version check
/// and the insert of one save cannot interleave with another save.
pub struct MemoryRepository<A: Aggregate> {
    data: PapayaHashMap<Identity, A>,
    ids: IdentitySequence,
    /// Identity source for owned children, possibly shared with other kinds.
    child_ids: Arc<IdentitySequence>,
    write_gate: Mutex<()>,
}

impl<A: Aggregate> fmt::Debug for MemoryRepository<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("kind", &A::KIND)
            .field("len", &self.data.pin().len())
            .field("issued", &self.ids.issued())
            .finish()
    }
}

impl<A: Aggregate> MemoryRepository<A> {
    pub fn new(child_ids: Arc<IdentitySequence>) -> Self {
        Self::with_capacity(0, child_ids)
    }

    pub fn with_capacity(capacity: usize, child_ids: Arc<IdentitySequence>) -> Self {
        Self {
            data: PapayaHashMap::with_capacity(capacity),
            ids: IdentitySequence::new(),
            child_ids,
            write_gate: Mutex::new(()),
        }
    }

    fn load(&self, id: Identity) -> Option<A> {
        let guard = self.data.pin();
        guard.get(&id).cloned()
    }

    fn snapshot(&self) -> Vec<A> {
        let guard = self.data.pin();
        guard.values().cloned().collect()
    }

    fn sorted(mut aggregates: Vec<A>) -> Vec<A> {
        aggregates.sort_by_key(Aggregate::sort_key);
        aggregates
    }

    /// Compares the caller's tokens with the stored copy. Must be called with
    /// the write gate held.
    fn check_versions(&self, aggregate: &A, stored: &A) -> StorageResult<()> {
        if aggregate.version() != stored.version() {
            let id = stored.id();
            warn!(
                kind = A::KIND,
                id = ?id,
                expected = %aggregate.version(),
                actual = %stored.version(),
                "version conflict"
            );
            return Err(match id {
                Some(id) => {
                    StorageError::version_conflict(A::KIND, id, aggregate.version(), stored.version())
                }
                None => StorageError::internal("stored aggregate has no identity"),
            });
        }

        aggregate.verify_children(stored).map_err(|mismatch| {
            warn!(
                kind = aggregate.child_kind(),
                id = %mismatch.identity,
                expected = %mismatch.expected,
                "child version conflict"
            );
            StorageError::child_conflict(aggregate.child_kind(), mismatch)
        })
    }

    fn check_unique_key(&self, aggregate: &A) -> StorageResult<()> {
        let Some(key) = aggregate.unique_key() else {
            return Ok(());
        };
        let guard = self.data.pin();
        let taken = guard
            .values()
            .any(|other| other.id() != aggregate.id() && other.unique_key().as_deref() == Some(&key));
        if taken {
            return Err(StorageError::already_exists(A::KIND, key));
        }
        Ok(())
    }
}

#[async_trait]
impl<A: Aggregate> Repository<A> for MemoryRepository<A> {
    async fn save(&self, mut aggregate: A) -> StorageResult<A> {
        aggregate.validate_for_save()?;

        let _gate = self.write_gate.lock().await;
        let now = now_utc();

        let persisted = match aggregate.id() {
            Some(id) => {
                let stored = self
                    .load(id)
                    .ok_or_else(|| StorageError::not_found(A::KIND, id))?;
                self.check_versions(&aggregate, &stored)?;
                Some(stored)
            }
            None => None,
        };
        self.check_unique_key(&aggregate)?;

        match &persisted {
            Some(stored) => aggregate.set_version(stored.version().next()),
            None => {
                aggregate.assign_identity(self.ids.next(), now);
                aggregate.set_version(VersionToken::initial());
            }
        }
        aggregate.stamp_children(persisted.as_ref(), &mut || self.child_ids.next(), now);

        let id = aggregate
            .id()
            .ok_or_else(|| StorageError::internal("aggregate has no identity after save"))?;

        // Use block scope to ensure guard is dropped before returning
        {
            let guard = self.data.pin();
            guard.insert(id, aggregate.clone());
        }

        debug!(kind = A::KIND, %id, version = %aggregate.version(), "aggregate saved");
        Ok(aggregate)
    }

    async fn find_by_id(&self, id: Identity) -> StorageResult<Option<A>> {
        Ok(self.load(id))
    }

    async fn find_by_unique_key(&self, key: &str) -> StorageResult<Option<A>> {
        let guard = self.data.pin();
        Ok(guard
            .values()
            .find(|aggregate| aggregate.unique_key().as_deref() == Some(key))
            .cloned())
    }

    async fn find_all(&self) -> StorageResult<Vec<A>> {
        Ok(Self::sorted(self.snapshot()))
    }

    async fn find_by_parent(&self, parent: Identity, page: PageRequest) -> StorageResult<Page<A>> {
        let children: Vec<A> = {
            let guard = self.data.pin();
            guard
                .values()
                .filter(|aggregate| aggregate.parent() == Some(parent))
                .cloned()
                .collect()
        };
        Ok(Page::slice(Self::sorted(children), page))
    }

    async fn delete_all(&self, ids: &[Identity]) -> StorageResult<usize> {
        let _gate = self.write_gate.lock().await;
        let deleted = {
            let guard = self.data.pin();
            ids.iter().filter(|id| guard.remove(*id).is_some()).count()
        };
        debug!(kind = A::KIND, requested = ids.len(), deleted, "aggregates deleted");
        Ok(deleted)
    }

    async fn count(&self) -> StorageResult<usize> {
        Ok(self.data.pin().len())
    }
}

/// In-memory logbook storage backed by papaya lock-free maps.
///
/// Comments owned by entries and by activities draw identities from one
/// shared sequence, as they would from a single table.
#[derive(Debug)]
pub struct InMemoryStorage {
    logbooks: MemoryRepository<Logbook>,
    entries: MemoryRepository<LogbookEntry>,
    activities: MemoryRepository<Activity>,
    /// Storage configuration options (soft hints for in-memory backend)
    _options: StorageOptions,
}

impl InMemoryStorage {
    /// Creates a new in-memory storage with default options.
    pub fn new() -> Self {
        Self::with_options(StorageOptions::default())
    }

    /// Creates a new in-memory storage with the given options.
    pub fn with_options(options: StorageOptions) -> Self {
        let capacity = options.preallocate_items.unwrap_or(0);
        let comment_ids = Arc::new(IdentitySequence::new());
        Self {
            logbooks: MemoryRepository::new(Arc::clone(&comment_ids)),
            entries: MemoryRepository::with_capacity(capacity, Arc::clone(&comment_ids)),
            activities: MemoryRepository::with_capacity(capacity, comment_ids),
            _options: options,
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LogbookStorage for InMemoryStorage {
    fn logbooks(&self) -> &dyn Repository<Logbook> {
        &self.logbooks
    }

    fn entries(&self) -> &dyn Repository<LogbookEntry> {
        &self.entries
    }

    fn activities(&self) -> &dyn Repository<Activity> {
        &self.activities
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
