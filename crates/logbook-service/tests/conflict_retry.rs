//! Optimistic-concurrency retries against a real store conflict: another
//! writer commits between the service's load and its save.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use logbook_config::AppConfig;
use logbook_core::{
    Activity, ActivityDto, ActivityKind, ActivityType, CommentDto, DurationUnits, Identity,
    Logbook, LogbookEntry, VersionToken,
};
use logbook_db_memory::InMemoryStorage;
use logbook_service::{ActivityService, ServiceContext};
use logbook_storage::{LogbookStorage, Page, PageRequest, Repository, StorageError};

/// Activity repository that, once armed, saves a competing edit right after
/// handing out a loaded copy, so the caller's save becomes stale.
struct InterleavedActivities {
    inner: Arc<InMemoryStorage>,
    armed: AtomicBool,
    loads: AtomicUsize,
}

#[async_trait]
impl Repository<Activity> for InterleavedActivities {
    async fn save(&self, aggregate: Activity) -> Result<Activity, StorageError> {
        self.inner.activities().save(aggregate).await
    }

    async fn find_by_id(&self, id: Identity) -> Result<Option<Activity>, StorageError> {
        let loaded = self.inner.activities().find_by_id(id).await?;
        self.loads.fetch_add(1, Ordering::SeqCst);

        if let Some(current) = &loaded
            && self.armed.swap(false, Ordering::SeqCst)
        {
            let mut competing = current.clone();
            competing
                .set_valid_duration(45.0, DurationUnits::Minutes)
                .expect("valid duration");
            self.inner.activities().save(competing).await?;
        }
        Ok(loaded)
    }

    async fn find_by_unique_key(&self, key: &str) -> Result<Option<Activity>, StorageError> {
        self.inner.activities().find_by_unique_key(key).await
    }

    async fn find_all(&self) -> Result<Vec<Activity>, StorageError> {
        self.inner.activities().find_all().await
    }

    async fn find_by_parent(
        &self,
        parent: Identity,
        page: PageRequest,
    ) -> Result<Page<Activity>, StorageError> {
        self.inner.activities().find_by_parent(parent, page).await
    }

    async fn delete_all(&self, ids: &[Identity]) -> Result<usize, StorageError> {
        self.inner.activities().delete_all(ids).await
    }

    async fn count(&self) -> Result<usize, StorageError> {
        self.inner.activities().count().await
    }
}

struct InterleavedStorage {
    inner: Arc<InMemoryStorage>,
    activities: InterleavedActivities,
}

impl LogbookStorage for InterleavedStorage {
    fn logbooks(&self) -> &dyn Repository<Logbook> {
        self.inner.logbooks()
    }

    fn entries(&self) -> &dyn Repository<LogbookEntry> {
        self.inner.entries()
    }

    fn activities(&self) -> &dyn Repository<Activity> {
        &self.activities
    }

    fn backend_name(&self) -> &'static str {
        "interleaved"
    }
}

struct Fixture {
    storage: Arc<InterleavedStorage>,
    service: ActivityService,
    logbook: Identity,
    entry: Identity,
}

async fn fixture(max_conflict_attempts: u32) -> Fixture {
    let inner = Arc::new(InMemoryStorage::new());
    let logbook = inner
        .logbooks()
        .save(Logbook::new("Erg").expect("name"))
        .await
        .expect("save logbook")
        .id()
        .expect("logbook id");
    let entry = inner
        .entries()
        .save(LogbookEntry::new(logbook))
        .await
        .expect("save entry")
        .id()
        .expect("entry id");

    let storage = Arc::new(InterleavedStorage {
        activities: InterleavedActivities {
            inner: Arc::clone(&inner),
            armed: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        },
        inner,
    });

    let mut config = AppConfig::default();
    config.retry.max_conflict_attempts = max_conflict_attempts;
    let ctx = ServiceContext::new(storage.clone(), &config);

    Fixture {
        storage,
        service: ActivityService::new(ctx),
        logbook,
        entry,
    }
}

fn lifting() -> ActivityDto {
    ActivityDto::new(
        ActivityType::WeightTraining,
        30.0,
        DurationUnits::Minutes,
        ActivityKind::StrengthTraining,
    )
}

/// Creates an activity with one comment, then arms the competing writer.
async fn armed_activity(fx: &Fixture) -> Activity {
    let created = fx
        .service
        .create_activity(
            fx.logbook,
            fx.entry,
            &lifting().with_comments(vec![CommentDto::new("first set heavy")]),
        )
        .await
        .expect("create activity");
    fx.storage.activities.armed.store(true, Ordering::SeqCst);
    created
}

/// The client edit, sent without a version token so only the store decides
/// whether it is current.
fn untokened_edit(activity: &Activity) -> ActivityDto {
    let mut dto = activity.as_dto().with_details("mine");
    dto.version = None;
    dto.comments.push(CommentDto::new("added later"));
    dto
}

#[tokio::test]
async fn interleaved_write_is_retried_from_a_fresh_load() {
    let fx = fixture(3).await;
    let created = armed_activity(&fx).await;

    let saved = fx
        .service
        .modify_activity(fx.logbook, fx.entry, &untokened_edit(&created))
        .await
        .expect("modify after retry");

    assert_eq!(fx.storage.activities.loads.load(Ordering::SeqCst), 2);
    assert_eq!(saved.version(), VersionToken::new(2));
    assert_eq!(saved.details(), Some("mine"));
    assert_eq!(saved.duration(), 30.0);
    assert_eq!(saved.comments().len(), 2);
    assert_eq!(saved.comments().pending_count(), 0);

    let stored = fx
        .service
        .find_activity(created.id().map(Identity::get))
        .await
        .expect("reload");
    assert_eq!(stored, saved);
}

#[tokio::test]
async fn interleaved_write_surfaces_as_conflict_without_retries() {
    let fx = fixture(1).await;
    let created = armed_activity(&fx).await;

    let err = fx
        .service
        .modify_activity(fx.logbook, fx.entry, &untokened_edit(&created))
        .await
        .expect_err("the competing save wins");
    assert!(err.is_conflict());
    assert_eq!(fx.storage.activities.loads.load(Ordering::SeqCst), 1);

    let stored = fx
        .service
        .find_activity(created.id().map(Identity::get))
        .await
        .expect("reload");
    assert_eq!(stored.version(), VersionToken::new(1));
    assert_eq!(stored.duration(), 45.0);
    assert_eq!(stored.details(), None);
    assert_eq!(stored.comments().len(), 1);
}
