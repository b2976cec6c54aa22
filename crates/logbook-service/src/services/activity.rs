use logbook_core::{Activity, ActivityDto, Identity, LogbookEntry};
use logbook_storage::{Aggregate, PageRequest};
use tracing::info;

use crate::error::{Result, ServiceError};
use crate::retry::retry_on_conflict;
use crate::validation::{ensure_activity_in_entry, ensure_entry_in_logbook, validate_id};

use super::ServiceContext;

#[derive(Debug, Clone)]
pub struct ActivityService {
    ctx: ServiceContext,
}

impl ActivityService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Creates an activity under `entry`, which must belong to `logbook`.
    pub async fn create_activity(
        &self,
        logbook: Identity,
        entry: Identity,
        dto: &ActivityDto,
    ) -> Result<Activity> {
        self.load_entry_in(logbook, entry).await?;

        let mut activity = Activity::new_for(dto, &self.ctx.policy)?;
        activity.set_logbook_entry(entry);
        let saved = self.ctx.storage.activities().save(activity).await?;

        info!(
            activity = ?saved.id(),
            %entry,
            kind = saved.kind().tag(),
            comments = saved.comments().len(),
            "activity created"
        );
        Ok(saved)
    }

    /// Applies `dto` to the stored activity it names, reconciling comments.
    ///
    /// Conflicting concurrent saves are retried from a fresh load.
    pub async fn modify_activity(
        &self,
        logbook: Identity,
        entry: Identity,
        dto: &ActivityDto,
    ) -> Result<Activity> {
        let id = validate_id("Invalid Id found when modifying Activity", dto.id)?;
        retry_on_conflict(self.ctx.max_conflict_attempts, |_| {
            self.modify_once(logbook, entry, id, dto)
        })
        .await
    }

    async fn modify_once(
        &self,
        logbook: Identity,
        entry: Identity,
        id: Identity,
        dto: &ActivityDto,
    ) -> Result<Activity> {
        self.load_entry_in(logbook, entry).await?;

        let mut activity = self.load(id).await?;
        ensure_activity_in_entry(entry, &activity)?;

        let summary = activity.update_from(dto, &self.ctx.policy)?;
        let saved = self.ctx.storage.activities().save(activity).await?;

        info!(
            activity = %id,
            version = %saved.version(),
            retained = summary.retained,
            added = summary.added,
            removed = summary.removed,
            "activity comments reconciled"
        );
        Ok(saved)
    }

    pub async fn find_activity(&self, id: Option<i64>) -> Result<Activity> {
        let id = validate_id("Invalid Id found when finding Activity", id)?;
        self.load(id).await
    }

    /// All activities recorded under `entry`, oldest first.
    pub async fn find_activities_for_entry(&self, entry: Identity) -> Result<Vec<Activity>> {
        let page = self
            .ctx
            .storage
            .activities()
            .find_by_parent(entry, PageRequest::first(usize::MAX))
            .await?;
        Ok(page.items)
    }

    /// Deletes the given activities together with their comments.
    pub async fn delete(&self, activities: &[Activity]) -> Result<usize> {
        let ids: Vec<Identity> = activities.iter().filter_map(Activity::id).collect();
        let deleted = self.ctx.storage.activities().delete_all(&ids).await?;
        info!(deleted, "activities deleted");
        Ok(deleted)
    }

    pub async fn delete_activities_for_entry(&self, entry: Identity) -> Result<usize> {
        let activities = self.find_activities_for_entry(entry).await?;
        self.delete(&activities).await
    }

    async fn load(&self, id: Identity) -> Result<Activity> {
        self.ctx
            .storage
            .activities()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(Activity::KIND, id))
    }

    async fn load_entry_in(&self, logbook: Identity, entry: Identity) -> Result<()> {
        let stored = self
            .ctx
            .storage
            .entries()
            .find_by_id(entry)
            .await?
            .ok_or_else(|| ServiceError::not_found(LogbookEntry::KIND, entry))?;
        ensure_entry_in_logbook(logbook, &stored)
    }
}
