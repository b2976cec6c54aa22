use logbook_core::{Identity, Logbook, LogbookEntry, LogbookEntryDto};
use logbook_storage::{Aggregate, Page, PageRequest};
use tracing::info;

use crate::error::{Result, ServiceError};
use crate::retry::retry_on_conflict;
use crate::validation::{ensure_entry_in_logbook, validate_id};

use super::{ActivityService, ServiceContext};

#[derive(Debug, Clone)]
pub struct LogbookEntryService {
    ctx: ServiceContext,
    activities: ActivityService,
}

impl LogbookEntryService {
    pub fn new(ctx: ServiceContext, activities: ActivityService) -> Self {
        Self { ctx, activities }
    }

    pub fn activities(&self) -> &ActivityService {
        &self.activities
    }

    pub async fn create_entry(
        &self,
        logbook: Identity,
        dto: &LogbookEntryDto,
    ) -> Result<LogbookEntry> {
        self.ensure_logbook_exists(logbook).await?;

        let entry = LogbookEntry::new_for(logbook, dto, &self.ctx.policy)?;
        let saved = self.ctx.storage.entries().save(entry).await?;

        info!(
            entry = ?saved.id(),
            %logbook,
            date = ?saved.activity_date(),
            comments = saved.comments().len(),
            "logbook entry created"
        );
        Ok(saved)
    }

    /// Applies `dto` to the stored entry, reconciling its comments.
    /// Activities listed in the descriptor are ignored here.
    pub async fn modify_entry(
        &self,
        logbook: Identity,
        dto: &LogbookEntryDto,
    ) -> Result<LogbookEntry> {
        let id = validate_id("Invalid id encountered when modifying logbook entry", dto.id)?;
        retry_on_conflict(self.ctx.max_conflict_attempts, |_| {
            self.modify_once(logbook, id, dto)
        })
        .await
    }

    async fn modify_once(
        &self,
        logbook: Identity,
        id: Identity,
        dto: &LogbookEntryDto,
    ) -> Result<LogbookEntry> {
        let mut entry = self.load(id).await?;
        ensure_entry_in_logbook(logbook, &entry)?;

        let summary = entry.update_from(dto, &self.ctx.policy)?;
        let saved = self.ctx.storage.entries().save(entry).await?;

        info!(
            entry = %id,
            version = %saved.version(),
            retained = summary.retained,
            added = summary.added,
            removed = summary.removed,
            "logbook entry comments reconciled"
        );
        Ok(saved)
    }

    pub async fn find_entry(&self, id: Option<i64>) -> Result<LogbookEntry> {
        let id = validate_id("Invalid id encountered when finding logbook entry", id)?;
        self.load(id).await
    }

    /// One page of a logbook's entries, newest first, each with its
    /// activities.
    pub async fn find_entries_for_logbook(
        &self,
        logbook: Identity,
        page: usize,
        size: Option<usize>,
    ) -> Result<Page<LogbookEntryDto>> {
        let request = PageRequest::new(page, self.ctx.paging.effective_size(size));
        let entries = self
            .ctx
            .storage
            .entries()
            .find_by_parent(logbook, request)
            .await?;

        let mut items = Vec::with_capacity(entries.len());
        for entry in &entries.items {
            items.push(self.entry_as_dto(entry).await?);
        }
        Ok(entries.with_items(items))
    }

    pub async fn count_entries(&self, logbook: Identity) -> Result<usize> {
        let all = self
            .ctx
            .storage
            .entries()
            .find_by_parent(logbook, PageRequest::first(usize::MAX))
            .await?;
        Ok(all.total)
    }

    /// Deletes an entry, its comments and its activities. Deleting an entry
    /// that does not exist is not an error.
    pub async fn delete_entry(&self, id: Identity) -> Result<bool> {
        if self.ctx.storage.entries().find_by_id(id).await?.is_none() {
            return Ok(false);
        }
        let activities = self.activities.delete_activities_for_entry(id).await?;
        let deleted = self.ctx.storage.entries().delete_all(&[id]).await? > 0;
        info!(entry = %id, activities, "logbook entry deleted");
        Ok(deleted)
    }

    pub async fn delete_all_entries(&self, logbook: Identity) -> Result<usize> {
        let entries = self
            .ctx
            .storage
            .entries()
            .find_by_parent(logbook, PageRequest::first(usize::MAX))
            .await?;

        let mut deleted = 0;
        for id in entries.items.iter().filter_map(LogbookEntry::id) {
            if self.delete_entry(id).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Descriptor of a stored entry with its activities attached.
    pub async fn entry_as_dto(&self, entry: &LogbookEntry) -> Result<LogbookEntryDto> {
        let activities = match entry.id() {
            Some(id) => self.activities.find_activities_for_entry(id).await?,
            None => Vec::new(),
        };
        Ok(entry.as_dto_with(activities.iter().map(|a| a.as_dto()).collect()))
    }

    async fn load(&self, id: Identity) -> Result<LogbookEntry> {
        self.ctx
            .storage
            .entries()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(LogbookEntry::KIND, id))
    }

    async fn ensure_logbook_exists(&self, logbook: Identity) -> Result<()> {
        match self.ctx.storage.logbooks().find_by_id(logbook).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(Logbook::KIND, logbook)),
        }
    }
}
