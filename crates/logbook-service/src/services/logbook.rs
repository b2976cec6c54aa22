use logbook_core::{Identity, Logbook, LogbookDto};
use logbook_storage::Aggregate;
use tracing::info;

use crate::error::{Result, ServiceError};
use crate::retry::retry_on_conflict;
use crate::validation::validate_id;

use super::{LogbookEntryService, ServiceContext};

#[derive(Debug, Clone)]
pub struct LogbookService {
    ctx: ServiceContext,
    entries: LogbookEntryService,
}

impl LogbookService {
    pub fn new(ctx: ServiceContext, entries: LogbookEntryService) -> Self {
        Self { ctx, entries }
    }

    pub fn entries(&self) -> &LogbookEntryService {
        &self.entries
    }

    /// Creates a logbook. Names are unique.
    pub async fn create_logbook(&self, dto: &LogbookDto) -> Result<Logbook> {
        let logbook = Logbook::new(dto.name.as_str())?;
        let saved = self.ctx.storage.logbooks().save(logbook).await?;
        info!(logbook = ?saved.id(), name = saved.name(), "logbook created");
        Ok(saved)
    }

    pub async fn modify_logbook(&self, dto: &LogbookDto) -> Result<Logbook> {
        let id = validate_id("Invalid id encountered when modifying logbook", dto.id)?;
        retry_on_conflict(self.ctx.max_conflict_attempts, |_| async move {
            let mut logbook = self.load(id).await?;
            logbook.update_from(dto)?;
            let saved = self.ctx.storage.logbooks().save(logbook).await?;
            info!(logbook = %id, name = saved.name(), version = %saved.version(), "logbook modified");
            Ok(saved)
        })
        .await
    }

    pub async fn find_logbook(&self, id: Option<i64>) -> Result<Logbook> {
        let id = validate_id("Invalid id encountered when finding logbook", id)?;
        self.load(id).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Logbook>> {
        Ok(self
            .ctx
            .storage
            .logbooks()
            .find_by_unique_key(name.trim())
            .await?)
    }

    /// All logbooks ordered by name.
    pub async fn find_all(&self) -> Result<Vec<Logbook>> {
        Ok(self.ctx.storage.logbooks().find_all().await?)
    }

    /// Deletes a logbook after its entries and their activities.
    pub async fn delete_logbook(&self, id: Identity) -> Result<bool> {
        if self.ctx.storage.logbooks().find_by_id(id).await?.is_none() {
            return Ok(false);
        }
        let entries = self.entries.delete_all_entries(id).await?;
        let deleted = self.ctx.storage.logbooks().delete_all(&[id]).await? > 0;
        info!(logbook = %id, entries, "logbook deleted");
        Ok(deleted)
    }

    async fn load(&self, id: Identity) -> Result<Logbook> {
        self.ctx
            .storage
            .logbooks()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(Logbook::KIND, id))
    }
}
