use serde::{Deserialize, Serialize};
use time::Date;

use crate::activity::ActivityDto;
use crate::changes::{ChangeSummary, ReconcilePolicy, apply_changes};
use crate::children::OwnedChildren;
use crate::comment::{Comment, CommentDto};
use crate::error::Result;
use crate::id::Identity;
use crate::time::Timestamp;
use crate::version::VersionToken;

/// One day's page in a logbook.
///
/// Owns its comments. Activities are separate aggregates that point back at
/// the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogbookEntry {
    id: Option<Identity>,
    activity_date: Option<Date>,
    version: VersionToken,
    logbook: Option<Identity>,
    comments: OwnedChildren<Comment>,
}

impl LogbookEntry {
    pub fn new(logbook: Identity) -> Self {
        Self {
            id: None,
            activity_date: None,
            version: VersionToken::initial(),
            logbook: Some(logbook),
            comments: OwnedChildren::new(),
        }
    }

    /// Builds an unsaved entry for `logbook` from a client descriptor.
    pub fn new_for(
        logbook: Identity,
        dto: &LogbookEntryDto,
        policy: &ReconcilePolicy,
    ) -> Result<Self> {
        let mut entry = Self::new(logbook);
        entry.activity_date = dto.activity_date;
        apply_changes("logbook entry", &mut entry.comments, &dto.comments, policy)?;
        Ok(entry)
    }

    /// Takes the descriptor's version token and reconciles comments.
    pub fn update_from(
        &mut self,
        dto: &LogbookEntryDto,
        policy: &ReconcilePolicy,
    ) -> Result<ChangeSummary> {
        let summary = apply_changes("logbook entry", &mut self.comments, &dto.comments, policy)?;
        if let Some(version) = dto.version {
            self.version = version;
        }
        Ok(summary)
    }

    pub fn as_dto(&self) -> LogbookEntryDto {
        self.as_dto_with(Vec::new())
    }

    pub fn as_dto_with(&self, activities: Vec<ActivityDto>) -> LogbookEntryDto {
        LogbookEntryDto {
            id: self.id.map(Identity::get),
            activity_date: self.activity_date,
            version: Some(self.version),
            activities,
            comments: self.comments.iter().map(Comment::as_dto).collect(),
        }
    }

    pub fn id(&self) -> Option<Identity> {
        self.id
    }

    pub fn activity_date(&self) -> Option<Date> {
        self.activity_date
    }

    pub fn set_activity_date(&mut self, date: Date) {
        self.activity_date = Some(date);
    }

    pub fn version(&self) -> VersionToken {
        self.version
    }

    pub fn set_version(&mut self, version: VersionToken) {
        self.version = version;
    }

    pub fn logbook(&self) -> Option<Identity> {
        self.logbook
    }

    pub fn belongs_to(&self, logbook: Identity) -> bool {
        self.logbook == Some(logbook)
    }

    pub fn comments(&self) -> &OwnedChildren<Comment> {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut OwnedChildren<Comment> {
        &mut self.comments
    }

    /// Entries saved without a date are dated on the day they are stored.
    pub fn mark_persisted(&mut self, identity: Identity, now: Timestamp) {
        self.id = Some(identity);
        self.activity_date.get_or_insert(now.date());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogbookEntryDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionToken>,
    #[serde(default)]
    pub activities: Vec<ActivityDto>,
    #[serde(default)]
    pub comments: Vec<CommentDto>,
}

impl LogbookEntryDto {
    #[must_use]
    pub fn with_comments(mut self, comments: Vec<CommentDto>) -> Self {
        self.comments = comments;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::time::now_utc;
    use time::macros::date;

    fn logbook() -> Identity {
        Identity::from_raw(1).unwrap()
    }

    #[test]
    fn test_mark_persisted_defaults_activity_date() {
        let mut entry = LogbookEntry::new(logbook());
        let now = now_utc();
        entry.mark_persisted(Identity::from_raw(5).unwrap(), now);
        assert_eq!(entry.activity_date(), Some(now.date()));

        let mut dated = LogbookEntry::new(logbook());
        dated.set_activity_date(date!(2024 - 03 - 01));
        dated.mark_persisted(Identity::from_raw(6).unwrap(), now);
        assert_eq!(dated.activity_date(), Some(date!(2024 - 03 - 01)));
    }

    #[test]
    fn test_new_for_rejects_foreign_comment() {
        let dto = LogbookEntryDto::default().with_comments(vec![CommentDto::existing(4, "x")]);
        let err = LogbookEntry::new_for(logbook(), &dto, &ReconcilePolicy::default()).unwrap_err();
        assert!(matches!(err, CoreError::ForeignIdentity { .. }));
        assert!(err.to_string().contains("logbook entry"));
    }

    #[test]
    fn test_update_from_reconciles_comments() {
        let dto = LogbookEntryDto::default()
            .with_comments(vec![CommentDto::new("one"), CommentDto::new("two")]);
        let mut entry = LogbookEntry::new_for(logbook(), &dto, &ReconcilePolicy::default()).unwrap();
        let mut next = 10;
        entry.comments_mut().stamp_persisted(
            None,
            || {
                next += 1;
                Identity::from_raw(next).unwrap()
            },
            now_utc(),
        );

        let mut update = entry.as_dto();
        update.comments.retain(|c| c.content == "two");
        update.version = Some(VersionToken::new(2));

        let summary = entry.update_from(&update, &ReconcilePolicy::default()).unwrap();
        assert_eq!(summary.removed, 1);
        assert_eq!(entry.comments().identities(), vec![Identity::from_raw(12).unwrap()]);
        assert_eq!(entry.version(), VersionToken::new(2));
    }

    #[test]
    fn test_belongs_to() {
        let entry = LogbookEntry::new(logbook());
        assert!(entry.belongs_to(logbook()));
        assert!(!entry.belongs_to(Identity::from_raw(2).unwrap()));
    }

    #[test]
    fn test_dto_wire_format() {
        let dto: LogbookEntryDto =
            serde_json::from_str(r#"{"activityDate":"2024-03-01","comments":[{"content":"c"}]}"#)
                .unwrap();
        assert_eq!(dto.activity_date, Some(date!(2024 - 03 - 01)));
        assert!(dto.activities.is_empty());
        assert_eq!(dto.comments.len(), 1);
    }
}
