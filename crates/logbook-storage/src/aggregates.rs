//! `Aggregate` implementations for the logbook domain types.

use std::cmp::Reverse;

use logbook_core::{
    Activity, Identity, Logbook, LogbookEntry, Timestamp, VersionMismatch, VersionToken,
};
use time::Date;

use crate::error::StorageError;
use crate::traits::Aggregate;

impl Aggregate for Logbook {
    const KIND: &'static str = "Logbook";

    type SortKey = String;

    fn id(&self) -> Option<Identity> {
        self.id()
    }

    fn version(&self) -> VersionToken {
        self.version()
    }

    fn set_version(&mut self, version: VersionToken) {
        self.set_version(version);
    }

    fn sort_key(&self) -> String {
        self.name().to_lowercase()
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.name().to_string())
    }

    fn assign_identity(&mut self, identity: Identity, now: Timestamp) {
        self.mark_persisted(identity, now);
    }
}

impl Aggregate for LogbookEntry {
    const KIND: &'static str = "LogbookEntry";

    /// Newest activity date first, then newest entry first.
    type SortKey = (Reverse<Option<Date>>, Reverse<Option<Identity>>);

    fn id(&self) -> Option<Identity> {
        self.id()
    }

    fn version(&self) -> VersionToken {
        self.version()
    }

    fn set_version(&mut self, version: VersionToken) {
        self.set_version(version);
    }

    fn parent(&self) -> Option<Identity> {
        self.logbook()
    }

    fn sort_key(&self) -> Self::SortKey {
        (Reverse(self.activity_date()), Reverse(self.id()))
    }

    fn validate_for_save(&self) -> Result<(), StorageError> {
        match self.logbook() {
            Some(_) => Ok(()),
            None => Err(StorageError::invalid_aggregate(
                "logbook entry has no logbook",
            )),
        }
    }

    fn assign_identity(&mut self, identity: Identity, now: Timestamp) {
        self.mark_persisted(identity, now);
    }

    fn child_kind(&self) -> &'static str {
        "Comment"
    }

    fn verify_children(&self, persisted: &Self) -> Result<(), VersionMismatch> {
        self.comments().verify_versions(persisted.comments())
    }

    fn stamp_children(
        &mut self,
        persisted: Option<&Self>,
        next_identity: &mut dyn FnMut() -> Identity,
        now: Timestamp,
    ) {
        self.comments_mut()
            .stamp_persisted(persisted.map(LogbookEntry::comments), next_identity, now);
    }
}

impl Aggregate for Activity {
    const KIND: &'static str = "Activity";

    type SortKey = Option<Identity>;

    fn id(&self) -> Option<Identity> {
        self.id()
    }

    fn version(&self) -> VersionToken {
        self.version()
    }

    fn set_version(&mut self, version: VersionToken) {
        self.set_version(version);
    }

    fn parent(&self) -> Option<Identity> {
        self.logbook_entry()
    }

    fn sort_key(&self) -> Option<Identity> {
        self.id()
    }

    fn validate_for_save(&self) -> Result<(), StorageError> {
        match self.logbook_entry() {
            Some(_) => Ok(()),
            None => Err(StorageError::invalid_aggregate(
                "activity has no logbook entry",
            )),
        }
    }

    fn assign_identity(&mut self, identity: Identity, now: Timestamp) {
        self.mark_persisted(identity, now);
    }

    fn child_kind(&self) -> &'static str {
        "Comment"
    }

    fn verify_children(&self, persisted: &Self) -> Result<(), VersionMismatch> {
        self.comments().verify_versions(persisted.comments())
    }

    fn stamp_children(
        &mut self,
        persisted: Option<&Self>,
        next_identity: &mut dyn FnMut() -> Identity,
        now: Timestamp,
    ) {
        self.comments_mut()
            .stamp_persisted(persisted.map(Activity::comments), next_identity, now);
    }
}
