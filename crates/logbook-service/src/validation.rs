//! Request checks shared by the services. Every rejection is logged at error
//! level before it is returned.

use logbook_core::{Activity, Identity, LogbookEntry};
use tracing::error;

use crate::error::{Result, ServiceError};

/// Accepts only positive identities.
pub fn validate_id(message: &str, raw: Option<i64>) -> Result<Identity> {
    logbook_core::validate_id(raw).map_err(|_| {
        error!(id = ?raw, "{message}");
        ServiceError::invalid_argument(message)
    })
}

pub fn ensure_entry_in_logbook(logbook: Identity, entry: &LogbookEntry) -> Result<()> {
    if entry.belongs_to(logbook) {
        return Ok(());
    }
    error!(%logbook, entry = ?entry.id(), "Logbook and LogbookEntry do not correspond");
    Err(ServiceError::invalid_argument(
        "Logbook and LogbookEntry do not correspond",
    ))
}

pub fn ensure_activity_in_entry(entry: Identity, activity: &Activity) -> Result<()> {
    if activity.belongs_to(entry) {
        return Ok(());
    }
    error!(%entry, activity = ?activity.id(), "LogbookEntry and Activity do not correspond");
    Err(ServiceError::invalid_argument(
        "LogbookEntry and Activity do not correspond",
    ))
}
