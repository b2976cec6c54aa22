//! Core logbook types and the child-collection reconciliation engine.

pub mod activity;
pub mod changes;
pub mod children;
pub mod comment;
pub mod error;
pub mod id;
pub mod logbook;
pub mod logbook_entry;
pub mod time;
pub mod units;
pub mod version;

pub use activity::{Activity, ActivityDto, ActivityKind};
pub use changes::{
    ChangeSet, ChangeSummary, DuplicateIdentityPolicy, ForeignIdentityPolicy, ReconcilePolicy,
    ReconciledChild, apply_changes,
};
pub use children::{ChildKey, CollectionEntry, OwnedChildren, PersistentChild, VersionMismatch};
pub use comment::{Comment, CommentDto};
pub use error::{CoreError, ErrorCategory, Result};
pub use id::{Identity, validate_id};
pub use logbook::{Logbook, LogbookDto};
pub use logbook_entry::{LogbookEntry, LogbookEntryDto};
pub use crate::time::{Timestamp, now_utc};
pub use units::{ActivityType, DistanceUnits, DurationUnits};
pub use version::VersionToken;
