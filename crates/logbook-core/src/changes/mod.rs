//! Child-collection reconciliation.
//!
//! [`classifier`] partitions children and descriptors by identity,
//! [`ChangeSet`] bundles the partition, and [`apply_changes`] runs the update
//! protocol against an [`OwnedChildren`](crate::children::OwnedChildren)
//! collection.

pub mod apply;
pub mod change_set;
pub mod classifier;
pub mod policy;

pub use apply::{ReconciledChild, apply_changes};
pub use change_set::{ChangeSet, ChangeSummary};
pub use policy::{DuplicateIdentityPolicy, ForeignIdentityPolicy, ReconcilePolicy};
