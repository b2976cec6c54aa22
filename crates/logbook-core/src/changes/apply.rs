//! The fixed-order update protocol applied to a parent's owned children.

use std::collections::HashSet;

use tracing::{debug, error};

use crate::children::{CollectionEntry, OwnedChildren, PersistentChild};
use crate::error::{CoreError, Result};
use crate::id::Identity;

use super::change_set::{ChangeSet, ChangeSummary};
use super::policy::{DuplicateIdentityPolicy, ForeignIdentityPolicy, ReconcilePolicy};

/// A child that can be reconciled against descriptors of type `D`.
pub trait ReconciledChild<D>: PersistentChild {
    /// Copies content from the descriptor. The descriptor's version token, if
    /// any, replaces the child's so the store can detect a stale client.
    fn update_from(&mut self, descriptor: &D);

    /// Builds a child that has never been persisted. The descriptor's
    /// identity is never copied.
    fn from_descriptor(descriptor: &D) -> Self;
}

/// Reconciles `children` with `descriptors`: analyze, remove, modify, add.
///
/// Policy checks run before the first mutation, so an error leaves the
/// collection exactly as it was.
pub fn apply_changes<C, D>(
    parent: &str,
    children: &mut OwnedChildren<C>,
    descriptors: &[D],
    policy: &ReconcilePolicy,
) -> Result<ChangeSummary>
where
    C: ReconciledChild<D>,
    D: CollectionEntry,
{
    let (retained, new, summary) = {
        let changes = ChangeSet::analyze(descriptors, children.iter());
        check_foreign_identities(parent, &changes.new, policy)?;
        check_duplicate_identities(parent, descriptors, policy)?;

        let retained: Vec<Identity> = changes
            .existing
            .iter()
            .filter_map(|child| child.identity())
            .collect();
        let summary = changes.summary();
        (retained, changes.new, summary)
    };

    children.retain_identities(&retained);

    for identity in &retained {
        let first = descriptors
            .iter()
            .find(|descriptor| descriptor.has_same_identity_as(Some(*identity)));
        if let (Some(descriptor), Some(child)) = (first, children.get_mut(*identity)) {
            child.update_from(descriptor);
        }
    }

    for descriptor in new {
        children.attach(C::from_descriptor(descriptor));
    }

    debug!(
        parent,
        retained = summary.retained,
        added = summary.added,
        removed = summary.removed,
        "child collection reconciled"
    );
    Ok(summary)
}

fn check_foreign_identities<D: CollectionEntry>(
    parent: &str,
    new: &[&D],
    policy: &ReconcilePolicy,
) -> Result<()> {
    if policy.foreign_identities == ForeignIdentityPolicy::TreatAsNew {
        return Ok(());
    }
    match new.iter().find_map(|descriptor| descriptor.identity()) {
        Some(identity) => {
            error!(parent, %identity, "descriptor references a child this parent does not own");
            Err(CoreError::foreign_identity(parent, identity))
        }
        None => Ok(()),
    }
}

fn check_duplicate_identities<D: CollectionEntry>(
    parent: &str,
    descriptors: &[D],
    policy: &ReconcilePolicy,
) -> Result<()> {
    let mut seen = HashSet::new();
    for identity in descriptors.iter().filter_map(|d| d.identity()) {
        if seen.insert(identity) {
            continue;
        }
        match policy.duplicate_identities {
            DuplicateIdentityPolicy::FirstWins => {
                debug!(parent, %identity, "ignoring repeated descriptor");
            }
            DuplicateIdentityPolicy::Reject => {
                error!(parent, %identity, "descriptor identity repeated");
                return Err(CoreError::duplicate_identity(parent, identity));
            }
        }
    }
    Ok(())
}
