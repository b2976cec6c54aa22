//! Identity-based classification of a parent's children against the
//! descriptors a client sent back.
//!
//! All functions are pure and never fail. They compare identities only;
//! records without an identity never match anything.

use crate::children::CollectionEntry;
use crate::id::Identity;

/// Records of `current` whose identity does not appear in `matched`.
pub fn to_remove<'a, C: CollectionEntry>(current: &[&'a C], matched: &[&'a C]) -> Vec<&'a C> {
    let matched_ids = identities_of(matched.iter().copied());
    current
        .iter()
        .filter(|record| !record.has_identity_in(&matched_ids))
        .copied()
        .collect()
}

/// Records of `current` targeted by at least one descriptor.
///
/// A record targeted by several descriptors is still returned once.
pub fn matched_existing<'a, C, D>(descriptors: &[D], current: &[&'a C]) -> Vec<&'a C>
where
    C: CollectionEntry,
    D: CollectionEntry,
{
    let descriptor_ids = identities_of(descriptors.iter());
    current
        .iter()
        .filter(|record| record.has_identity_in(&descriptor_ids))
        .copied()
        .collect()
}

/// Descriptors that target no record of `current`. Descriptors without an
/// identity are always included.
pub fn unmatched_descriptors<'d, C, D>(descriptors: &'d [D], current: &[&C]) -> Vec<&'d D>
where
    C: CollectionEntry,
    D: CollectionEntry,
{
    let current_ids = identities_of(current.iter().copied());
    descriptors
        .iter()
        .filter(|descriptor| !descriptor.has_identity_in(&current_ids))
        .collect()
}

fn identities_of<'a, E: CollectionEntry + 'a>(
    entries: impl Iterator<Item = &'a E>,
) -> Vec<Option<Identity>> {
    entries.map(|entry| entry.identity()).collect()
}
