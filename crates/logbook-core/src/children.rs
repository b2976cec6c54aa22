//! Exclusively owned child collections.
//!
//! A parent aggregate keeps its children in an [`OwnedChildren`] container,
//! keyed by store identity once persisted and by a local handle before that.
//! Dropping a child from the container is the same as deleting it; the store
//! cascades the removal when the parent is saved.

use indexmap::IndexMap;

use crate::id::Identity;
use crate::time::Timestamp;
use crate::version::VersionToken;

/// Anything that takes part in identity matching: persisted children as well
/// as the client descriptors aimed at them.
pub trait CollectionEntry {
    fn identity(&self) -> Option<Identity>;

    /// Absent identities never match, not even each other.
    fn has_same_identity_as(&self, other: Option<Identity>) -> bool {
        matches!((self.identity(), other), (Some(mine), Some(theirs)) if mine == theirs)
    }

    fn has_identity_in(&self, identities: &[Option<Identity>]) -> bool {
        identities.iter().any(|id| self.has_same_identity_as(*id))
    }
}

/// A child record the store can persist as part of its parent.
pub trait PersistentChild: CollectionEntry + Clone {
    fn version(&self) -> VersionToken;

    fn set_version(&mut self, version: VersionToken);

    /// Content equality with the persisted copy, ignoring identity and version.
    fn content_matches(&self, persisted: &Self) -> bool;

    /// Called once, when the store assigns the identity.
    fn mark_persisted(&mut self, identity: Identity, now: Timestamp);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKey {
    Persisted(Identity),
    Pending(u32),
}

/// A retained child whose token no longer matches the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionMismatch {
    pub identity: Identity,
    pub expected: VersionToken,
    /// `None` when the child has been deleted by another writer.
    pub actual: Option<VersionToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnedChildren<C> {
    entries: IndexMap<ChildKey, C>,
    next_handle: u32,
}

impl<C> Default for OwnedChildren<C> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            next_handle: 0,
        }
    }
}

impl<C: CollectionEntry> OwnedChildren<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a child at the end. A child carrying an identity that is
    /// already present replaces the previous one in place.
    pub fn attach(&mut self, child: C) -> ChildKey {
        let key = match child.identity() {
            Some(identity) => ChildKey::Persisted(identity),
            None => {
                let handle = self.next_handle;
                self.next_handle += 1;
                ChildKey::Pending(handle)
            }
        };
        self.entries.insert(key, child);
        key
    }

    /// Keeps only persisted children whose identity is listed, preserving
    /// order. Returns the detached children.
    pub fn retain_identities(&mut self, keep: &[Identity]) -> Vec<C> {
        let doomed: Vec<ChildKey> = self
            .entries
            .keys()
            .filter(|key| match key {
                ChildKey::Persisted(identity) => !keep.contains(identity),
                ChildKey::Pending(_) => true,
            })
            .copied()
            .collect();

        doomed
            .iter()
            .filter_map(|key| self.entries.shift_remove(key))
            .collect()
    }

    pub fn get(&self, identity: Identity) -> Option<&C> {
        self.entries.get(&ChildKey::Persisted(identity))
    }

    pub fn get_mut(&mut self, identity: Identity) -> Option<&mut C> {
        self.entries.get_mut(&ChildKey::Persisted(identity))
    }

    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.entries.values()
    }

    pub fn identities(&self) -> Vec<Identity> {
        self.entries
            .keys()
            .filter_map(|key| match key {
                ChildKey::Persisted(identity) => Some(*identity),
                ChildKey::Pending(_) => None,
            })
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .keys()
            .filter(|key| matches!(key, ChildKey::Pending(_)))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<C: CollectionEntry> FromIterator<C> for OwnedChildren<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut children = Self::new();
        for child in iter {
            children.attach(child);
        }
        children
    }
}

impl<C: PersistentChild> OwnedChildren<C> {
    /// Compares the token of every retained child with the stored copy.
    pub fn verify_versions(&self, persisted: &Self) -> Result<(), VersionMismatch> {
        for (key, child) in &self.entries {
            let ChildKey::Persisted(identity) = key else {
                continue;
            };
            let actual = persisted.get(*identity).map(PersistentChild::version);
            if actual != Some(child.version()) {
                return Err(VersionMismatch {
                    identity: *identity,
                    expected: child.version(),
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Applies the effects of a successful save: pending children receive
    /// identities in order, changed children get their token bumped.
    pub fn stamp_persisted(
        &mut self,
        persisted: Option<&Self>,
        mut next_identity: impl FnMut() -> Identity,
        now: Timestamp,
    ) {
        let entries = std::mem::take(&mut self.entries);
        for (key, mut child) in entries {
            let identity = match key {
                ChildKey::Pending(_) => {
                    let identity = next_identity();
                    child.mark_persisted(identity, now);
                    child.set_version(VersionToken::initial());
                    identity
                }
                ChildKey::Persisted(identity) => {
                    if let Some(stored) = persisted.and_then(|p| p.get(identity))
                        && !child.content_matches(stored)
                    {
                        child.set_version(stored.version().next());
                    }
                    identity
                }
            };
            self.entries.insert(ChildKey::Persisted(identity), child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Option<Identity>,
        text: String,
        version: VersionToken,
        created: Option<Timestamp>,
    }

    impl Note {
        fn persisted(id: i64, text: &str) -> Self {
            Self {
                id: Identity::from_raw(id),
                text: text.to_string(),
                version: VersionToken::initial(),
                created: None,
            }
        }

        fn pending(text: &str) -> Self {
            Self {
                id: None,
                text: text.to_string(),
                version: VersionToken::initial(),
                created: None,
            }
        }
    }

    impl CollectionEntry for Note {
        fn identity(&self) -> Option<Identity> {
            self.id
        }
    }

    impl PersistentChild for Note {
        fn version(&self) -> VersionToken {
            self.version
        }

        fn set_version(&mut self, version: VersionToken) {
            self.version = version;
        }

        fn content_matches(&self, persisted: &Self) -> bool {
            self.text == persisted.text
        }

        fn mark_persisted(&mut self, identity: Identity, now: Timestamp) {
            self.id = Some(identity);
            self.created = Some(now);
        }
    }

    fn id(raw: i64) -> Identity {
        Identity::from_raw(raw).unwrap()
    }

    #[test]
    fn test_absent_identity_never_matches() {
        let pending = Note::pending("a");
        assert!(!pending.has_same_identity_as(None));
        assert!(!pending.has_identity_in(&[None, Some(id(1))]));

        let stored = Note::persisted(1, "b");
        assert!(stored.has_same_identity_as(Some(id(1))));
        assert!(!stored.has_same_identity_as(None));
    }

    #[test]
    fn test_attach_keys_pending_and_persisted_children() {
        let mut children = OwnedChildren::new();
        let a = children.attach(Note::persisted(4, "a"));
        let b = children.attach(Note::pending("b"));
        let c = children.attach(Note::pending("c"));

        assert_eq!(a, ChildKey::Persisted(id(4)));
        assert_eq!(b, ChildKey::Pending(0));
        assert_eq!(c, ChildKey::Pending(1));
        assert_eq!(children.len(), 3);
        assert_eq!(children.pending_count(), 2);
        assert_eq!(children.identities(), vec![id(4)]);
    }

    #[test]
    fn test_retain_identities_drops_pending_and_unlisted() {
        let mut children: OwnedChildren<Note> = vec![
            Note::persisted(1, "one"),
            Note::pending("draft"),
            Note::persisted(2, "two"),
            Note::persisted(3, "three"),
        ]
        .into_iter()
        .collect();

        let removed = children.retain_identities(&[id(3), id(1)]);
        assert_eq!(removed.len(), 2);
        let texts: Vec<_> = children.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "three"]);
    }

    #[test]
    fn test_verify_versions_reports_stale_and_deleted_children() {
        let persisted: OwnedChildren<Note> =
            vec![Note::persisted(1, "one"), Note::persisted(2, "two")]
                .into_iter()
                .collect();

        let mut current = persisted.clone();
        assert!(current.verify_versions(&persisted).is_ok());

        current.get_mut(id(2)).unwrap().version = VersionToken::new(5);
        let mismatch = current.verify_versions(&persisted).unwrap_err();
        assert_eq!(mismatch.identity, id(2));
        assert_eq!(mismatch.actual, Some(VersionToken::initial()));

        let mut gone = OwnedChildren::new();
        gone.attach(Note::persisted(9, "nine"));
        let mismatch = gone.verify_versions(&persisted).unwrap_err();
        assert_eq!(mismatch.actual, None);
    }

    #[test]
    fn test_stamp_persisted_assigns_identities_and_bumps_changed() {
        let persisted: OwnedChildren<Note> =
            vec![Note::persisted(1, "one"), Note::persisted(2, "two")]
                .into_iter()
                .collect();

        let mut current = persisted.clone();
        current.get_mut(id(2)).unwrap().text = "two, edited".to_string();
        current.attach(Note::pending("three"));

        let mut next = 10;
        let now = crate::time::now_utc();
        current.stamp_persisted(
            Some(&persisted),
            || {
                next += 1;
                id(next)
            },
            now,
        );

        assert_eq!(current.pending_count(), 0);
        assert_eq!(current.identities(), vec![id(1), id(2), id(11)]);
        assert_eq!(current.get(id(1)).unwrap().version, VersionToken::initial());
        assert_eq!(current.get(id(2)).unwrap().version, VersionToken::new(1));
        assert_eq!(current.get(id(11)).unwrap().created, Some(now));
    }
}
