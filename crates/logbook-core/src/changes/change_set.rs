use std::fmt;

use serde::Serialize;

use crate::children::CollectionEntry;

use super::classifier;

/// The three-way partition of one update request.
///
/// `existing` and `removed` borrow from the parent's current children,
/// `new` borrows from the incoming descriptors.
#[derive(Debug)]
pub struct ChangeSet<'c, 'd, C, D> {
    pub existing: Vec<&'c C>,
    pub new: Vec<&'d D>,
    pub removed: Vec<&'c C>,
}

impl<'c, 'd, C, D> ChangeSet<'c, 'd, C, D>
where
    C: CollectionEntry,
    D: CollectionEntry,
{
    pub fn analyze(descriptors: &'d [D], current: impl IntoIterator<Item = &'c C>) -> Self {
        let current: Vec<&'c C> = current.into_iter().collect();
        let existing = classifier::matched_existing(descriptors, &current);
        let new = classifier::unmatched_descriptors(descriptors, &current);
        let removed = classifier::to_remove(&current, &existing);

        Self {
            existing,
            new,
            removed,
        }
    }

    /// Nothing to add and nothing to remove. Matched records may still carry
    /// content changes.
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.removed.is_empty()
    }

    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary {
            retained: self.existing.len(),
            added: self.new.len(),
            removed: self.removed.len(),
        }
    }
}

/// Counts of one reconciliation, reported in logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub retained: usize,
    pub added: usize,
    pub removed: usize,
}

impl ChangeSummary {
    /// Children the parent holds once the changes are applied.
    pub fn resulting_len(&self) -> usize {
        self.retained + self.added
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "retained={} added={} removed={}",
            self.retained, self.added, self.removed
        )
    }
}
