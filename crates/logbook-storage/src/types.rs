//! Common types for the logbook storage layer.

use std::sync::atomic::{AtomicU64, Ordering};

use logbook_core::Identity;
use serde::{Deserialize, Serialize};

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    /// Creates a page request. A size of zero is treated as one.
    #[must_use]
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    #[must_use]
    pub fn first(size: usize) -> Self {
        Self::new(0, size)
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    #[must_use]
    pub fn next(&self) -> Self {
        Self::new(self.page + 1, self.size)
    }
}

/// One page of a sorted listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// The request that produced this page.
    pub request: PageRequest,
    /// Total number of items across all pages.
    pub total: usize,
    /// Whether there are more items beyond this page.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Cuts one page out of an already sorted listing.
    #[must_use]
    pub fn slice(sorted: Vec<T>, request: PageRequest) -> Self {
        let total = sorted.len();
        let items: Vec<T> = sorted
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        let has_more = request.offset().saturating_add(items.len()) < total;
        Self {
            items,
            request,
            total,
            has_more,
        }
    }

    /// Replaces the items, keeping the paging metadata.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            request: self.request,
            total: self.total,
            has_more: self.has_more,
        }
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Monotonic identity source. One sequence may be shared by several
/// repositories whose records live in the same key space.
#[derive(Debug, Default)]
pub struct IdentitySequence {
    issued: AtomicU64,
}

impl IdentitySequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Identity {
        Identity::from_sequence(self.issued.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of identities handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slice() {
        let page = Page::slice((1..=7).collect(), PageRequest::new(1, 3));
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 7);
        assert!(page.has_more);

        let last = Page::slice((1..=7).collect(), PageRequest::new(2, 3));
        assert_eq!(last.items, vec![7]);
        assert!(!last.has_more);

        let beyond = Page::slice((1..=7).collect::<Vec<_>>(), PageRequest::new(5, 3));
        assert!(beyond.is_empty());
        assert!(!beyond.has_more);
    }

    #[test]
    fn test_page_request_never_zero_sized() {
        let request = PageRequest::new(2, 0);
        assert_eq!(request.size, 1);
        assert_eq!(request.offset(), 2);
        assert_eq!(request.next().page, 3);
    }

    #[test]
    fn test_with_items_keeps_metadata() {
        let page = Page::slice(vec![1, 2, 3], PageRequest::first(2));
        let labels: Vec<String> = page.items.iter().map(|n| format!("#{n}")).collect();
        let page = page.with_items(labels);
        assert_eq!(page.items, vec!["#1".to_string(), "#2".to_string()]);
        assert_eq!(page.total, 3);
        assert!(page.has_more);
    }

    #[test]
    fn test_identity_sequence_is_monotonic() {
        let sequence = IdentitySequence::new();
        let first = sequence.next();
        let second = sequence.next();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_eq!(sequence.issued(), 2);
    }
}
