//! Storage error types for the logbook persistence layer.

use std::fmt;

use logbook_core::{Identity, VersionMismatch, VersionToken};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested aggregate was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of aggregate that was not found.
        kind: String,
        /// The identity that was looked up.
        id: String,
    },

    /// The caller's version token is stale.
    #[error("Version conflict on {kind}/{id}: expected {expected}, found {actual}")]
    VersionConflict {
        /// Kind of the record whose token did not match.
        kind: String,
        /// Identity of that record.
        id: String,
        /// The token the caller sent.
        expected: String,
        /// The token currently stored.
        actual: String,
    },

    /// A unique key is already taken by another aggregate.
    #[error("{kind} already exists: {key}")]
    AlreadyExists {
        /// The kind of aggregate.
        kind: String,
        /// The conflicting key.
        key: String,
    },

    /// The aggregate cannot be stored as given.
    #[error("Invalid aggregate: {message}")]
    InvalidAggregate {
        /// Description of why the aggregate is invalid.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    /// Creates a new `VersionConflict` error.
    #[must_use]
    pub fn version_conflict(
        kind: impl Into<String>,
        id: Identity,
        expected: VersionToken,
        actual: VersionToken,
    ) -> Self {
        Self::VersionConflict {
            kind: kind.into(),
            id: id.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Creates a `VersionConflict` for a child whose token is stale or which
    /// another writer already deleted.
    #[must_use]
    pub fn child_conflict(kind: impl Into<String>, mismatch: VersionMismatch) -> Self {
        Self::VersionConflict {
            kind: kind.into(),
            id: mismatch.identity.to_string(),
            expected: mismatch.expected.to_string(),
            actual: mismatch
                .actual
                .map_or_else(|| "deleted".to_string(), |v| v.to_string()),
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Creates a new `InvalidAggregate` error.
    #[must_use]
    pub fn invalid_aggregate(message: impl Into<String>) -> Self {
        Self::InvalidAggregate {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Returns `true` if this is an already exists error.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::VersionConflict { .. } => ErrorCategory::Conflict,
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::InvalidAggregate { .. } => ErrorCategory::Validation,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Aggregate not found.
    NotFound,
    /// Conflict (version or unique key).
    Conflict,
    /// Validation error.
    Validation,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
