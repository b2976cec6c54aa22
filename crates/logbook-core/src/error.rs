use thiserror::Error;

use crate::id::Identity;

/// Core error types for logbook domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(i64),

    #[error("Invalid duration: {0}")]
    InvalidDuration(f64),

    #[error("Identity {identity} does not belong to this {parent}")]
    ForeignIdentity { parent: String, identity: Identity },

    #[error("Identity {identity} appears more than once in the {parent} update")]
    DuplicateIdentity { parent: String, identity: Identity },

    #[error("Activity kind cannot change from {current} to {requested}")]
    ActivityKindMismatch {
        current: &'static str,
        requested: &'static str,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: Identity },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a new ForeignIdentity error
    pub fn foreign_identity(parent: impl Into<String>, identity: Identity) -> Self {
        Self::ForeignIdentity {
            parent: parent.into(),
            identity,
        }
    }

    /// Create a new DuplicateIdentity error
    pub fn duplicate_identity(parent: impl Into<String>, identity: Identity) -> Self {
        Self::DuplicateIdentity {
            parent: parent.into(),
            identity,
        }
    }

    /// Create a new NotFound error
    pub fn not_found(kind: impl Into<String>, id: Identity) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id,
        }
    }

    /// Whether the caller sent something the domain rejects outright.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::InvalidIdentity(_)
                | Self::InvalidDuration(_)
                | Self::ForeignIdentity { .. }
                | Self::DuplicateIdentity { .. }
                | Self::ActivityKindMismatch { .. }
                | Self::JsonError(_)
        )
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument(_)
            | Self::InvalidIdentity(_)
            | Self::InvalidDuration(_)
            | Self::ActivityKindMismatch { .. } => ErrorCategory::Validation,
            Self::ForeignIdentity { .. } | Self::DuplicateIdentity { .. } => {
                ErrorCategory::Reconciliation
            }
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::JsonError(_) => ErrorCategory::Serialization,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Reconciliation,
    NotFound,
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Reconciliation => write!(f, "reconciliation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
