use logbook_core::CoreError;
use logbook_storage::StorageError;
use thiserror::Error;

/// Errors returned by the logbook services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request is malformed or names records that do not belong together.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Another writer saved first; reload and reapply.
    #[error("Concurrent modification: {0}")]
    ConcurrencyConflict(String),

    #[error("Storage error: {0}")]
    Storage(#[source] StorageError),
}

impl ServiceError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Errors the caller can fix by changing or repeating the request.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { kind, id } => Self::NotFound {
                kind,
                id: id.to_string(),
            },
            CoreError::InvalidArgument(message) => Self::InvalidArgument(message),
            other => Self::InvalidArgument(other.to_string()),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { kind, id } => Self::NotFound { kind, id },
            StorageError::VersionConflict { .. } => Self::ConcurrencyConflict(err.to_string()),
            StorageError::AlreadyExists { .. } | StorageError::InvalidAggregate { .. } => {
                Self::InvalidArgument(err.to_string())
            }
            StorageError::Internal { .. } => Self::Storage(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use logbook_core::{Identity, VersionToken};

    fn id(raw: i64) -> Identity {
        Identity::from_raw(raw).unwrap()
    }

    #[test]
    fn test_core_errors_map_to_invalid_argument() {
        let err: ServiceError = CoreError::foreign_identity("activity", id(3)).into();
        assert!(err.is_invalid_argument());
        assert_eq!(
            err.to_string(),
            "Invalid argument: Identity 3 does not belong to this activity"
        );

        let err: ServiceError = CoreError::InvalidDuration(-2.0).into();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_core_not_found_keeps_kind() {
        let err: ServiceError = CoreError::not_found("Activity", id(9)).into();
        assert!(matches!(err, ServiceError::NotFound { ref kind, ref id } if kind == "Activity" && id == "9"));
    }

    #[test]
    fn test_storage_errors_mapping() {
        let err: ServiceError =
            StorageError::version_conflict("Logbook", id(1), VersionToken::new(0), VersionToken::new(1))
                .into();
        assert!(err.is_conflict());
        assert!(err.is_client_error());

        let err: ServiceError = StorageError::already_exists("Logbook", "Erg").into();
        assert!(err.is_invalid_argument());

        let err: ServiceError = StorageError::not_found("LogbookEntry", id(4)).into();
        assert!(err.is_not_found());

        let err: ServiceError = StorageError::internal("boom").into();
        assert!(!err.is_client_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
