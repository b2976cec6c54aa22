use serde::{Deserialize, Serialize};
use std::fmt;

/// Optimistic-concurrency token.
///
/// Kept apart from content fields: the store compares it against the persisted
/// token at save time and bumps it after a successful write. A client echoes
/// back the token it last read.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VersionToken(u64);

impl VersionToken {
    pub const fn initial() -> Self {
        Self(0)
    }

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VersionToken {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
