use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

use crate::error::CoreError;

/// Store-assigned key of a persisted record.
///
/// Always positive. Wire formats carry identities as raw, nullable integers;
/// `from_raw` is the only way in, so zero and negative values can never take
/// part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Identity(NonZeroU64);

impl Identity {
    /// Returns `None` for zero or negative values.
    pub fn from_raw(raw: i64) -> Option<Self> {
        u64::try_from(raw).ok().and_then(NonZeroU64::new).map(Self)
    }

    /// Lifts a nullable wire identity, dropping anything non-positive.
    pub fn from_optional(raw: Option<i64>) -> Option<Self> {
        raw.and_then(Self::from_raw)
    }

    /// The `n`-th identity of a zero-based sequence, clamped to `i64::MAX`.
    pub fn from_sequence(n: u64) -> Self {
        let clamped = n.min(i64::MAX as u64 - 1);
        Self(NonZeroU64::MIN.saturating_add(clamped))
    }

    pub fn get(self) -> i64 {
        // Identities are minted from positive i64 values only.
        self.0.get() as i64
    }
}

impl TryFrom<i64> for Identity {
    type Error = CoreError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or(CoreError::InvalidIdentity(raw))
    }
}

impl From<Identity> for i64 {
    fn from(identity: Identity) -> Self {
        identity.get()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates a caller-supplied identity that must reference an existing record.
pub fn validate_id(raw: Option<i64>) -> Result<Identity, CoreError> {
    match raw {
        Some(value) => Identity::try_from(value),
        None => Err(CoreError::invalid_argument("Missing identity")),
    }
}
