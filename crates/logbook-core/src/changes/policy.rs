use serde::{Deserialize, Serialize};

/// What to do with a descriptor whose identity is not owned by the parent
/// being updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignIdentityPolicy {
    /// Fail the whole update with an invalid-argument error.
    #[default]
    Reject,
    /// Ignore the identity and create a new child from the descriptor.
    TreatAsNew,
}

/// What to do when several descriptors carry the same identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIdentityPolicy {
    /// The first descriptor in input order is applied, later ones are dropped.
    #[default]
    FirstWins,
    Reject,
}

/// Knobs for the ambiguous corners of child reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilePolicy {
    pub foreign_identities: ForeignIdentityPolicy,
    pub duplicate_identities: DuplicateIdentityPolicy,
}

impl ReconcilePolicy {
    /// Accepts every request the classifier can handle.
    pub const fn permissive() -> Self {
        Self {
            foreign_identities: ForeignIdentityPolicy::TreatAsNew,
            duplicate_identities: DuplicateIdentityPolicy::FirstWins,
        }
    }

    pub const fn strict() -> Self {
        Self {
            foreign_identities: ForeignIdentityPolicy::Reject,
            duplicate_identities: DuplicateIdentityPolicy::Reject,
        }
    }
}
