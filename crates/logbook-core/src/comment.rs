use serde::{Deserialize, Serialize};

use crate::changes::ReconciledChild;
use crate::children::{CollectionEntry, PersistentChild};
use crate::id::Identity;
use crate::time::Timestamp;
use crate::version::VersionToken;

/// A free-text note owned by an activity or a logbook entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    id: Option<Identity>,
    content: String,
    version: VersionToken,
    created_at: Option<Timestamp>,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            version: VersionToken::initial(),
            created_at: None,
        }
    }

    pub fn id(&self) -> Option<Identity> {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn version(&self) -> VersionToken {
        self.version
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn as_dto(&self) -> CommentDto {
        CommentDto {
            id: self.id.map(Identity::get),
            content: self.content.clone(),
            version: Some(self.version),
            created_at: self.created_at,
        }
    }
}

impl CollectionEntry for Comment {
    fn identity(&self) -> Option<Identity> {
        self.id
    }
}

impl PersistentChild for Comment {
    fn version(&self) -> VersionToken {
        self.version
    }

    fn set_version(&mut self, version: VersionToken) {
        self.version = version;
    }

    fn content_matches(&self, persisted: &Self) -> bool {
        self.content == persisted.content
    }

    fn mark_persisted(&mut self, identity: Identity, now: Timestamp) {
        self.id = Some(identity);
        self.created_at.get_or_insert(now);
    }
}

impl ReconciledChild<CommentDto> for Comment {
    fn update_from(&mut self, descriptor: &CommentDto) {
        self.content.clone_from(&descriptor.content);
        if let Some(version) = descriptor.version {
            self.version = version;
        }
    }

    fn from_descriptor(descriptor: &CommentDto) -> Self {
        Self::new(descriptor.content.clone())
    }
}

/// Wire form of a [`Comment`], also used as its update descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl CommentDto {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// A descriptor aimed at a persisted comment.
    pub fn existing(id: i64, content: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: VersionToken) -> Self {
        self.version = Some(version);
        self
    }
}

impl CollectionEntry for CommentDto {
    fn identity(&self) -> Option<Identity> {
        Identity::from_optional(self.id)
    }
}
