use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::{CoreError, Result};
use crate::id::Identity;
use crate::time::Timestamp;
use crate::version::VersionToken;

/// A named training log. Entries point back at it.
#[derive(Debug, Clone, PartialEq)]
pub struct Logbook {
    id: Option<Identity>,
    name: String,
    start_date: Option<Date>,
    version: VersionToken,
}

impl Logbook {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = validate_name(name.into())?;
        Ok(Self {
            id: None,
            name,
            start_date: None,
            version: VersionToken::initial(),
        })
    }

    pub fn update_from(&mut self, dto: &LogbookDto) -> Result<()> {
        let name = validate_name(dto.name.clone())?;
        if let Some(version) = dto.version {
            self.version = version;
        }
        self.name = name;
        Ok(())
    }

    pub fn as_dto(&self) -> LogbookDto {
        LogbookDto {
            id: self.id.map(Identity::get),
            name: self.name.clone(),
            start_date: self.start_date,
            version: Some(self.version),
        }
    }

    pub fn id(&self) -> Option<Identity> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    pub fn version(&self) -> VersionToken {
        self.version
    }

    pub fn set_version(&mut self, version: VersionToken) {
        self.version = version;
    }

    pub fn mark_persisted(&mut self, identity: Identity, now: Timestamp) {
        self.id = Some(identity);
        self.start_date.get_or_insert(now.date());
    }
}

fn validate_name(name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid_argument("Logbook name must not be blank"));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogbookDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionToken>,
}
