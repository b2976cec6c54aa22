use std::path::PathBuf;

use config::{Config, Environment, File};

use crate::{AppConfig, Result};

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "logbook.toml";

/// Environment prefix; `LOGBOOK__PAGING__DEFAULT_PAGE_SIZE=20` overrides
/// `paging.default_page_size`.
pub const ENV_PREFIX: &str = "LOGBOOK";

pub fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();
    let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
    if pathbuf.exists() {
        builder = builder.add_source(File::from(pathbuf));
    }
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .separator("__"),
    );
    let merged: AppConfig = builder.build()?.try_deserialize()?;
    merged.validate()?;
    Ok(merged)
}
