//! Per-project configuration: the issue id prefix.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths;

/// Per-project Pebbles settings, stored as JSON at `.pebbles/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub prefix: String,
}

/// Derive a default prefix from the project directory name.
///
/// Falls back to `"pb"` when the basename is unusable (`.` or the
/// filesystem root).
#[must_use]
pub fn default_prefix(root: &Path) -> String {
    match root.file_name().and_then(|name| name.to_str()) {
        Some(base) if base != "." => base.to_string(),
        _ => "pb".to_string(),
    }
}

/// Read the config from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file is unreadable and [`Error::Config`]
/// when it fails to parse or carries an empty prefix.
pub fn load_config(root: &Path) -> Result<Config> {
    let path = paths::config_path(root);
    let data =
        std::fs::read_to_string(&path).map_err(|err| Error::io("read config", &path, err))?;
    let cfg: Config = serde_json::from_str(&data).map_err(|err| Error::Config {
        reason: format!("parse {}: {err}", path.display()),
    })?;
    if cfg.prefix.trim().is_empty() {
        return Err(Error::Config {
            reason: "missing prefix".to_string(),
        });
    }
    Ok(cfg)
}

/// Write the config to disk as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be written.
pub fn write_config(root: &Path, cfg: &Config) -> Result<()> {
    let path = paths::config_path(root);
    let data = serde_json::to_string_pretty(cfg).map_err(|err| Error::Config {
        reason: format!("serialize config: {err}"),
    })?;
    std::fs::write(&path, data).map_err(|err| Error::io("write config", &path, err))
}
