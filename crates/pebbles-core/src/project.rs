//! Project initialization: lay down the `.pebbles/` directory.
//!
//! Idempotent: existing files are left alone, so re-running `init` on a
//! cloned repository only fills in the local-only pieces (the cache and
//! its `.gitignore`).

use std::path::Path;

use crate::config::{default_prefix, write_config, Config};
use crate::db::cache::ensure_cache;
use crate::error::{Error, Result};
use crate::paths;

/// Initialize `.pebbles/` with a prefix derived from the directory name.
///
/// # Errors
///
/// Propagates filesystem and cache-build failures.
pub fn init_project(root: &Path) -> Result<()> {
    init_project_with_prefix(root, "")
}

/// Initialize `.pebbles/` with an explicit prefix (blank means "derive").
///
/// Creates the directory, config, empty event log, and `.gitignore`, then
/// builds the cache.
///
/// # Errors
///
/// Propagates filesystem and cache-build failures.
pub fn init_project_with_prefix(root: &Path, prefix: &str) -> Result<()> {
    let dir = paths::pebbles_dir(root);
    std::fs::create_dir_all(&dir).map_err(|err| Error::io("create .pebbles dir", &dir, err))?;
    ensure_config(root, prefix)?;
    ensure_events_file(root)?;
    ensure_gitignore(root)?;
    ensure_cache(root)
}

fn ensure_config(root: &Path, prefix: &str) -> Result<()> {
    if paths::config_path(root).exists() {
        return Ok(());
    }
    let trimmed = prefix.trim();
    let prefix = if trimmed.is_empty() {
        default_prefix(root)
    } else {
        trimmed.to_string()
    };
    write_config(root, &Config { prefix })
}

fn ensure_events_file(root: &Path) -> Result<()> {
    let path = paths::events_path(root);
    if path.exists() {
        return Ok(());
    }
    std::fs::write(&path, "").map_err(|err| Error::io("create events log", &path, err))
}

fn ensure_gitignore(root: &Path) -> Result<()> {
    let path = paths::pebbles_dir(root).join(".gitignore");
    if path.exists() {
        return Ok(());
    }
    std::fs::write(&path, "pebbles.db\n")
        .map_err(|err| Error::io("create .pebbles/.gitignore", &path, err))
}
