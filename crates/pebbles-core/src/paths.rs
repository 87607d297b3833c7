//! Filesystem layout of a Pebbles project.
//!
//! Everything durable lives under `<root>/.pebbles/`:
//!
//! ```text
//! .pebbles/
//!   config.json      per-project settings (issue id prefix)
//!   events.jsonl     the append-only event log (committed to git)
//!   pebbles.db       derived SQLite cache (local only, .gitignored)
//!   .gitignore       keeps the cache out of version control
//! ```

use std::path::{Path, PathBuf};

/// Directory holding all Pebbles state for a project root.
#[must_use]
pub fn pebbles_dir(root: &Path) -> PathBuf {
    root.join(".pebbles")
}

/// Path of the append-only event log.
#[must_use]
pub fn events_path(root: &Path) -> PathBuf {
    pebbles_dir(root).join("events.jsonl")
}

/// Path of the per-project config file.
#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    pebbles_dir(root).join("config.json")
}

/// Path of the derived SQLite cache.
#[must_use]
pub fn db_path(root: &Path) -> PathBuf {
    pebbles_dir(root).join("pebbles.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_under_dot_pebbles() {
        let root = Path::new("/tmp/project");
        assert_eq!(pebbles_dir(root), Path::new("/tmp/project/.pebbles"));
        assert_eq!(
            events_path(root),
            Path::new("/tmp/project/.pebbles/events.jsonl")
        );
        assert_eq!(
            config_path(root),
            Path::new("/tmp/project/.pebbles/config.json")
        );
        assert_eq!(db_path(root), Path::new("/tmp/project/.pebbles/pebbles.db"));
    }
}
