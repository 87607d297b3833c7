//! Child id allocation for parent-child hierarchies.
//!
//! Children of `pb-abc` are named `pb-abc.1`, `pb-abc.2`, ... The allocator
//! hands out the smallest positive suffix that is not used by an existing
//! child edge, not taken by a live issue, and not aliased by a rename.

use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;

use crate::db::{cache, open_cache};
use crate::error::Result;
use crate::model::DEP_TYPE_PARENT_CHILD;
use crate::paths;
use crate::renames::{ensure_issue_exists, issue_exists, resolve_issue_id};

/// Whether `child_id` is `<parent_id>.<N>` for a positive run of digits.
#[must_use]
pub fn has_parent_child_suffix(parent_id: &str, child_id: &str) -> bool {
    match child_id.strip_prefix(parent_id).and_then(|s| s.strip_prefix('.')) {
        Some(suffix) => !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// The next available child id for a parent issue.
///
/// The parent may be a historical id; allocation works on its canonical
/// form.
///
/// # Errors
///
/// Returns [`crate::Error::MissingIssue`] when the parent does not exist,
/// and propagates cache and resolution failures.
pub fn next_child_issue_id(root: &Path, parent_id: &str) -> Result<String> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;

    let parent = resolve_issue_id(&conn, parent_id)?;
    ensure_issue_exists(&conn, &parent)?;
    let mut used = load_child_suffixes(&conn, &parent)?;

    let mut suffix: u64 = 1;
    loop {
        if !used.contains(&suffix) {
            let candidate = format!("{parent}.{suffix}");
            if issue_id_available(&conn, &candidate)? {
                return Ok(candidate);
            }
            used.insert(suffix);
        }
        suffix += 1;
    }
}

/// Numeric suffixes already claimed by the parent's direct children.
fn load_child_suffixes(conn: &Connection, parent_id: &str) -> Result<HashSet<u64>> {
    let mut stmt = conn.prepare(
        "SELECT issue_id FROM deps
         WHERE dep_type = ?1 AND depends_on_id = ?2
         ORDER BY issue_id",
    )?;
    let child_ids = stmt
        .query_map([DEP_TYPE_PARENT_CHILD, parent_id], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let prefix = format!("{parent_id}.");
    let mut used = HashSet::new();
    for child_id in child_ids {
        let Some(suffix) = child_id.strip_prefix(&prefix) else {
            continue;
        };
        if let Ok(value) = suffix.parse::<u64>() {
            if value > 0 {
                used.insert(value);
            }
        }
    }
    Ok(used)
}

/// An id is available when no rename aliases it away and no issue owns it.
fn issue_id_available(conn: &Connection, id: &str) -> Result<bool> {
    let resolved = resolve_issue_id(conn, id)?;
    if resolved != id {
        return Ok(false);
    }
    Ok(!issue_exists(conn, id)?)
}
