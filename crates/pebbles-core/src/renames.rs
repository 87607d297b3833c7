//! Rename resolution: follow historical id mappings to the canonical id.
//!
//! The `renames` table is a materialized view maintained by the rename
//! projection handler. Chains (`a -> b -> c`) are legal; cycles are a hard
//! error surfaced as [`Error::RenameCycle`].

use rusqlite::{Connection, OptionalExtension};
use std::collections::HashSet;

use crate::error::{Error, Result};

/// Follow rename mappings from `id` until the id is stable.
///
/// # Errors
///
/// Returns [`Error::MissingIssueId`] on blank input and
/// [`Error::RenameCycle`] if resolution revisits an id.
pub fn resolve_issue_id(conn: &Connection, id: &str) -> Result<String> {
    let mut current = id.trim().to_string();
    if current.is_empty() {
        return Err(Error::MissingIssueId);
    }
    let mut visited = HashSet::new();
    loop {
        if !visited.insert(current.clone()) {
            return Err(Error::RenameCycle { id: id.to_string() });
        }
        match lookup_rename(conn, &current)? {
            Some(next) => current = next,
            None => return Ok(current),
        }
    }
}

/// Fetch the rename mapping for an id, if any.
fn lookup_rename(conn: &Connection, id: &str) -> Result<Option<String>> {
    let next = conn
        .query_row("SELECT new_id FROM renames WHERE old_id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(next)
}

/// Report whether an issue row exists for an (already canonical) id.
///
/// # Errors
///
/// Returns a cache error if the lookup fails.
pub fn issue_exists(conn: &Connection, id: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM issues WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Fail with [`Error::MissingIssue`] unless the issue exists.
pub fn ensure_issue_exists(conn: &Connection, id: &str) -> Result<()> {
    if issue_exists(conn, id)? {
        Ok(())
    } else {
        Err(Error::MissingIssue { id: id.to_string() })
    }
}

/// Fail with [`Error::DuplicateIssue`] if an issue already uses the id.
pub fn ensure_issue_missing(conn: &Connection, id: &str) -> Result<()> {
    if issue_exists(conn, id)? {
        Err(Error::DuplicateIssue { id: id.to_string() })
    } else {
        Ok(())
    }
}
