//! Read queries over the cache: list, fetch, ready-list, existence.
//!
//! Public functions take the project root, refresh the cache first, and
//! resolve caller-supplied ids through the rename table. Crate-internal
//! helpers take an open connection and expect canonical ids.

use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;

use crate::db::{cache, open_cache};
use crate::error::{Error, Result};
use crate::model::{Issue, Status, DEP_TYPE_BLOCKS};
use crate::paths;
use crate::renames::resolve_issue_id;

pub(crate) const ISSUE_COLUMNS: &str =
    "id, title, description, issue_type, status, priority, created_at, updated_at, closed_at";

/// All issues ordered by canonical id.
///
/// # Errors
///
/// Propagates cache refresh and query failures.
pub fn list_issues(root: &Path) -> Result<Vec<Issue>> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;
    list_issues_in(&conn)
}

/// One issue plus the ids of its `blocks` dependencies, sorted.
///
/// The id may be historical; it resolves through the rename table.
///
/// # Errors
///
/// Returns [`Error::MissingIssue`] when the resolved id has no row.
pub fn get_issue(root: &Path, id: &str) -> Result<(Issue, Vec<String>)> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;
    let resolved = resolve_issue_id(&conn, id)?;
    let issue = get_issue_by_id(&conn, &resolved)?;
    let blockers = get_deps(&conn, &resolved, DEP_TYPE_BLOCKS)?;
    Ok((issue, blockers))
}

/// Issues that are not closed and have no open blocker, ordered by id.
///
/// # Errors
///
/// Propagates cache refresh and query failures.
pub fn list_ready_issues(root: &Path) -> Result<Vec<Issue>> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {ISSUE_COLUMNS}
         FROM issues i
         WHERE i.status != ?1
           AND NOT EXISTS (
               SELECT 1 FROM deps d
               JOIN issues di ON di.id = d.depends_on_id
               WHERE d.issue_id = i.id AND d.dep_type = ?2 AND di.status != ?1
           )
         ORDER BY i.id"
    ))?;
    let issues = stmt
        .query_map(
            rusqlite::params![Status::Closed, DEP_TYPE_BLOCKS],
            issue_from_row,
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(issues)
}

/// Report whether an id (or one of its historical aliases) names an issue.
///
/// # Errors
///
/// Propagates cache refresh, resolution, and query failures.
pub fn issue_exists(root: &Path, id: &str) -> Result<bool> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;
    let resolved = resolve_issue_id(&conn, id)?;
    crate::renames::issue_exists(&conn, &resolved)
}

/// The status of one issue, without fetching the full row.
///
/// # Errors
///
/// Returns [`Error::MissingIssue`] when the resolved id has no row.
pub fn issue_status(root: &Path, id: &str) -> Result<Status> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;
    let resolved = resolve_issue_id(&conn, id)?;
    conn.query_row(
        "SELECT status FROM issues WHERE id = ?1",
        [&resolved],
        |row| row.get(0),
    )
    .optional()?
    .ok_or(Error::MissingIssue { id: resolved })
}

pub(crate) fn list_issues_in(conn: &Connection) -> Result<Vec<Issue>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {ISSUE_COLUMNS} FROM issues ORDER BY id"))?;
    let issues = stmt
        .query_map([], issue_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(issues)
}

pub(crate) fn get_issue_by_id(conn: &Connection, id: &str) -> Result<Issue> {
    conn.query_row(
        &format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?1"),
        [id],
        issue_from_row,
    )
    .optional()?
    .ok_or_else(|| Error::MissingIssue { id: id.to_string() })
}

/// Ids this issue depends on with the given dep type, sorted by target id.
pub(crate) fn get_deps(conn: &Connection, id: &str, dep_type: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT depends_on_id FROM deps
         WHERE issue_id = ?1 AND dep_type = ?2
         ORDER BY depends_on_id",
    )?;
    let deps = stmt
        .query_map([id, dep_type], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(deps)
}

/// Ids that depend on this issue with the given dep type, sorted.
pub(crate) fn get_dependents(conn: &Connection, id: &str, dep_type: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT issue_id FROM deps
         WHERE depends_on_id = ?1 AND dep_type = ?2
         ORDER BY issue_id",
    )?;
    let dependents = stmt
        .query_map([id, dep_type], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(dependents)
}

pub(crate) fn issue_from_row(row: &Row<'_>) -> rusqlite::Result<Issue> {
    Ok(Issue {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        issue_type: row.get(3)?,
        status: row.get(4)?,
        priority: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        closed_at: row.get(8)?,
    })
}
