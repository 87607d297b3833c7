//! Cache schema: three tables derived entirely from the event log.
//!
//! - `issues` — latest aggregate fields per issue, keyed by canonical id
//! - `deps` — directed dependency edges, keyed by the full triple
//! - `renames` — materialized rename mappings for id resolution

use rusqlite::Connection;

use crate::error::Result;

/// DDL for a fresh cache schema.
pub const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS issues (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    issue_type TEXT NOT NULL,
    status TEXT NOT NULL,
    priority INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    closed_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS deps (
    issue_id TEXT NOT NULL,
    depends_on_id TEXT NOT NULL,
    dep_type TEXT NOT NULL,
    PRIMARY KEY (issue_id, depends_on_id, dep_type)
);

CREATE TABLE IF NOT EXISTS renames (
    old_id TEXT PRIMARY KEY,
    new_id TEXT NOT NULL
);
";

/// DDL to drop every cache table before a rebuild.
pub const RESET_SQL: &str = "\
DROP TABLE IF EXISTS deps;
DROP TABLE IF EXISTS renames;
DROP TABLE IF EXISTS issues;
";

/// Columns the engine expects on the `issues` table.
///
/// A cache written by an older build that lacks one of these triggers a
/// rebuild instead of a query error.
pub const EXPECTED_ISSUE_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "issue_type",
    "status",
    "priority",
    "created_at",
    "updated_at",
    "closed_at",
];

/// Drop all cache tables.
///
/// # Errors
///
/// Returns a cache error if the DDL fails.
pub fn reset_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(RESET_SQL)?;
    Ok(())
}

/// Create the cache tables if they do not exist.
///
/// # Errors
///
/// Returns a cache error if the DDL fails.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Report whether the on-disk `issues` table carries every expected column.
///
/// A missing table counts as drift (the caller rebuilds either way).
///
/// # Errors
///
/// Returns a cache error if the pragma query fails.
pub fn schema_is_current(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info(issues)")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(EXPECTED_ISSUE_COLUMNS
        .iter()
        .all(|expected| columns.iter().any(|col| col == expected)))
}
