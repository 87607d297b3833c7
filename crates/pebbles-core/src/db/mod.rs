//! SQLite cache plumbing.
//!
//! The cache is a disposable projection of the event log: it may be deleted
//! at any time and is rebuilt on next access. Connections use WAL and a
//! busy timeout so a reader racing a rebuild degrades to waiting rather
//! than failing.

pub mod apply;
pub mod cache;
pub mod query;
pub mod schema;

use rusqlite::Connection;
use std::{path::Path, time::Duration};

use crate::error::{Error, Result};

/// Busy timeout applied to every cache connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) the cache database and apply runtime pragmas.
///
/// # Errors
///
/// Returns [`Error::Io`] if the parent directory cannot be created and
/// [`Error::Cache`] if opening or configuring the database fails.
pub fn open_cache(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| Error::io("create cache directory", parent, err))?;
    }

    let conn = Connection::open(path)?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(conn)
}
