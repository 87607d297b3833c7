//! Cache lifecycle: staleness detection and full rebuild from the log.
//!
//! The cache is never the source of truth. `ensure_cache` rebuilds when the
//! log is newer than the cache file, the cache is missing, or the schema
//! predates the current build; deleting `.pebbles/pebbles.db` by hand is
//! always safe.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::path::Path;

use crate::db::{apply, open_cache, schema};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::log;
use crate::paths;

/// Rebuild the cache if it is stale, otherwise do nothing.
///
/// # Errors
///
/// Propagates staleness-check and rebuild failures.
pub fn ensure_cache(root: &Path) -> Result<()> {
    if needs_rebuild(root)? {
        rebuild_cache(root)
    } else {
        Ok(())
    }
}

/// Recreate the cache from scratch by replaying the full event log.
///
/// The drop/create/replay runs in one transaction, so a failed rebuild
/// never leaves half-applied state behind.
///
/// # Errors
///
/// Propagates log read, parse, and projection failures.
pub fn rebuild_cache(root: &Path) -> Result<()> {
    let mut events = log::load_events(root)?;
    sort_events(&mut events);

    let conn = open_cache(&paths::db_path(root))?;
    conn.execute_batch("BEGIN IMMEDIATE")?;
    schema::reset_schema(&conn)?;
    schema::ensure_schema(&conn)?;
    apply::apply_events(&conn, &events)?;
    conn.execute_batch("COMMIT")?;

    let issue_count: i64 = conn.query_row("SELECT COUNT(*) FROM issues", [], |row| row.get(0))?;
    tracing::info!(
        event_count = events.len(),
        issue_count,
        "cache rebuild complete"
    );
    Ok(())
}

/// Order events for replay: parsed timestamp ascending, then original file
/// index. Events with unparseable timestamps sort after all parseable ones
/// and keep file order among themselves, so the total order is a pure
/// function of the log contents.
pub fn sort_events(events: &mut Vec<Event>) {
    let mut decorated: Vec<(Option<DateTime<Utc>>, usize, Event)> = events
        .drain(..)
        .enumerate()
        .map(|(index, event)| (parse_timestamp(&event.timestamp), index, event))
        .collect();
    decorated.sort_by(|a, b| match (&a.0, &b.0) {
        (Some(ta), Some(tb)) => ta.cmp(tb).then(a.1.cmp(&b.1)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.1.cmp(&b.1),
    });
    events.extend(decorated.into_iter().map(|(_, _, event)| event));
}

/// Parse an RFC 3339 event timestamp, normalizing to UTC.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn needs_rebuild(root: &Path) -> Result<bool> {
    let events_path = paths::events_path(root);
    let db_path = paths::db_path(root);

    let events_meta = std::fs::metadata(&events_path)
        .map_err(|err| Error::io("stat events log", &events_path, err))?;
    let db_meta = match std::fs::metadata(&db_path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(Error::io("stat cache", &db_path, err)),
    };

    let events_mtime = events_meta
        .modified()
        .map_err(|err| Error::io("stat events log", &events_path, err))?;
    let db_mtime = db_meta
        .modified()
        .map_err(|err| Error::io("stat cache", &db_path, err))?;
    if events_mtime > db_mtime {
        return Ok(true);
    }

    // Forward compatibility: a cache written before a column was added is
    // rebuilt rather than failing mid-query.
    let conn = open_cache(&db_path)?;
    Ok(!schema::schema_is_current(&conn)?)
}
