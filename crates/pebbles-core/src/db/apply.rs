//! Event replay: applies a sorted event sequence to the cache tables.
//!
//! Every non-create, non-rename event resolves its issue id (and, for
//! dependency events, the target id) through the rename table before
//! dispatch, so events recorded under historical ids land on the right
//! rows. Handler failures abort the rebuild; the only silent recoveries
//! are duplicate creates, duplicate dep_add edges, and dep_rm on an edge
//! that is not there.

use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::event::{Event, EventType};
use crate::format::parse_priority_or_default;
use crate::model::{normalize_dep_type, Status};
use crate::renames::{ensure_issue_exists, ensure_issue_missing, resolve_issue_id};

/// Replay events into the cache in the order given.
///
/// # Errors
///
/// Returns the first handler failure, leaving the transaction to the
/// caller (the rebuild wraps the whole replay in one).
pub fn apply_events(conn: &Connection, events: &[Event]) -> Result<()> {
    for event in events {
        apply_event(conn, event)?;
    }
    Ok(())
}

/// Apply a single event to the cache.
pub fn apply_event(conn: &Connection, event: &Event) -> Result<()> {
    tracing::debug!(kind = %event.kind, issue_id = %event.issue_id, "apply event");
    match event.kind {
        EventType::Create => apply_create(conn, event),
        EventType::Rename => apply_rename(conn, event),
        EventType::StatusUpdate => apply_status(conn, &resolve_issue(conn, event)?),
        EventType::Update => apply_update(conn, &resolve_issue(conn, event)?),
        EventType::Close => apply_close(conn, &resolve_issue(conn, event)?),
        EventType::Comment => apply_comment(conn, &resolve_issue(conn, event)?),
        EventType::DepAdd => apply_dep_add(conn, &resolve_dep(conn, event)?),
        EventType::DepRm => apply_dep_rm(conn, &resolve_dep(conn, event)?),
        EventType::TitleUpdated => Err(Error::UnknownEventType {
            tag: event.kind.as_str().to_string(),
        }),
    }
}

/// Copy of an event with `issue_id` resolved to canonical form.
fn resolve_issue(conn: &Connection, event: &Event) -> Result<Event> {
    let mut resolved = event.clone();
    resolved.issue_id = resolve_issue_id(conn, &event.issue_id)?;
    Ok(resolved)
}

/// Copy of a dependency event with both endpoints resolved and the
/// dep_type normalized.
fn resolve_dep(conn: &Connection, event: &Event) -> Result<Event> {
    let mut resolved = resolve_issue(conn, event)?;
    let depends_on = event.payload_str("depends_on");
    if depends_on.is_empty() {
        return Err(Error::InvalidEvent(
            "dependency event missing depends_on".to_string(),
        ));
    }
    let dep_type = normalize_dep_type(event.payload_str("dep_type"));
    let depends_on = resolve_issue_id(conn, depends_on)?;
    resolved.payload.insert("depends_on".to_string(), depends_on);
    resolved.payload.insert("dep_type".to_string(), dep_type);
    Ok(resolved)
}

fn apply_create(conn: &Connection, event: &Event) -> Result<()> {
    let title = event.payload_str("title");
    if title.is_empty() {
        return Err(Error::InvalidEvent("create event missing title".to_string()));
    }
    let description = event.payload_str("description");
    let issue_type = match event.payload_str("type") {
        "" => "task",
        other => other,
    };
    let priority = parse_priority_or_default(event.payload_str("priority"));

    // A replayed duplicate create (e.g. from a git merge) is a no-op.
    conn.execute(
        "INSERT OR IGNORE INTO issues
            (id, title, description, issue_type, status, priority, created_at, updated_at, closed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, '')",
        params![
            event.issue_id,
            title,
            description,
            issue_type,
            Status::Open,
            priority,
            event.timestamp,
        ],
    )?;
    Ok(())
}

fn apply_rename(conn: &Connection, event: &Event) -> Result<()> {
    let new_id = event.payload_str("new_id");
    if new_id.is_empty() {
        return Err(Error::InvalidEvent("rename event missing new_id".to_string()));
    }
    let resolved_old = resolve_issue_id(conn, &event.issue_id)?;
    // The target must be a fresh id: not aliased away by an earlier rename
    // and not the issue's current id.
    let resolved_new = resolve_issue_id(conn, new_id)?;
    if resolved_new != new_id || resolved_old == new_id {
        return Err(Error::DuplicateIssue {
            id: new_id.to_string(),
        });
    }
    ensure_issue_exists(conn, &resolved_old)?;
    ensure_issue_missing(conn, new_id)?;

    let updated = conn.execute(
        "UPDATE issues SET id = ?1, updated_at = ?2 WHERE id = ?3",
        params![new_id, event.timestamp, resolved_old],
    )?;
    if updated == 0 {
        return Err(Error::MissingIssue { id: resolved_old });
    }
    conn.execute(
        "UPDATE deps SET issue_id = ?1 WHERE issue_id = ?2",
        params![new_id, resolved_old],
    )?;
    conn.execute(
        "UPDATE deps SET depends_on_id = ?1 WHERE depends_on_id = ?2",
        params![new_id, resolved_old],
    )?;
    conn.execute(
        "INSERT OR REPLACE INTO renames (old_id, new_id) VALUES (?1, ?2)",
        params![resolved_old, new_id],
    )?;
    Ok(())
}

fn apply_status(conn: &Connection, event: &Event) -> Result<()> {
    let raw = event.payload_str("status");
    if raw.is_empty() {
        return Err(Error::InvalidEvent("status event missing status".to_string()));
    }
    let status: Status = raw.parse()?;
    // Closing via status_update leaves closed_at to the close handler;
    // reopening always clears it.
    let updated = if status == Status::Closed {
        conn.execute(
            "UPDATE issues SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status, event.timestamp, event.issue_id],
        )?
    } else {
        conn.execute(
            "UPDATE issues SET status = ?1, updated_at = ?2, closed_at = '' WHERE id = ?3",
            params![status, event.timestamp, event.issue_id],
        )?
    };
    if updated == 0 {
        return Err(Error::MissingIssue {
            id: event.issue_id.clone(),
        });
    }
    Ok(())
}

fn apply_update(conn: &Connection, event: &Event) -> Result<()> {
    let mut assignments = Vec::new();
    let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    if let Some(issue_type) = event.payload.get("type") {
        assignments.push("issue_type = ?");
        args.push(Box::new(issue_type.clone()));
    }
    if let Some(description) = event.payload.get("description") {
        assignments.push("description = ?");
        args.push(Box::new(description.clone()));
    }
    if let Some(priority) = event.payload.get("priority") {
        assignments.push("priority = ?");
        args.push(Box::new(parse_priority_or_default(priority)));
    }
    if assignments.is_empty() {
        return Err(Error::InvalidEvent("update event missing fields".to_string()));
    }
    assignments.push("updated_at = ?");
    args.push(Box::new(event.timestamp.clone()));
    args.push(Box::new(event.issue_id.clone()));

    let sql = format!(
        "UPDATE issues SET {} WHERE id = ?",
        assignments.join(", ")
    );
    let params: Vec<&dyn rusqlite::types::ToSql> = args.iter().map(AsRef::as_ref).collect();
    let updated = conn.execute(&sql, params.as_slice())?;
    if updated == 0 {
        return Err(Error::MissingIssue {
            id: event.issue_id.clone(),
        });
    }
    Ok(())
}

fn apply_close(conn: &Connection, event: &Event) -> Result<()> {
    let updated = conn.execute(
        "UPDATE issues SET status = ?1, updated_at = ?2, closed_at = ?2 WHERE id = ?3",
        params![Status::Closed, event.timestamp, event.issue_id],
    )?;
    if updated == 0 {
        return Err(Error::MissingIssue {
            id: event.issue_id.clone(),
        });
    }
    Ok(())
}

fn apply_comment(conn: &Connection, event: &Event) -> Result<()> {
    if event.payload_str("body").trim().is_empty() {
        return Err(Error::InvalidEvent("comment event missing body".to_string()));
    }
    // Comments live in the log, not the cache, but must target a live issue.
    ensure_issue_exists(conn, &event.issue_id)
}

fn apply_dep_add(conn: &Connection, event: &Event) -> Result<()> {
    let depends_on = event.payload_str("depends_on");
    ensure_issue_exists(conn, &event.issue_id)?;
    ensure_issue_exists(conn, depends_on)?;
    conn.execute(
        "INSERT OR IGNORE INTO deps (issue_id, depends_on_id, dep_type) VALUES (?1, ?2, ?3)",
        params![event.issue_id, depends_on, event.payload_str("dep_type")],
    )?;
    Ok(())
}

fn apply_dep_rm(conn: &Connection, event: &Event) -> Result<()> {
    let depends_on = event.payload_str("depends_on");
    ensure_issue_exists(conn, &event.issue_id)?;
    ensure_issue_exists(conn, depends_on)?;
    conn.execute(
        "DELETE FROM deps WHERE issue_id = ?1 AND depends_on_id = ?2 AND dep_type = ?3",
        params![event.issue_id, depends_on, event.payload_str("dep_type")],
    )?;
    Ok(())
}
