//! Comment listing, projected from the log on demand.
//!
//! Comments are never materialized in the cache; the log is the record.
//! Each comment event's issue id resolves through the rename table, so
//! comments written before a rename still land on the issue.

use rusqlite::Connection;
use std::path::Path;

use crate::db::{cache, open_cache};
use crate::error::{Error, Result};
use crate::event::{Event, EventType};
use crate::log;
use crate::model::IssueComment;
use crate::paths;
use crate::renames::resolve_issue_id;

/// All comments for an issue, in append order.
///
/// # Errors
///
/// Propagates cache refresh, log read, and resolution failures, and
/// reports a comment event with a blank body as invalid.
pub fn list_issue_comments(root: &Path, id: &str) -> Result<Vec<IssueComment>> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;
    let resolved = resolve_issue_id(&conn, id)?;

    let mut comments = Vec::new();
    for event in log::load_events(root)? {
        if event.kind != EventType::Comment {
            continue;
        }
        if let Some(comment) = comment_from_event(&conn, &resolved, &event)? {
            comments.push(comment);
        }
    }
    Ok(comments)
}

/// Build a comment from an event when it targets the resolved issue.
fn comment_from_event(
    conn: &Connection,
    resolved: &str,
    event: &Event,
) -> Result<Option<IssueComment>> {
    let event_issue = resolve_issue_id(conn, &event.issue_id)?;
    if event_issue != resolved {
        return Ok(None);
    }
    let body = event.payload_str("body");
    if body.is_empty() {
        return Err(Error::InvalidEvent(format!(
            "comment event missing body for {event_issue}"
        )));
    }
    Ok(Some(IssueComment {
        issue_id: event_issue,
        body: body.to_string(),
        timestamp: event.timestamp.clone(),
    }))
}
