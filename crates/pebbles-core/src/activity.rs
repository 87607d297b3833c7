//! Latest-activity timestamps per issue, scanned from the log.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;

use crate::db::{cache, open_cache};
use crate::error::{Error, Result};
use crate::event::EventType;
use crate::log;
use crate::paths;
use crate::renames::resolve_issue_id;

/// Map each canonical issue id to the timestamp of its newest activity
/// event (create, update, comment, status change, close, and the legacy
/// title_updated tag).
///
/// # Errors
///
/// Propagates cache refresh, log read, and resolution failures, and
/// reports an activity event with an unparseable timestamp as invalid.
pub fn list_issue_activity(root: &Path) -> Result<HashMap<String, DateTime<Utc>>> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;

    let mut activity = HashMap::new();
    for event in log::load_events(root)? {
        if !is_activity_event(event.kind) {
            continue;
        }
        let resolved = resolve_issue_id(&conn, &event.issue_id)?;
        let timestamp = cache::parse_timestamp(&event.timestamp).ok_or_else(|| {
            Error::InvalidEvent(format!(
                "parse activity timestamp for {resolved}: {:?}",
                event.timestamp
            ))
        })?;
        activity
            .entry(resolved)
            .and_modify(|last: &mut DateTime<Utc>| {
                if timestamp > *last {
                    *last = timestamp;
                }
            })
            .or_insert(timestamp);
    }
    Ok(activity)
}

/// Whether an event counts toward issue activity.
///
/// Dependency edits and renames are bookkeeping, not activity.
const fn is_activity_event(kind: EventType) -> bool {
    matches!(
        kind,
        EventType::Create
            | EventType::TitleUpdated
            | EventType::Update
            | EventType::Comment
            | EventType::StatusUpdate
            | EventType::Close
    )
}
