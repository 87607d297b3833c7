//! Append-only reader/writer for the JSONL event log.
//!
//! Guarantees offered here are deliberately thin: `append_event` writes one
//! full line per event and nothing else, and the readers skip blank lines
//! while failing loudly on any non-blank line that does not parse. File
//! order carries no meaning beyond the replay tie-break; consumers re-sort
//! by timestamp.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::event::Event;
use crate::paths;

/// An event paired with its 1-based line number in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLogEntry {
    pub line: usize,
    pub event: Event,
}

/// Append a single event to the log as one JSON line.
///
/// The log file must already exist (project initialization creates it).
///
/// # Errors
///
/// Returns [`Error::Io`] when the log cannot be opened or written.
pub fn append_event(root: &Path, event: &Event) -> Result<()> {
    let path = paths::events_path(root);
    let mut file = OpenOptions::new()
        .append(true)
        .open(&path)
        .map_err(|err| Error::io("open events log", &path, err))?;
    let mut line = serde_json::to_string(event).map_err(|err| {
        Error::InvalidEvent(format!("serialize event: {err}"))
    })?;
    line.push('\n');
    file.write_all(line.as_bytes())
        .map_err(|err| Error::io("append event", &path, err))
}

/// Read every event from the log in file order.
///
/// # Errors
///
/// Returns [`Error::Io`] when the log is unreadable and
/// [`Error::MalformedEvent`] for the first non-blank line that fails to
/// parse.
pub fn load_events(root: &Path) -> Result<Vec<Event>> {
    Ok(load_event_log(root)?
        .into_iter()
        .map(|entry| entry.event)
        .collect())
}

/// Read every event with its line number, for log views and diagnostics.
///
/// # Errors
///
/// Same as [`load_events`].
pub fn load_event_log(root: &Path) -> Result<Vec<EventLogEntry>> {
    let path = paths::events_path(root);
    let content =
        std::fs::read_to_string(&path).map_err(|err| Error::io("open events log", &path, err))?;

    let mut entries = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event: Event = serde_json::from_str(trimmed)
            .map_err(|source| Error::MalformedEvent { line, source })?;
        entries.push(EventLogEntry { line, event });
    }
    Ok(entries)
}
