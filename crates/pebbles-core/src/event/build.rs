//! Constructors for well-formed events.
//!
//! Callers validate inputs up front (status and priority grammar, non-empty
//! bodies), so anything these helpers emit will replay cleanly.

use std::collections::BTreeMap;

use super::{Event, EventType};
use crate::error::{Error, Result};
use crate::model::{normalize_dep_type, Status};

/// Build a `create` event.
#[must_use]
pub fn new_create_event(
    issue_id: &str,
    title: &str,
    description: &str,
    issue_type: &str,
    timestamp: &str,
    priority: u8,
) -> Event {
    let mut payload = BTreeMap::new();
    payload.insert("title".to_string(), title.to_string());
    payload.insert("type".to_string(), issue_type.to_string());
    payload.insert("priority".to_string(), priority.to_string());
    payload.insert("description".to_string(), description.to_string());
    Event {
        kind: EventType::Create,
        timestamp: timestamp.to_string(),
        issue_id: issue_id.to_string(),
        payload,
    }
}

/// Build a `rename` event mapping the issue's current id to `new_id`.
#[must_use]
pub fn new_rename_event(issue_id: &str, new_id: &str, timestamp: &str) -> Event {
    let mut payload = BTreeMap::new();
    payload.insert("new_id".to_string(), new_id.to_string());
    Event {
        kind: EventType::Rename,
        timestamp: timestamp.to_string(),
        issue_id: issue_id.to_string(),
        payload,
    }
}

/// Build a `status_update` event.
#[must_use]
pub fn new_status_event(issue_id: &str, status: Status, timestamp: &str) -> Event {
    let mut payload = BTreeMap::new();
    payload.insert("status".to_string(), status.as_str().to_string());
    Event {
        kind: EventType::StatusUpdate,
        timestamp: timestamp.to_string(),
        issue_id: issue_id.to_string(),
        payload,
    }
}

/// Optional field replacements carried by an `update` event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateFields {
    pub issue_type: Option<String>,
    pub description: Option<String>,
    pub priority: Option<u8>,
}

impl UpdateFields {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issue_type.is_none() && self.description.is_none() && self.priority.is_none()
    }
}

/// Build an `update` event replacing the provided fields.
///
/// # Errors
///
/// Returns [`Error::InvalidEvent`] when no field is provided.
pub fn new_update_event(issue_id: &str, timestamp: &str, fields: UpdateFields) -> Result<Event> {
    if fields.is_empty() {
        return Err(Error::InvalidEvent(
            "update event missing fields".to_string(),
        ));
    }
    let mut payload = BTreeMap::new();
    if let Some(issue_type) = fields.issue_type {
        payload.insert("type".to_string(), issue_type);
    }
    if let Some(description) = fields.description {
        payload.insert("description".to_string(), description);
    }
    if let Some(priority) = fields.priority {
        payload.insert("priority".to_string(), priority.to_string());
    }
    Ok(Event {
        kind: EventType::Update,
        timestamp: timestamp.to_string(),
        issue_id: issue_id.to_string(),
        payload,
    })
}

/// Build a `close` event.
#[must_use]
pub fn new_close_event(issue_id: &str, timestamp: &str) -> Event {
    Event {
        kind: EventType::Close,
        timestamp: timestamp.to_string(),
        issue_id: issue_id.to_string(),
        payload: BTreeMap::new(),
    }
}

/// Build a `comment` event.
///
/// # Errors
///
/// Returns [`Error::InvalidEvent`] when the body is blank.
pub fn new_comment_event(issue_id: &str, body: &str, timestamp: &str) -> Result<Event> {
    if body.trim().is_empty() {
        return Err(Error::InvalidEvent("comment event missing body".to_string()));
    }
    let mut payload = BTreeMap::new();
    payload.insert("body".to_string(), body.to_string());
    Ok(Event {
        kind: EventType::Comment,
        timestamp: timestamp.to_string(),
        issue_id: issue_id.to_string(),
        payload,
    })
}

/// Build a `dep_add` event; a blank `dep_type` defaults to `blocks`.
#[must_use]
pub fn new_dep_add_event(issue_id: &str, depends_on: &str, dep_type: &str, timestamp: &str) -> Event {
    dep_event(EventType::DepAdd, issue_id, depends_on, dep_type, timestamp)
}

/// Build a `dep_rm` event; a blank `dep_type` defaults to `blocks`.
#[must_use]
pub fn new_dep_rm_event(issue_id: &str, depends_on: &str, dep_type: &str, timestamp: &str) -> Event {
    dep_event(EventType::DepRm, issue_id, depends_on, dep_type, timestamp)
}

fn dep_event(
    kind: EventType,
    issue_id: &str,
    depends_on: &str,
    dep_type: &str,
    timestamp: &str,
) -> Event {
    let mut payload = BTreeMap::new();
    payload.insert("depends_on".to_string(), depends_on.to_string());
    payload.insert("dep_type".to_string(), normalize_dep_type(dep_type));
    Event {
        kind,
        timestamp: timestamp.to_string(),
        issue_id: issue_id.to_string(),
        payload,
    }
}
