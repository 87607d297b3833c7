//! Event model for the Pebbles append-only log.
//!
//! An [`Event`] is one line of `.pebbles/events.jsonl`:
//!
//! ```json
//! {"type":"create","timestamp":"2024-01-01T00:00:00Z","issue_id":"pb-a1f","payload":{"title":"..."}}
//! ```
//!
//! Events are immutable once written. The `issue_id` is recorded as it was
//! at emission time and may be historical; replay resolves it through the
//! rename table. Payload values are always strings (priority travels as its
//! decimal rendering), and unknown payload keys ride along untouched.

pub mod build;

pub use build::UpdateFields;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Wire tags for the event variants.
///
/// `TitleUpdated` is a legacy tag that old logs may still carry: it parses
/// and counts toward issue activity, but the projection refuses to apply it
/// and no constructor emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Create,
    Rename,
    StatusUpdate,
    Update,
    Close,
    Comment,
    DepAdd,
    DepRm,
    TitleUpdated,
}

impl EventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Rename => "rename",
            Self::StatusUpdate => "status_update",
            Self::Update => "update",
            Self::Close => "close",
            Self::Comment => "comment",
            Self::DepAdd => "dep_add",
            Self::DepRm => "dep_rm",
            Self::TitleUpdated => "title_updated",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single append-only record in the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventType,
    pub timestamp: String,
    pub issue_id: String,
    #[serde(default)]
    pub payload: BTreeMap<String, String>,
}

impl Event {
    /// Fetch a payload value, treating a missing key as empty.
    #[must_use]
    pub fn payload_str(&self, key: &str) -> &str {
        self.payload.get(key).map_or("", String::as_str)
    }
}
