//! Error taxonomy for the Pebbles engine.
//!
//! Every fallible core operation returns [`Error`]. The engine surfaces
//! failures to the caller unchanged; the only silent recoveries are the
//! three documented idempotences (duplicate create, duplicate dep_add,
//! dep_rm on an absent edge).

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the Pebbles engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem failure, annotated with the path that was touched.
    #[error("{context} {}: {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Embedded-store failure, surfaced unchanged.
    #[error("cache: {0}")]
    Cache(#[from] rusqlite::Error),

    /// A non-blank log line failed to parse as an event.
    #[error("parse event line {line}: {source}")]
    MalformedEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// An event payload is missing a required key or carries an unusable
    /// value, detected while applying the event.
    #[error("{0}")]
    InvalidEvent(String),

    /// An event references an issue id absent from the issue table.
    #[error("missing issue: {id}")]
    MissingIssue { id: String },

    /// A create or rename target collides with an existing issue id.
    #[error("issue already exists: {id}")]
    DuplicateIssue { id: String },

    /// Rename resolution revisited an id it had already followed.
    #[error("rename cycle detected for {id}")]
    RenameCycle { id: String },

    /// An empty or whitespace-only issue id was supplied.
    #[error("issue id is required")]
    MissingIssueId,

    /// A priority outside `P0`..`P4` / `0`..`4` was supplied.
    #[error("invalid priority: {input}")]
    InvalidPriority { input: String },

    /// A status outside open/in_progress/closed was supplied.
    #[error("invalid status: {input}")]
    InvalidStatus { input: String },

    /// The projection met an event tag it cannot apply.
    #[error("unknown event type: {tag}")]
    UnknownEventType { tag: String },

    /// The id generator exhausted every suffix length of the hash.
    ///
    /// Practically unreachable: it would require 2^256 live issues.
    #[error("issue id space exhausted for prefix {prefix}")]
    IdSpaceExhausted { prefix: String },

    /// The config file is present but unusable.
    #[error("config: {reason}")]
    Config { reason: String },
}

impl Error {
    /// Wrap an I/O error with the operation and path it occurred on.
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}
