//! Importer failure modes.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ImportError>;

/// Everything that can go wrong while planning or applying an import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// No source root was supplied.
    #[error("source root is required")]
    MissingSourceRoot,

    /// The Beads export could not be read.
    #[error("open beads issues {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-blank export line failed to parse.
    #[error("parse beads issue line {line}: {source}")]
    MalformedIssue {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The export contained no usable issue records.
    #[error("no beads issues found")]
    NoIssues,

    /// Every record was filtered out before planning.
    #[error("no issues to import")]
    NothingToImport,

    /// No prefix was supplied and none could be inferred from the ids.
    #[error("unable to detect prefix; provide one explicitly")]
    MissingPrefix,

    /// The imported ids disagree on their prefix.
    #[error("multiple prefixes detected: {}", candidates.join(", "))]
    MultiplePrefixes { candidates: Vec<String> },

    /// A core engine failure while applying the plan.
    #[error(transparent)]
    Core(#[from] pebbles_core::Error),
}
