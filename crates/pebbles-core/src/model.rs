//! Core data model: issues, statuses, dependency kinds, comments.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::Error;

/// Dependency kind meaning "this issue is blocked by the target".
pub const DEP_TYPE_BLOCKS: &str = "blocks";

/// Dependency kind meaning "the target is this issue's parent".
pub const DEP_TYPE_PARENT_CHILD: &str = "parent_child";

/// Normalize a dependency type, defaulting blank input to `blocks`.
///
/// Unrecognized values pass through untouched: the dependency table keys on
/// the full `(issue, depends_on, dep_type)` triple and tolerates foreign
/// kinds that queries simply never match.
#[must_use]
pub fn normalize_dep_type(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEP_TYPE_BLOCKS.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Issue lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Closed,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            _ => Err(Error::InvalidStatus {
                input: s.to_string(),
            }),
        }
    }
}

impl rusqlite::types::ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl rusqlite::types::FromSql for Status {
    fn column_result(
        value: rusqlite::types::ValueRef<'_>,
    ) -> rusqlite::types::FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| rusqlite::types::FromSqlError::Other(Box::new(err)))
    }
}

/// Current state of an issue, derived from the event log.
///
/// Timestamps are RFC 3339 strings exactly as they appear in events;
/// `closed_at` is empty while the issue is not closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub issue_type: String,
    pub status: Status,
    pub priority: u8,
    pub created_at: String,
    pub updated_at: String,
    pub closed_at: String,
}

/// A comment projected from the log, attributed to its canonical issue id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    pub issue_id: String,
    pub body: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_text() {
        for status in [Status::Open, Status::InProgress, Status::Closed] {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!(matches!(
            "done".parse::<Status>(),
            Err(Error::InvalidStatus { .. })
        ));
        assert!(matches!(
            "in-progress".parse::<Status>(),
            Err(Error::InvalidStatus { .. })
        ));
    }

    #[test]
    fn normalize_dep_type_defaults_to_blocks() {
        assert_eq!(normalize_dep_type(""), "blocks");
        assert_eq!(normalize_dep_type("   "), "blocks");
        assert_eq!(normalize_dep_type("blocks"), "blocks");
        assert_eq!(normalize_dep_type(" parent_child "), "parent_child");
        assert_eq!(normalize_dep_type("relates_to"), "relates_to");
    }
}
