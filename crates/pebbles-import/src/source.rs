//! Beads export records and JSONL loading.
//!
//! A Beads export is current-state, not event-sourced: one JSON object per
//! issue under `<source>/.beads/issues.jsonl`, embedding its dependencies
//! and comments. Every field except `id` is optional in practice, so the
//! records default aggressively and the planner normalizes afterwards.

use serde::Deserialize;
use std::path::Path;

use crate::error::{ImportError, Result};

/// One issue record from the Beads export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BeadsIssue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: Option<i64>,
    pub issue_type: String,
    pub created_at: String,
    pub updated_at: String,
    pub closed_at: String,
    pub close_reason: String,
    pub deleted_at: String,
    pub deleted_by: String,
    pub delete_reason: String,
    pub dependencies: Vec<BeadsDependency>,
    pub comments: Vec<BeadsComment>,
}

/// A dependency edge embedded in a Beads issue record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BeadsDependency {
    pub issue_id: String,
    pub depends_on_id: String,
    #[serde(rename = "type")]
    pub dep_type: String,
    pub created_at: String,
}

/// A comment embedded in a Beads issue record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BeadsComment {
    pub author: String,
    pub text: String,
    pub created_at: String,
}

/// Load all issue records from a Beads export.
///
/// Records without an id are skipped with a warning; blank lines are
/// ignored; any other malformed line is a hard error.
///
/// # Errors
///
/// Returns [`ImportError::Io`] when the export is unreadable,
/// [`ImportError::MalformedIssue`] on a bad line, and
/// [`ImportError::NoIssues`] when nothing usable remains.
pub fn load_beads_issues(source_root: &Path) -> Result<(Vec<BeadsIssue>, Vec<String>)> {
    let path = source_root.join(".beads").join("issues.jsonl");
    let content = std::fs::read_to_string(&path).map_err(|source| ImportError::Io {
        path: path.clone(),
        source,
    })?;

    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let issue: BeadsIssue = serde_json::from_str(trimmed)
            .map_err(|source| ImportError::MalformedIssue { line, source })?;
        if issue.id.trim().is_empty() {
            warnings.push(format!("line {line} missing issue id"));
            continue;
        }
        issues.push(issue);
    }
    if issues.is_empty() {
        return Err(ImportError::NoIssues);
    }
    Ok((issues, warnings))
}

/// The prefix of a Beads id: everything before the first `-`.
#[must_use]
pub fn prefix_from_issue_id(issue_id: &str) -> Option<&str> {
    match issue_id.split_once('-') {
        Some((prefix, _)) if !prefix.is_empty() => Some(prefix),
        _ => None,
    }
}
