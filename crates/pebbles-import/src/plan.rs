//! Plan and apply a Beads import.
//!
//! Planning is pure: it reads the export and produces an event sequence
//! whose projection recreates the foreign tracker's current state. Events
//! are emitted in three buckets so replay never references an issue before
//! its create and never closes an issue before its comments:
//!
//! 1. every `create`
//! 2. every `dep_add` and `comment`
//! 3. every terminal `status_update` / `close`
//!
//! Each bucket sorts by (timestamp, event rank, issue id). Foreign ids are
//! preserved verbatim — the importer never allocates or renames ids, so a
//! child imported as `foo-abc.2` keeps that exact id.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use pebbles_core::{
    new_close_event, new_comment_event, new_create_event, new_dep_add_event, new_status_event,
    rebuild_cache, Event, Status, DEP_TYPE_BLOCKS, DEP_TYPE_PARENT_CHILD,
};

use crate::error::{ImportError, Result};
use crate::source::{load_beads_issues, prefix_from_issue_id, BeadsIssue};

const IMPORT_PRIORITY_DEFAULT: u8 = 2;

// In-bucket tie-break rank at equal timestamps.
const ORDER_CREATE: u8 = 0;
const ORDER_DEP: u8 = 1;
const ORDER_COMMENT: u8 = 2;
const ORDER_STATUS: u8 = 3;
const ORDER_CLOSE: u8 = 4;

/// Controls how a Beads export is translated.
#[derive(Debug, Clone, Default)]
pub struct BeadsImportOptions {
    /// Root of the foreign checkout holding `.beads/issues.jsonl`.
    pub source_root: PathBuf,
    /// Prefix override; inferred from the imported ids when `None`.
    pub prefix: Option<String>,
    /// Translate tombstoned issues into closed ones instead of skipping.
    pub include_tombstones: bool,
    /// Injected clock for the last-resort timestamp fallback.
    pub now: Option<DateTime<Utc>>,
}

/// Counters and warnings from a plan or apply run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeadsImportResult {
    pub source_root: String,
    pub prefix: String,
    pub issues_total: usize,
    pub issues_imported: usize,
    pub issues_skipped: usize,
    pub tombstones_skipped: usize,
    pub events_planned: usize,
    pub events_written: usize,
    pub warnings: Vec<String>,
}

/// The events required to recreate the Beads issues, plus the summary.
#[derive(Debug, Clone)]
pub struct BeadsImportPlan {
    pub events: Vec<Event>,
    pub result: BeadsImportResult,
}

/// Foreign status after normalization; tombstone has no core equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BeadsStatus {
    Open,
    InProgress,
    Closed,
    Tombstone,
}

struct ImportEvent {
    event: Event,
    sort_time: DateTime<Utc>,
    order: u8,
}

/// Build an import plan from a Beads export.
///
/// # Errors
///
/// Fails when the export is unreadable or empty, when no prefix can be
/// determined, or when filtering leaves nothing to import.
pub fn plan_beads_import(options: BeadsImportOptions) -> Result<BeadsImportPlan> {
    if options.source_root.as_os_str().is_empty() {
        return Err(ImportError::MissingSourceRoot);
    }
    let now = options.now.unwrap_or_else(Utc::now);

    let (issues, mut warnings) = load_beads_issues(&options.source_root)?;
    let prefix = resolve_prefix(&issues, options.prefix.as_deref(), &mut warnings)?;
    let mut plan = build_plan(issues, options.include_tombstones, now, &mut warnings)?;

    plan.result.source_root = options.source_root.display().to_string();
    plan.result.prefix = prefix;
    plan.result.warnings = warnings;
    tracing::debug!(
        issues_imported = plan.result.issues_imported,
        issues_skipped = plan.result.issues_skipped,
        events_planned = plan.result.events_planned,
        warning_count = plan.result.warnings.len(),
        "beads import planned"
    );
    Ok(plan)
}

/// Append every planned event to the project log and rebuild the cache.
///
/// The caller initializes the project (typically with the plan's prefix)
/// before applying.
///
/// # Errors
///
/// Propagates append and rebuild failures from the core engine.
pub fn apply_beads_import_plan(root: &Path, plan: BeadsImportPlan) -> Result<BeadsImportResult> {
    for event in &plan.events {
        pebbles_core::append_event(root, event)?;
    }
    rebuild_cache(root)?;

    let mut result = plan.result;
    result.events_written = plan.events.len();
    tracing::info!(
        events_written = result.events_written,
        prefix = %result.prefix,
        "beads import applied"
    );
    Ok(result)
}

fn resolve_prefix(
    issues: &[BeadsIssue],
    override_prefix: Option<&str>,
    warnings: &mut Vec<String>,
) -> Result<String> {
    if let Some(prefix) = override_prefix.map(str::trim).filter(|p| !p.is_empty()) {
        return Ok(prefix.to_string());
    }
    let mut candidates = std::collections::BTreeSet::new();
    for issue in issues {
        match prefix_from_issue_id(&issue.id) {
            Some(prefix) => {
                candidates.insert(prefix.to_string());
            }
            None => warnings.push(format!("issue {} missing prefix separator", issue.id)),
        }
    }
    let mut candidates: Vec<String> = candidates.into_iter().collect();
    match candidates.len() {
        0 => Err(ImportError::MissingPrefix),
        1 => Ok(candidates.remove(0)),
        _ => Err(ImportError::MultiplePrefixes { candidates }),
    }
}

fn build_plan(
    issues: Vec<BeadsIssue>,
    include_tombstones: bool,
    now: DateTime<Utc>,
    warnings: &mut Vec<String>,
) -> Result<BeadsImportPlan> {
    let mut result = BeadsImportResult {
        issues_total: issues.len(),
        ..BeadsImportResult::default()
    };

    // Filter pass: tombstones, duplicates, and titleless records drop out
    // before any event is planned.
    let mut imported_ids: HashSet<String> = HashSet::new();
    let mut imported: Vec<(BeadsIssue, BeadsStatus)> = Vec::new();
    for mut issue in issues {
        let issue_id = issue.id.trim().to_string();
        if issue_id.is_empty() {
            result.issues_skipped += 1;
            continue;
        }
        if imported_ids.contains(&issue_id) {
            warnings.push(format!("duplicate issue id {issue_id}"));
            result.issues_skipped += 1;
            continue;
        }
        let status = normalize_status(&issue.status, &issue_id, warnings);
        if status == BeadsStatus::Tombstone && !include_tombstones {
            result.tombstones_skipped += 1;
            result.issues_skipped += 1;
            continue;
        }
        if issue.title.trim().is_empty() {
            warnings.push(format!("issue {issue_id} missing title"));
            result.issues_skipped += 1;
            continue;
        }
        issue.id = issue_id.clone();
        imported_ids.insert(issue_id);
        imported.push((issue, status));
    }
    result.issues_imported = imported.len();
    if result.issues_imported == 0 {
        return Err(ImportError::NothingToImport);
    }

    let mut create_events = Vec::new();
    let mut dep_and_comment_events = Vec::new();
    let mut status_events = Vec::new();
    for (issue, status) in &imported {
        create_events.push(build_create_event(issue, now, warnings));
        dep_and_comment_events.extend(build_dependency_events(issue, &imported_ids, now, warnings));
        dep_and_comment_events.extend(build_comment_events(issue, now, warnings)?);
        status_events.extend(build_status_events(issue, *status, now, warnings));
    }

    sort_import_events(&mut create_events);
    sort_import_events(&mut dep_and_comment_events);
    sort_import_events(&mut status_events);

    let events: Vec<Event> = create_events
        .into_iter()
        .chain(dep_and_comment_events)
        .chain(status_events)
        .map(|planned| planned.event)
        .collect();
    result.events_planned = events.len();
    Ok(BeadsImportPlan { events, result })
}

fn build_create_event(
    issue: &BeadsIssue,
    now: DateTime<Utc>,
    warnings: &mut Vec<String>,
) -> ImportEvent {
    let (created_time, created_stamp) = resolve_timestamp(
        &[&issue.created_at, &issue.updated_at],
        now,
        &format!("issue {} create", issue.id),
        warnings,
    );
    let priority = normalize_priority(issue.priority, &issue.id, warnings);
    let issue_type = match issue.issue_type.trim() {
        "" => "task",
        other => other,
    };
    ImportEvent {
        event: new_create_event(
            &issue.id,
            &issue.title,
            &issue.description,
            issue_type,
            &created_stamp,
            priority,
        ),
        sort_time: created_time,
        order: ORDER_CREATE,
    }
}

fn build_dependency_events(
    issue: &BeadsIssue,
    imported_ids: &HashSet<String>,
    now: DateTime<Utc>,
    warnings: &mut Vec<String>,
) -> Vec<ImportEvent> {
    let mut events = Vec::new();
    for dep in &issue.dependencies {
        // Edges usually repeat the owning issue id; tolerate records that
        // leave it blank.
        let issue_id = match dep.issue_id.trim() {
            "" => issue.id.as_str(),
            other => other,
        };
        if issue_id != issue.id {
            warnings.push(format!(
                "dependency issue id mismatch: {} vs {issue_id}",
                issue.id
            ));
        }
        let depends_on = dep.depends_on_id.trim();
        if depends_on.is_empty() {
            warnings.push(format!("dependency on issue {issue_id} missing depends_on"));
            continue;
        }
        let dep_type = dep.dep_type.trim();
        if dep_type != DEP_TYPE_BLOCKS && dep_type != DEP_TYPE_PARENT_CHILD {
            warnings.push(format!(
                "issue {issue_id} unknown dependency type {dep_type}"
            ));
            continue;
        }
        if !imported_ids.contains(issue_id) || !imported_ids.contains(depends_on) {
            warnings.push(format!(
                "dependency {issue_id} -> {depends_on} skipped (missing issue)"
            ));
            continue;
        }
        let (dep_time, dep_stamp) = resolve_timestamp(
            &[&dep.created_at, &issue.updated_at, &issue.created_at],
            now,
            &format!("dependency {issue_id} -> {depends_on}"),
            warnings,
        );
        events.push(ImportEvent {
            event: new_dep_add_event(issue_id, depends_on, dep_type, &dep_stamp),
            sort_time: dep_time,
            order: ORDER_DEP,
        });
    }
    events
}

fn build_comment_events(
    issue: &BeadsIssue,
    now: DateTime<Utc>,
    warnings: &mut Vec<String>,
) -> Result<Vec<ImportEvent>> {
    let mut events = Vec::new();
    for comment in &issue.comments {
        let text = comment.text.trim();
        if text.is_empty() {
            warnings.push(format!("issue {} has empty comment", issue.id));
            continue;
        }
        // Pebbles comments carry no author field; fold it into the body.
        let body = format_comment_body(&comment.author, text);
        let (comment_time, comment_stamp) = resolve_timestamp(
            &[&comment.created_at, &issue.updated_at, &issue.created_at],
            now,
            &format!("comment on {}", issue.id),
            warnings,
        );
        events.push(ImportEvent {
            event: new_comment_event(&issue.id, &body, &comment_stamp)?,
            sort_time: comment_time,
            order: ORDER_COMMENT,
        });
    }
    if let Some(reason) = build_reason_comment(issue) {
        let (reason_time, reason_stamp) = resolve_timestamp(
            &[
                &issue.closed_at,
                &issue.deleted_at,
                &issue.updated_at,
                &issue.created_at,
            ],
            now,
            &format!("close reason on {}", issue.id),
            warnings,
        );
        events.push(ImportEvent {
            event: new_comment_event(&issue.id, &reason, &reason_stamp)?,
            sort_time: reason_time,
            order: ORDER_COMMENT,
        });
    }
    Ok(events)
}

fn build_status_events(
    issue: &BeadsIssue,
    status: BeadsStatus,
    now: DateTime<Utc>,
    warnings: &mut Vec<String>,
) -> Vec<ImportEvent> {
    match status {
        // Open needs no extra event; create already projects to open.
        BeadsStatus::Open => Vec::new(),
        BeadsStatus::InProgress => {
            let (time, stamp) = resolve_timestamp(
                &[&issue.updated_at, &issue.created_at],
                now,
                &format!("status update on {}", issue.id),
                warnings,
            );
            vec![ImportEvent {
                event: new_status_event(&issue.id, Status::InProgress, &stamp),
                sort_time: time,
                order: ORDER_STATUS,
            }]
        }
        BeadsStatus::Closed | BeadsStatus::Tombstone => {
            let (time, stamp) = resolve_timestamp(
                &[
                    &issue.closed_at,
                    &issue.deleted_at,
                    &issue.updated_at,
                    &issue.created_at,
                ],
                now,
                &format!("close issue {}", issue.id),
                warnings,
            );
            vec![ImportEvent {
                event: new_close_event(&issue.id, &stamp),
                sort_time: time,
                order: ORDER_CLOSE,
            }]
        }
    }
}

fn normalize_status(status: &str, issue_id: &str, warnings: &mut Vec<String>) -> BeadsStatus {
    let normalized = status.trim().to_ascii_lowercase().replace('-', "_");
    match normalized.as_str() {
        "open" => BeadsStatus::Open,
        "in_progress" => BeadsStatus::InProgress,
        "closed" => BeadsStatus::Closed,
        "tombstone" => BeadsStatus::Tombstone,
        _ => {
            warnings.push(format!(
                "issue {issue_id} unknown status {status:?}; defaulting to open"
            ));
            BeadsStatus::Open
        }
    }
}

fn normalize_priority(priority: Option<i64>, issue_id: &str, warnings: &mut Vec<String>) -> u8 {
    match priority {
        None => {
            warnings.push(format!("issue {issue_id} missing priority; using P2"));
            IMPORT_PRIORITY_DEFAULT
        }
        Some(value) if value < 0 => {
            warnings.push(format!("issue {issue_id} priority {value} below P0"));
            0
        }
        Some(value) if value > 4 => {
            warnings.push(format!("issue {issue_id} priority {value} above P4"));
            4
        }
        Some(value) => value as u8,
    }
}

fn format_comment_body(author: &str, text: &str) -> String {
    let author = author.trim();
    if author.is_empty() {
        text.to_string()
    } else {
        format!("Author: {author}\n{text}")
    }
}

/// Close/delete metadata folded into one trailing comment, when present.
fn build_reason_comment(issue: &BeadsIssue) -> Option<String> {
    let mut lines = Vec::new();
    if !issue.close_reason.trim().is_empty() {
        lines.push(format!("Close reason: {}", issue.close_reason.trim()));
    }
    if !issue.delete_reason.trim().is_empty() {
        lines.push(format!("Delete reason: {}", issue.delete_reason.trim()));
    }
    if !issue.deleted_by.trim().is_empty() {
        lines.push(format!("Deleted by: {}", issue.deleted_by.trim()));
    }
    if !issue.deleted_at.trim().is_empty() {
        lines.push(format!("Deleted at: {}", issue.deleted_at.trim()));
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Pick the first parseable timestamp from the candidate chain, falling
/// back to `now` with a warning.
fn resolve_timestamp(
    candidates: &[&str],
    fallback: DateTime<Utc>,
    context: &str,
    warnings: &mut Vec<String>,
) -> (DateTime<Utc>, String) {
    for candidate in candidates {
        if let Some(parsed) = parse_timestamp(candidate) {
            return (parsed, format_timestamp(parsed));
        }
    }
    warnings.push(format!("{context} missing timestamp; using now"));
    (fallback, format_timestamp(fallback))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn sort_import_events(events: &mut [ImportEvent]) {
    events.sort_by(|left, right| {
        left.sort_time
            .cmp(&right.sort_time)
            .then(left.order.cmp(&right.order))
            .then_with(|| left.event.issue_id.cmp(&right.event.issue_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pebbles_core::EventType;
    use tempfile::TempDir;

    fn write_export(issues: &[serde_json::Value]) -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        let beads_dir = dir.path().join(".beads");
        std::fs::create_dir_all(&beads_dir).expect("mkdir .beads");
        let lines: Vec<String> = issues.iter().map(|issue| issue.to_string()).collect();
        std::fs::write(beads_dir.join("issues.jsonl"), lines.join("\n")).expect("write export");
        dir
    }

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
    }

    fn plan_for(dir: &TempDir, include_tombstones: bool) -> BeadsImportPlan {
        plan_beads_import(BeadsImportOptions {
            source_root: dir.path().to_path_buf(),
            include_tombstones,
            now: Some(test_now()),
            ..BeadsImportOptions::default()
        })
        .expect("plan")
    }

    fn find_event<'a>(events: &'a [Event], kind: EventType, issue_id: &str) -> Option<&'a Event> {
        events
            .iter()
            .find(|event| event.kind == kind && event.issue_id == issue_id)
    }

    fn has_warning(warnings: &[String], needle: &str) -> bool {
        warnings.iter().any(|warning| warning.contains(needle))
    }

    #[test]
    fn tombstones_are_skipped_by_default() {
        let dir = write_export(&[
            serde_json::json!({
                "id": "zz-1a", "title": "Open issue", "status": "open",
                "priority": 2, "created_at": "2024-01-01T00:00:00Z"
            }),
            serde_json::json!({
                "id": "zz-2b", "title": "Deleted issue", "status": "tombstone",
                "priority": 2, "deleted_at": "2024-01-02T00:00:00Z"
            }),
        ]);

        let plan = plan_for(&dir, false);
        assert_eq!(plan.result.tombstones_skipped, 1);
        assert_eq!(plan.result.issues_imported, 1);
        assert_eq!(plan.result.events_planned, 1);
        assert_eq!(plan.result.prefix, "zz");
        assert_eq!(
            plan.result.issues_imported + plan.result.issues_skipped,
            plan.result.issues_total
        );
    }

    #[test]
    fn included_tombstones_close_at_deleted_at() {
        let dir = write_export(&[
            serde_json::json!({
                "id": "zz-1a", "title": "Open issue", "status": "open",
                "priority": 2, "created_at": "2024-01-01T00:00:00Z"
            }),
            serde_json::json!({
                "id": "zz-2b", "title": "Deleted issue", "status": "tombstone",
                "priority": 2, "deleted_at": "2024-01-02T00:00:00Z"
            }),
        ]);

        let plan = plan_for(&dir, true);
        assert_eq!(plan.result.issues_imported, 2);
        let close = find_event(&plan.events, EventType::Close, "zz-2b").expect("close event");
        assert_eq!(close.timestamp, "2024-01-02T00:00:00Z");
    }

    #[test]
    fn parent_child_dependencies_pass_through_verbatim() {
        let dir = write_export(&[
            serde_json::json!({
                "id": "zz-parent", "title": "Parent", "status": "open",
                "priority": 2, "created_at": "2024-01-01T00:00:00Z"
            }),
            serde_json::json!({
                "id": "zz-child", "title": "Child", "status": "open",
                "priority": 2, "created_at": "2024-01-01T00:00:01Z",
                "dependencies": [{
                    "issue_id": "zz-child", "depends_on_id": "zz-parent",
                    "type": "parent_child", "created_at": "2024-01-01T00:00:05Z"
                }]
            }),
        ]);

        let plan = plan_for(&dir, false);
        let dep = find_event(&plan.events, EventType::DepAdd, "zz-child").expect("dep event");
        assert_eq!(dep.payload_str("depends_on"), "zz-parent");
        assert_eq!(dep.payload_str("dep_type"), DEP_TYPE_PARENT_CHILD);
    }

    #[test]
    fn unknown_dependency_types_warn_and_drop() {
        let dir = write_export(&[
            serde_json::json!({
                "id": "zz-1a", "title": "Issue", "status": "open", "priority": 2,
                "created_at": "2024-01-01T00:00:00Z",
                "dependencies": [{
                    "issue_id": "zz-1a", "depends_on_id": "zz-2b",
                    "type": "relates-to", "created_at": "2024-01-01T00:00:02Z"
                }]
            }),
            serde_json::json!({
                "id": "zz-2b", "title": "Other", "status": "open", "priority": 2,
                "created_at": "2024-01-01T00:00:01Z"
            }),
        ]);

        let plan = plan_for(&dir, false);
        assert!(has_warning(&plan.result.warnings, "unknown dependency type"));
        assert!(find_event(&plan.events, EventType::DepAdd, "zz-1a").is_none());
    }

    #[test]
    fn edges_to_unimported_issues_warn_and_drop() {
        let dir = write_export(&[serde_json::json!({
            "id": "zz-1a", "title": "Issue", "status": "open", "priority": 2,
            "created_at": "2024-01-01T00:00:00Z",
            "dependencies": [{
                "issue_id": "zz-1a", "depends_on_id": "zz-missing",
                "type": "blocks", "created_at": "2024-01-01T00:00:02Z"
            }]
        })]);

        let plan = plan_for(&dir, false);
        assert!(has_warning(&plan.result.warnings, "skipped (missing issue)"));
        assert!(find_event(&plan.events, EventType::DepAdd, "zz-1a").is_none());
    }

    #[test]
    fn missing_timestamps_fall_back_to_now_with_warning() {
        let dir = write_export(&[serde_json::json!({
            "id": "zz-1a", "title": "Issue", "status": "open", "priority": 2
        })]);

        let plan = plan_for(&dir, false);
        let create = find_event(&plan.events, EventType::Create, "zz-1a").expect("create event");
        assert_eq!(create.timestamp, "2024-01-03T00:00:00Z");
        assert!(has_warning(&plan.result.warnings, "missing timestamp; using now"));
    }

    #[test]
    fn priorities_default_and_clamp_with_warnings() {
        let dir = write_export(&[
            serde_json::json!({
                "id": "zz-none", "title": "No priority", "status": "open",
                "created_at": "2024-01-01T00:00:00Z"
            }),
            serde_json::json!({
                "id": "zz-low", "title": "Too low", "status": "open", "priority": -3,
                "created_at": "2024-01-01T00:00:01Z"
            }),
            serde_json::json!({
                "id": "zz-high", "title": "Too high", "status": "open", "priority": 9,
                "created_at": "2024-01-01T00:00:02Z"
            }),
        ]);

        let plan = plan_for(&dir, false);
        let priority_of = |id: &str| {
            find_event(&plan.events, EventType::Create, id)
                .expect("create event")
                .payload_str("priority")
                .to_string()
        };
        assert_eq!(priority_of("zz-none"), "2");
        assert_eq!(priority_of("zz-low"), "0");
        assert_eq!(priority_of("zz-high"), "4");
        assert!(has_warning(&plan.result.warnings, "missing priority; using P2"));
        assert!(has_warning(&plan.result.warnings, "below P0"));
        assert!(has_warning(&plan.result.warnings, "above P4"));
    }

    #[test]
    fn comments_carry_authors_and_reasons() {
        let dir = write_export(&[serde_json::json!({
            "id": "zz-1a", "title": "Issue", "status": "closed", "priority": 2,
            "created_at": "2024-01-01T00:00:00Z",
            "closed_at": "2024-01-02T00:00:00Z",
            "close_reason": "fixed upstream",
            "comments": [
                {"author": "alice", "text": "looking", "created_at": "2024-01-01T01:00:00Z"},
                {"author": "", "text": "anonymous note", "created_at": "2024-01-01T02:00:00Z"}
            ]
        })]);

        let plan = plan_for(&dir, false);
        let comments: Vec<&Event> = plan
            .events
            .iter()
            .filter(|event| event.kind == EventType::Comment)
            .collect();
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].payload_str("body"), "Author: alice\nlooking");
        assert_eq!(comments[1].payload_str("body"), "anonymous note");
        assert_eq!(comments[2].payload_str("body"), "Close reason: fixed upstream");

        // The close lands after the reason comment in the event order.
        let close_index = plan
            .events
            .iter()
            .position(|event| event.kind == EventType::Close)
            .expect("close planned");
        let reason_index = plan
            .events
            .iter()
            .position(|event| event.payload_str("body").starts_with("Close reason:"))
            .expect("reason planned");
        assert!(reason_index < close_index);
    }

    #[test]
    fn duplicate_ids_and_blank_titles_are_skipped() {
        let dir = write_export(&[
            serde_json::json!({
                "id": "zz-1a", "title": "Kept", "status": "open", "priority": 2,
                "created_at": "2024-01-01T00:00:00Z"
            }),
            serde_json::json!({
                "id": "zz-1a", "title": "Duplicate", "status": "open", "priority": 2,
                "created_at": "2024-01-01T00:00:01Z"
            }),
            serde_json::json!({
                "id": "zz-2b", "title": "  ", "status": "open", "priority": 2,
                "created_at": "2024-01-01T00:00:02Z"
            }),
        ]);

        let plan = plan_for(&dir, false);
        assert_eq!(plan.result.issues_total, 3);
        assert_eq!(plan.result.issues_imported, 1);
        assert_eq!(plan.result.issues_skipped, 2);
        assert!(has_warning(&plan.result.warnings, "duplicate issue id zz-1a"));
        assert!(has_warning(&plan.result.warnings, "issue zz-2b missing title"));
    }

    #[test]
    fn mixed_prefixes_fail_with_the_candidate_list() {
        let dir = write_export(&[
            serde_json::json!({
                "id": "aa-1", "title": "One", "status": "open", "priority": 2,
                "created_at": "2024-01-01T00:00:00Z"
            }),
            serde_json::json!({
                "id": "bb-2", "title": "Two", "status": "open", "priority": 2,
                "created_at": "2024-01-01T00:00:01Z"
            }),
        ]);

        let err = plan_beads_import(BeadsImportOptions {
            source_root: dir.path().to_path_buf(),
            now: Some(test_now()),
            ..BeadsImportOptions::default()
        })
        .expect_err("must fail");
        match err {
            ImportError::MultiplePrefixes { candidates } => {
                assert_eq!(candidates, vec!["aa".to_string(), "bb".to_string()]);
            }
            other => panic!("expected MultiplePrefixes, got {other:?}"),
        }
    }

    #[test]
    fn prefix_override_bypasses_inference() {
        let dir = write_export(&[
            serde_json::json!({
                "id": "aa-1", "title": "One", "status": "open", "priority": 2,
                "created_at": "2024-01-01T00:00:00Z"
            }),
            serde_json::json!({
                "id": "bb-2", "title": "Two", "status": "open", "priority": 2,
                "created_at": "2024-01-01T00:00:01Z"
            }),
        ]);

        let plan = plan_beads_import(BeadsImportOptions {
            source_root: dir.path().to_path_buf(),
            prefix: Some("cc".to_string()),
            now: Some(test_now()),
            ..BeadsImportOptions::default()
        })
        .expect("plan");
        assert_eq!(plan.result.prefix, "cc");
    }

    #[test]
    fn buckets_keep_creates_before_deps_before_terminal_events() {
        let dir = write_export(&[
            serde_json::json!({
                "id": "zz-b", "title": "Blocked", "status": "in_progress", "priority": 2,
                "created_at": "2024-01-01T00:00:05Z",
                "updated_at": "2024-01-01T01:00:00Z",
                "dependencies": [{
                    "issue_id": "zz-b", "depends_on_id": "zz-a",
                    "type": "blocks", "created_at": "2024-01-01T00:00:01Z"
                }]
            }),
            serde_json::json!({
                "id": "zz-a", "title": "Blocker", "status": "closed", "priority": 2,
                "created_at": "2024-01-01T00:00:00Z",
                "closed_at": "2024-01-01T00:30:00Z"
            }),
        ]);

        let plan = plan_for(&dir, false);
        let kinds: Vec<EventType> = plan.events.iter().map(|event| event.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventType::Create,   // zz-a (earlier created_at)
                EventType::Create,   // zz-b
                EventType::DepAdd,   // before any terminal event
                EventType::Close,    // zz-a at 00:30
                EventType::StatusUpdate, // zz-b at 01:00
            ]
        );
    }

    #[test]
    fn helper_normalizers_cover_the_grammar() {
        let mut warnings = Vec::new();
        assert_eq!(
            normalize_status("In-Progress", "zz-1", &mut warnings),
            BeadsStatus::InProgress
        );
        assert_eq!(
            normalize_status("weird", "zz-1", &mut warnings),
            BeadsStatus::Open
        );
        assert!(has_warning(&warnings, "unknown status"));

        assert!(build_reason_comment(&BeadsIssue::default()).is_none());
        let issue = BeadsIssue {
            delete_reason: "dupe".to_string(),
            deleted_by: "bob".to_string(),
            deleted_at: "2024-01-02T00:00:00Z".to_string(),
            ..BeadsIssue::default()
        };
        assert_eq!(
            build_reason_comment(&issue).expect("reason"),
            "Delete reason: dupe\nDeleted by: bob\nDeleted at: 2024-01-02T00:00:00Z"
        );
    }
}
