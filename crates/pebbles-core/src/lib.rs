#![forbid(unsafe_code)]
//! pebbles-core: the event-sourced engine behind the Pebbles issue tracker.
//!
//! Durable state is a single append-only JSONL event log under
//! `.pebbles/`, committed to version control; everything queryable is a
//! disposable SQLite projection rebuilt from the log on demand. Writes
//! append one event and rebuild; reads refresh the cache and query it.
//! Replay order is (timestamp, file order), so any two checkouts with the
//! same log contents project byte-identical state.
//!
//! This crate is the typed API consumed by front ends. It never reads
//! process arguments, never formats terminal output, and only reads the
//! clock in the explicit `now_timestamp` helper.

pub mod activity;
pub mod child_ids;
pub mod comments;
pub mod config;
pub mod db;
pub mod deps;
pub mod error;
pub mod event;
pub mod format;
pub mod hierarchy;
pub mod id;
pub mod log;
pub mod model;
pub mod paths;
pub mod project;
pub mod renames;

pub use activity::list_issue_activity;
pub use child_ids::{has_parent_child_suffix, next_child_issue_id};
pub use comments::list_issue_comments;
pub use config::{default_prefix, load_config, write_config, Config};
pub use db::cache::{ensure_cache, rebuild_cache};
pub use db::query::{get_issue, issue_exists, issue_status, list_issues, list_ready_issues};
pub use deps::{dependency_tree, DepNode};
pub use error::{Error, Result};
pub use event::build::{
    new_close_event, new_comment_event, new_create_event, new_dep_add_event, new_dep_rm_event,
    new_rename_event, new_status_event, new_update_event, UpdateFields,
};
pub use event::{Event, EventType};
pub use format::{parse_priority, parse_priority_or_default, priority_label, DEFAULT_PRIORITY};
pub use hierarchy::{
    get_issue_hierarchy, has_parent_child_relations, list_issue_hierarchy, parent_child_tree,
    IssueHierarchy, IssueHierarchyItem,
};
pub use id::{
    generate_issue_id, generate_unique_issue_id, host_label, now_timestamp, DEFAULT_SUFFIX_LEN,
};
pub use log::{append_event, load_event_log, load_events, EventLogEntry};
pub use model::{
    normalize_dep_type, Issue, IssueComment, Status, DEP_TYPE_BLOCKS, DEP_TYPE_PARENT_CHILD,
};
pub use project::{init_project, init_project_with_prefix};
