#![forbid(unsafe_code)]
//! pebbles-import: translate a Beads tracker export into Pebbles events.
//!
//! The importer is two-phase. [`plan_beads_import`] is pure: it reads the
//! foreign `.beads/issues.jsonl` export and returns the event sequence
//! (plus counters and warnings) that would recreate the exported state.
//! [`apply_beads_import_plan`] appends those events to a project's log and
//! rebuilds the cache. Splitting the phases lets front ends show a dry-run
//! summary before anything is written.

pub mod error;
pub mod plan;
pub mod source;

pub use error::{ImportError, Result};
pub use plan::{
    apply_beads_import_plan, plan_beads_import, BeadsImportOptions, BeadsImportPlan,
    BeadsImportResult,
};
pub use source::{BeadsComment, BeadsDependency, BeadsIssue};
