//! Blocking-dependency tree traversal.

use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;

use crate::db::{cache, open_cache, query};
use crate::error::Result;
use crate::model::{Issue, DEP_TYPE_BLOCKS};
use crate::paths;
use crate::renames::resolve_issue_id;

/// An issue with its recursive dependency subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepNode {
    pub issue: Issue,
    pub dependencies: Vec<DepNode>,
}

/// The `blocks` dependency tree rooted at the resolved id.
///
/// Cycles terminate: a revisited issue appears once more as a leaf with no
/// children of its own.
///
/// # Errors
///
/// Propagates cache refresh, resolution, and query failures.
pub fn dependency_tree(root: &Path, id: &str) -> Result<DepNode> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;
    let resolved = resolve_issue_id(&conn, id)?;
    let mut visited = HashSet::new();
    build_dep_tree(&conn, &resolved, DEP_TYPE_BLOCKS, &mut visited)
}

/// Recursively expand dependencies of `id`, guarding against cycles.
pub(crate) fn build_dep_tree(
    conn: &Connection,
    id: &str,
    dep_type: &str,
    visited: &mut HashSet<String>,
) -> Result<DepNode> {
    let issue = query::get_issue_by_id(conn, id)?;
    let mut node = DepNode {
        issue,
        dependencies: Vec::new(),
    };
    if !visited.insert(id.to_string()) {
        return Ok(node);
    }
    for dep in query::get_deps(conn, id, dep_type)? {
        node.dependencies
            .push(build_dep_tree(conn, &dep, dep_type, visited)?);
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::build::{new_create_event, new_dep_add_event};
    use crate::log::append_event;
    use crate::project::init_project;
    use tempfile::TempDir;

    fn project_with(events: &[crate::event::Event]) -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        init_project(dir.path()).expect("init");
        for event in events {
            append_event(dir.path(), event).expect("append");
        }
        cache::rebuild_cache(dir.path()).expect("rebuild");
        dir
    }

    #[test]
    fn tree_follows_blocks_edges_recursively() {
        let t = |n: u32| format!("2024-01-03T00:00:0{n}Z");
        let dir = project_with(&[
            new_create_event("pb-a", "A", "", "task", &t(0), 2),
            new_create_event("pb-b", "B", "", "task", &t(1), 2),
            new_create_event("pb-c", "C", "", "task", &t(2), 2),
            new_dep_add_event("pb-a", "pb-b", DEP_TYPE_BLOCKS, &t(3)),
            new_dep_add_event("pb-b", "pb-c", DEP_TYPE_BLOCKS, &t(4)),
        ]);

        let tree = dependency_tree(dir.path(), "pb-a").expect("tree");
        assert_eq!(tree.issue.id, "pb-a");
        assert_eq!(tree.dependencies.len(), 1);
        assert_eq!(tree.dependencies[0].issue.id, "pb-b");
        assert_eq!(tree.dependencies[0].dependencies.len(), 1);
        assert_eq!(tree.dependencies[0].dependencies[0].issue.id, "pb-c");
    }

    #[test]
    fn dependency_cycles_terminate() {
        let t = |n: u32| format!("2024-01-03T00:00:0{n}Z");
        let dir = project_with(&[
            new_create_event("pb-a", "A", "", "task", &t(0), 2),
            new_create_event("pb-b", "B", "", "task", &t(1), 2),
            new_dep_add_event("pb-a", "pb-b", DEP_TYPE_BLOCKS, &t(2)),
            new_dep_add_event("pb-b", "pb-a", DEP_TYPE_BLOCKS, &t(3)),
        ]);

        let tree = dependency_tree(dir.path(), "pb-a").expect("tree");
        // a -> b -> a(leaf); the revisit carries no children.
        let revisit = &tree.dependencies[0].dependencies[0];
        assert_eq!(revisit.issue.id, "pb-a");
        assert!(revisit.dependencies.is_empty());
    }
}
