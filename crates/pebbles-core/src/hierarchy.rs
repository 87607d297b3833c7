//! Parent-child hierarchy queries.
//!
//! A `parent_child` dependency edge `(child, parent)` makes `parent` the
//! parent of `child`. Multiple parents are representable; traversals that
//! need a single lineage follow the first parent in id order.

use rusqlite::Connection;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::db::{cache, open_cache, query};
use crate::deps::DepNode;
use crate::error::Result;
use crate::model::{Issue, DEP_TYPE_PARENT_CHILD};
use crate::paths;
use crate::renames::resolve_issue_id;

/// An issue with its indentation depth in the hierarchy listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueHierarchyItem {
    pub issue: Issue,
    pub depth: usize,
}

/// Direct relatives of one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueHierarchy {
    pub parents: Vec<Issue>,
    pub children: Vec<Issue>,
    pub siblings: Vec<Issue>,
}

/// Every issue ordered depth-first: roots in id order, children nested
/// beneath their parent in id order.
///
/// Issues unreachable from any root (detached children in a malformed
/// graph) are appended at depth zero, in id order, so nothing is dropped.
///
/// # Errors
///
/// Propagates cache refresh and query failures.
pub fn list_issue_hierarchy(root: &Path) -> Result<Vec<IssueHierarchyItem>> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;

    let issues = query::list_issues_in(&conn)?;
    let (children_by_parent, child_set) = load_parent_child_deps(&conn)?;
    Ok(build_issue_hierarchy(issues, &children_by_parent, &child_set))
}

/// Parents, children, and siblings of the resolved issue.
///
/// Siblings are the union of every parent's other children, deduplicated
/// and id-sorted.
///
/// # Errors
///
/// Propagates cache refresh, resolution, and query failures.
pub fn get_issue_hierarchy(root: &Path, id: &str) -> Result<IssueHierarchy> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;
    let resolved = resolve_issue_id(&conn, id)?;

    let parent_ids = query::get_deps(&conn, &resolved, DEP_TYPE_PARENT_CHILD)?;
    let child_ids = query::get_dependents(&conn, &resolved, DEP_TYPE_PARENT_CHILD)?;
    let sibling_ids = collect_sibling_ids(&conn, &resolved, &parent_ids)?;

    Ok(IssueHierarchy {
        parents: load_issues_by_id(&conn, &parent_ids)?,
        children: load_issues_by_id(&conn, &child_ids)?,
        siblings: load_issues_by_id(&conn, &sibling_ids)?,
    })
}

/// Whether the issue sits on either side of a `parent_child` edge.
///
/// # Errors
///
/// Propagates cache refresh, resolution, and query failures.
pub fn has_parent_child_relations(root: &Path, id: &str) -> Result<bool> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;
    let resolved = resolve_issue_id(&conn, id)?;

    let found: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM deps
            WHERE dep_type = ?1 AND (issue_id = ?2 OR depends_on_id = ?2)
        )",
        rusqlite::params![DEP_TYPE_PARENT_CHILD, resolved],
        |row| row.get(0),
    )?;
    Ok(found)
}

/// The parent-child tree containing the issue, rooted at its topmost
/// ancestor (following first parents, cycle-guarded).
///
/// # Errors
///
/// Propagates cache refresh, resolution, and query failures.
pub fn parent_child_tree(root: &Path, id: &str) -> Result<DepNode> {
    cache::ensure_cache(root)?;
    let conn = open_cache(&paths::db_path(root))?;
    let resolved = resolve_issue_id(&conn, id)?;
    let top = resolve_parent_root(&conn, &resolved)?;
    let mut visited = HashSet::new();
    build_parent_child_tree(&conn, &top, &mut visited)
}

/// Load all parent-child edges: children grouped by parent (sorted), plus
/// the set of every issue that is someone's child.
fn load_parent_child_deps(
    conn: &Connection,
) -> Result<(BTreeMap<String, Vec<String>>, HashSet<String>)> {
    let mut stmt = conn.prepare(
        "SELECT issue_id, depends_on_id FROM deps
         WHERE dep_type = ?1
         ORDER BY depends_on_id, issue_id",
    )?;
    let mut children_by_parent: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut child_set = HashSet::new();
    let edges = stmt.query_map([DEP_TYPE_PARENT_CHILD], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    for edge in edges {
        let (child, parent) = edge?;
        children_by_parent.entry(parent).or_default().push(child.clone());
        child_set.insert(child);
    }
    Ok((children_by_parent, child_set))
}

/// Depth-first walk emitting roots then children, with a fallback pass
/// that appends anything the walk never reached.
fn build_issue_hierarchy(
    issues: Vec<Issue>,
    children_by_parent: &BTreeMap<String, Vec<String>>,
    child_set: &HashSet<String>,
) -> Vec<IssueHierarchyItem> {
    let order: Vec<String> = issues.iter().map(|issue| issue.id.clone()).collect();
    let issue_by_id: BTreeMap<String, Issue> = issues
        .into_iter()
        .map(|issue| (issue.id.clone(), issue))
        .collect();

    let mut items = Vec::with_capacity(issue_by_id.len());
    let mut visited: HashSet<String> = HashSet::with_capacity(issue_by_id.len());

    fn add_issue(
        id: &str,
        depth: usize,
        issue_by_id: &BTreeMap<String, Issue>,
        children_by_parent: &BTreeMap<String, Vec<String>>,
        visited: &mut HashSet<String>,
        items: &mut Vec<IssueHierarchyItem>,
    ) {
        if visited.contains(id) {
            return;
        }
        let Some(issue) = issue_by_id.get(id) else {
            return;
        };
        visited.insert(id.to_string());
        items.push(IssueHierarchyItem {
            issue: issue.clone(),
            depth,
        });
        if let Some(children) = children_by_parent.get(id) {
            for child in children {
                add_issue(child, depth + 1, issue_by_id, children_by_parent, visited, items);
            }
        }
    }

    for id in &order {
        if child_set.contains(id) {
            continue;
        }
        add_issue(id, 0, &issue_by_id, children_by_parent, &mut visited, &mut items);
    }
    // Anything still unvisited hangs off a cycle or a missing parent row.
    for id in &order {
        if !visited.contains(id) {
            add_issue(id, 0, &issue_by_id, children_by_parent, &mut visited, &mut items);
        }
    }
    items
}

fn collect_sibling_ids(
    conn: &Connection,
    issue_id: &str,
    parent_ids: &[String],
) -> Result<Vec<String>> {
    let mut sibling_set = std::collections::BTreeSet::new();
    for parent_id in parent_ids {
        for child_id in query::get_dependents(conn, parent_id, DEP_TYPE_PARENT_CHILD)? {
            if child_id != issue_id {
                sibling_set.insert(child_id);
            }
        }
    }
    Ok(sibling_set.into_iter().collect())
}

/// Fetch issues preserving the order of the given ids.
fn load_issues_by_id(conn: &Connection, ids: &[String]) -> Result<Vec<Issue>> {
    ids.iter()
        .map(|id| query::get_issue_by_id(conn, id))
        .collect()
}

/// Walk first-parent links upward until an issue has no parent.
fn resolve_parent_root(conn: &Connection, issue_id: &str) -> Result<String> {
    let mut current = issue_id.to_string();
    let mut visited = HashSet::new();
    loop {
        if !visited.insert(current.clone()) {
            return Ok(current);
        }
        let parents = query::get_deps(conn, &current, DEP_TYPE_PARENT_CHILD)?;
        match parents.into_iter().next() {
            Some(parent) => current = parent,
            None => return Ok(current),
        }
    }
}

fn build_parent_child_tree(
    conn: &Connection,
    issue_id: &str,
    visited: &mut HashSet<String>,
) -> Result<DepNode> {
    let issue = query::get_issue_by_id(conn, issue_id)?;
    let mut node = DepNode {
        issue,
        dependencies: Vec::new(),
    };
    if !visited.insert(issue_id.to_string()) {
        return Ok(node);
    }
    for child_id in query::get_dependents(conn, issue_id, DEP_TYPE_PARENT_CHILD)? {
        node.dependencies
            .push(build_parent_child_tree(conn, &child_id, visited)?);
    }
    Ok(node)
}
