//! Full-tree check of cached metadata.
//!
//! Recomputes every element's metadata from scratch (O(n)) and compares it
//! with what the constructor stored. Meant for tests and fuzzing; the
//! constructor itself never walks a subtree.

use crate::node::Node;
use crate::property::PropertyValue;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvariantViolation {
    pub path: String,
    pub detail: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree invariant violated at {}: {}", self.path, self.detail)
    }
}

impl std::error::Error for InvariantViolation {}

/// Totals gathered while checking a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub elements: usize,
    pub texts: usize,
    pub widgets: usize,
    pub thunks: usize,
    pub hooks: usize,
}

#[derive(Clone, Copy, Default)]
struct Recomputed {
    count: usize,
    has_widgets: bool,
    has_thunks: bool,
    has_hooks: bool,
}

pub fn check_tree(root: &Node) -> Result<TreeStats, InvariantViolation> {
    let mut stats = TreeStats::default();
    let mut path = vec![segment(root, None)];
    check_node(root, &mut path, &mut stats)?;
    Ok(stats)
}

fn check_node(
    node: &Node,
    path: &mut Vec<String>,
    stats: &mut TreeStats,
) -> Result<Recomputed, InvariantViolation> {
    let element = match node {
        Node::Element(element) => element,
        Node::Text(_) => {
            stats.texts += 1;
            return Ok(Recomputed::default());
        }
        Node::Widget(_) => {
            stats.widgets += 1;
            return Ok(Recomputed {
                has_widgets: true,
                ..Recomputed::default()
            });
        }
        Node::Thunk(_) => {
            stats.thunks += 1;
            return Ok(Recomputed {
                has_thunks: true,
                ..Recomputed::default()
            });
        }
    };
    stats.elements += 1;

    let own_hooks = element
        .properties()
        .values()
        .filter(|value| PropertyValue::is_hook(value))
        .count();
    stats.hooks += own_hooks;

    let mut below = Recomputed::default();
    let mut descendants = 0usize;
    for (i, child) in element.children().iter().enumerate() {
        path.push(segment(child, Some(i)));
        let result = check_node(child, path, stats);
        path.pop();
        let child_totals = result?;
        below.count += 1 + child_totals.count;
        descendants += child_totals.count;
        below.has_widgets |= child_totals.has_widgets;
        below.has_thunks |= child_totals.has_thunks;
        below.has_hooks |= child_totals.has_hooks;
    }

    if element.count() != below.count {
        return Err(violation(
            path,
            format!("count {} but subtree has {}", element.count(), below.count),
        ));
    }
    if element.count() != element.children().len() + element.descendants() {
        return Err(violation(
            path,
            format!(
                "count {} != children {} + descendants {}",
                element.count(),
                element.children().len(),
                element.descendants()
            ),
        ));
    }
    if element.descendants() != descendants {
        return Err(violation(
            path,
            format!(
                "descendants {} but element children sum to {}",
                element.descendants(),
                descendants
            ),
        ));
    }
    if element.has_widgets() != below.has_widgets {
        return Err(violation(
            path,
            format!(
                "has_widgets {} but subtree says {}",
                element.has_widgets(),
                below.has_widgets
            ),
        ));
    }
    if element.has_thunks() != below.has_thunks {
        return Err(violation(
            path,
            format!(
                "has_thunks {} but subtree says {}",
                element.has_thunks(),
                below.has_thunks
            ),
        ));
    }
    if element.descendant_hooks() != below.has_hooks {
        return Err(violation(
            path,
            format!(
                "descendant_hooks {} but subtree says {}",
                element.descendant_hooks(),
                below.has_hooks
            ),
        ));
    }
    let cached_hooks = element.hooks().map_or(0, |hooks| hooks.len());
    if cached_hooks != own_hooks {
        return Err(violation(
            path,
            format!("hooks has {cached_hooks} entries but {own_hooks} properties are hooks"),
        ));
    }

    Ok(Recomputed {
        count: below.count,
        has_widgets: below.has_widgets,
        has_thunks: below.has_thunks,
        has_hooks: below.has_hooks || own_hooks > 0,
    })
}

fn violation(path: &[String], detail: String) -> InvariantViolation {
    InvariantViolation {
        path: format!("/{}", path.join("/")),
        detail,
    }
}

fn segment(node: &Node, index: Option<usize>) -> String {
    let name = match node {
        Node::Element(element) => element.tag_name().to_string(),
        other => format!("#{}", other.kind()),
    };
    match index {
        Some(i) => format!("{name}[{i}]"),
        None => name,
    }
}
