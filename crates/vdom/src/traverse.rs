//! Pre-order indexing over a virtual tree.
//!
//! The root has index 0 and children follow their parent depth-first. An
//! element at index `i` owns the range `i..=i + count`, so lookups skip whole
//! subtrees without visiting them. Text, widgets and thunks are leaves here;
//! a thunk's rendered subtree is not indexed.

use crate::node::Node;
use std::collections::{BTreeMap, BTreeSet};

/// Finds the node at pre-order `index` below `root`.
pub fn node_at_index(root: &Node, index: usize) -> Option<&Node> {
    let mut node = root;
    let mut node_index = 0usize;
    loop {
        if index == node_index {
            return Some(node);
        }
        let Node::Element(element) = node else {
            return None;
        };
        if index > node_index + element.count() {
            return None;
        }
        let mut child_index = node_index + 1;
        let mut next = None;
        for child in element.children() {
            let last = child_index + child.count();
            if index <= last {
                next = Some((child, child_index));
                break;
            }
            child_index = last + 1;
        }
        (node, node_index) = next?;
    }
}

/// Resolves every index in `wanted` in a single walk.
///
/// Only subtrees whose range contains a wanted index are entered. Indices
/// that fall outside the tree are absent from the result.
pub fn index_nodes<'a>(root: &'a Node, wanted: &BTreeSet<usize>) -> BTreeMap<usize, &'a Node> {
    fn walk<'a>(
        node: &'a Node,
        index: usize,
        wanted: &BTreeSet<usize>,
        out: &mut BTreeMap<usize, &'a Node>,
    ) {
        if wanted.contains(&index) {
            out.insert(index, node);
        }
        if let Node::Element(element) = node {
            let mut child_index = index + 1;
            for child in element.children() {
                let last = child_index + child.count();
                if wanted.range(child_index..=last).next().is_some() {
                    walk(child, child_index, wanted, out);
                }
                child_index = last + 1;
            }
        }
    }

    let mut out = BTreeMap::new();
    if !wanted.is_empty() {
        walk(root, 0, wanted, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{index_nodes, node_at_index};
    use crate::node::Node;
    use crate::vnode::VirtualNode;
    use std::collections::BTreeSet;

    // 0 <div>
    // 1   "a"
    // 2   <ul>
    // 3     <li>
    // 4       "one"
    // 5     <li>
    // 6       "two"
    // 7   "z"
    fn sample() -> Node {
        let li = |text: &str| VirtualNode::builder("li").text(text).into_node();
        let ul = VirtualNode::builder("ul")
            .child(li("one"))
            .child(li("two"))
            .into_node();
        VirtualNode::builder("div")
            .text("a")
            .child(ul)
            .text("z")
            .into_node()
    }

    fn label(node: &Node) -> String {
        match node {
            Node::Element(element) => element.tag_name().to_string(),
            Node::Text(text) => text.text.clone(),
            other => other.kind().to_string(),
        }
    }

    #[test]
    fn indices_follow_preorder() {
        let root = sample();
        let labels: Vec<String> = (0..8)
            .map(|i| label(node_at_index(&root, i).expect("index in range")))
            .collect();
        assert_eq!(labels, ["div", "a", "ul", "li", "one", "li", "two", "z"]);
    }

    #[test]
    fn out_of_range_index_is_none() {
        let root = sample();
        assert_eq!(root.count(), 7);
        assert!(node_at_index(&root, 8).is_none());
        assert!(node_at_index(&Node::text("leaf"), 1).is_none());
    }

    #[test]
    fn index_nodes_matches_single_lookups() {
        let root = sample();
        let wanted: BTreeSet<usize> = [0, 4, 6, 7, 40].into_iter().collect();
        let found = index_nodes(&root, &wanted);
        assert_eq!(found.keys().copied().collect::<Vec<_>>(), vec![0, 4, 6, 7]);
        for (index, node) in found {
            let single = node_at_index(&root, index).expect("index in range");
            assert!(Node::ptr_eq(node, single));
        }
    }

    #[test]
    fn empty_request_visits_nothing() {
        let root = sample();
        assert!(index_nodes(&root, &BTreeSet::new()).is_empty());
    }
}
