use crate::node::Node;
use crate::property::PropertyValue;
use crate::vnode::VirtualNode;
use std::fmt::{self, Write};
use std::sync::OnceLock;

/// Deterministic tree serialization for golden tests.
/// Not a stable format.
///
/// Line rules:
/// - One line per node, indented two spaces per level.
/// - Elements render as `<tag key=".." ns=".." prop=..>`; properties are in
///   name order. Hook-capable values render as `hook`, other objects as
///   `object`.
/// - With `include_metadata`, elements also render `count=`,
///   `descendants=` and the set flags (`+widgets`, `+thunks`, `+hooks`,
///   `+descendant_hooks`).
/// - Text renders quoted and escaped; widgets render as `#widget`; thunks as
///   `#thunk` plus their resolution state.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotOptions {
    pub include_metadata: bool,
    pub include_properties: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            include_metadata: true,
            include_properties: true,
        }
    }
}

#[derive(Debug)]
pub struct TreeSnapshot {
    lines: Vec<String>,
}

impl TreeSnapshot {
    pub fn new(root: &Node, options: SnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(root, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct TreeMismatch<'a> {
    path: String,
    detail: String,
    expected: String,
    actual: String,
    expected_node: &'a Node,
    actual_node: &'a Node,
    options: SnapshotOptions,
    expected_subtree: OnceLock<String>,
    actual_subtree: OnceLock<String>,
}

impl fmt::Display for TreeMismatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected_subtree = self
            .expected_subtree
            .get_or_init(|| TreeSnapshot::new(self.expected_node, self.options).render());
        let actual_subtree = self
            .actual_subtree
            .get_or_init(|| TreeSnapshot::new(self.actual_node, self.options).render());
        writeln!(f, "tree mismatch at {}: {}", self.path, self.detail)?;
        writeln!(f, "expected: {}", self.expected)?;
        writeln!(f, "actual:   {}", self.actual)?;
        writeln!(f, "expected subtree:\n{}", expected_subtree)?;
        writeln!(f, "actual subtree:\n{}", actual_subtree)?;
        Ok(())
    }
}

impl std::error::Error for TreeMismatch<'_> {}

pub fn assert_tree_eq(expected: &Node, actual: &Node, options: SnapshotOptions) {
    if let Err(mismatch) = compare_tree(expected, actual, options) {
        panic!("{mismatch}");
    }
}

/// Compares two trees node by node using the snapshot line of each node.
pub fn compare_tree<'a>(
    expected: &'a Node,
    actual: &'a Node,
    options: SnapshotOptions,
) -> Result<(), Box<TreeMismatch<'a>>> {
    let mut path = vec![node_label(expected)];
    compare_nodes(expected, actual, &options, &mut path)
}

fn compare_nodes<'a>(
    expected: &'a Node,
    actual: &'a Node,
    options: &SnapshotOptions,
    path: &mut Vec<String>,
) -> Result<(), Box<TreeMismatch<'a>>> {
    if expected.kind() != actual.kind() {
        return Err(Box::new(mismatch(path, "node kind", expected, actual, options)));
    }
    if format_node_line(expected, options) != format_node_line(actual, options) {
        return Err(Box::new(mismatch(path, "node line", expected, actual, options)));
    }
    let (Node::Element(expected_element), Node::Element(actual_element)) = (expected, actual)
    else {
        return Ok(());
    };
    let expected_children = expected_element.children();
    let actual_children = actual_element.children();
    if expected_children.len() != actual_children.len() {
        return Err(Box::new(mismatch(
            path,
            &format!(
                "child count (expected {}, actual {})",
                expected_children.len(),
                actual_children.len()
            ),
            expected,
            actual,
            options,
        )));
    }
    for (idx, (exp, act)) in expected_children.iter().zip(actual_children).enumerate() {
        path.push(format!("{}[{}]", node_label(exp), idx));
        let result = compare_nodes(exp, act, options, path);
        path.pop();
        result?;
    }
    Ok(())
}

fn mismatch<'a>(
    path: &[String],
    detail: &str,
    expected: &'a Node,
    actual: &'a Node,
    options: &SnapshotOptions,
) -> TreeMismatch<'a> {
    TreeMismatch {
        path: format!("/{}", path.join("/")),
        detail: detail.to_string(),
        expected: truncate_line(format_node_line(expected, options), 160),
        actual: truncate_line(format_node_line(actual, options), 160),
        expected_node: expected,
        actual_node: actual,
        options: *options,
        expected_subtree: OnceLock::new(),
        actual_subtree: OnceLock::new(),
    }
}

fn node_label(node: &Node) -> String {
    match node {
        Node::Element(element) => {
            let mut label = element.tag_name().to_string();
            if let Some(key) = element.key() {
                label.push('#');
                write_escaped(&mut label, key);
            }
            label
        }
        Node::Text(_) => "#text".to_string(),
        Node::Widget(_) => "#widget".to_string(),
        Node::Thunk(_) => "#thunk".to_string(),
    }
}

fn truncate_line(mut line: String, max_len: usize) -> String {
    if line.len() > max_len {
        let mut cut = max_len.saturating_sub(3);
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
        line.push_str("...");
    }
    line
}

fn walk_snapshot(node: &Node, options: &SnapshotOptions, depth: usize, out: &mut Vec<String>) {
    const INDENT_STEP: usize = 2;
    let mut line = " ".repeat(depth.saturating_mul(INDENT_STEP));
    write_node_line(&mut line, node, options);
    out.push(line);
    if let Node::Element(element) = node {
        for child in element.children() {
            walk_snapshot(child, options, depth + 1, out);
        }
    }
}

fn format_node_line(node: &Node, options: &SnapshotOptions) -> String {
    let mut line = String::new();
    write_node_line(&mut line, node, options);
    line
}

fn write_node_line(out: &mut String, node: &Node, options: &SnapshotOptions) {
    match node {
        Node::Element(element) => write_element_line(out, element, options),
        Node::Text(text) => {
            out.push('"');
            write_escaped(out, &text.text);
            out.push('"');
        }
        Node::Widget(_) => out.push_str("#widget"),
        Node::Thunk(thunk) => {
            out.push_str("#thunk");
            out.push_str(if thunk.is_resolved() {
                " resolved"
            } else {
                " pending"
            });
        }
    }
}

fn write_element_line(out: &mut String, element: &VirtualNode, options: &SnapshotOptions) {
    out.push('<');
    out.push_str(element.tag_name());
    if let Some(key) = element.key() {
        out.push_str(" key=\"");
        write_escaped(out, key);
        out.push('"');
    }
    if let Some(namespace) = element.namespace() {
        out.push_str(" ns=\"");
        write_escaped(out, namespace);
        out.push('"');
    }
    if options.include_properties {
        for (name, value) in element.properties() {
            out.push(' ');
            out.push_str(name);
            out.push('=');
            match value {
                PropertyValue::Str(text) => {
                    out.push('"');
                    write_escaped(out, text);
                    out.push('"');
                }
                PropertyValue::Bool(flag) => {
                    let _ = write!(out, "{flag}");
                }
                PropertyValue::Number(number) => {
                    let _ = write!(out, "{number}");
                }
                PropertyValue::Object(object) => {
                    out.push_str(if object.as_hook().is_some() {
                        "hook"
                    } else {
                        "object"
                    });
                }
            }
        }
    }
    if options.include_metadata {
        let _ = write!(
            out,
            " count={} descendants={}",
            element.count(),
            element.descendants()
        );
        if element.has_widgets() {
            out.push_str(" +widgets");
        }
        if element.has_thunks() {
            out.push_str(" +thunks");
        }
        if element.hooks().is_some() {
            out.push_str(" +hooks");
        }
        if element.descendant_hooks() {
            out.push_str(" +descendant_hooks");
        }
    }
    out.push('>');
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}
