//! Tree fixture corpus: declarative trees with their expected metadata.
//!
//! Manifests are TOML or JSON (chosen by file extension) with the same
//! schema:
//!
//! ```toml
//! format = "vdom-fixtures-v1"
//!
//! [[cases]]
//! id = "text-only"
//! tree = { tag = "p", children = [{ text = "hi" }] }
//! expect = { count = 1, descendants = 0 }
//! ```

use crate::doubles::{CallLog, RecordingHook, StubWidget, call_log};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use vdom::{Node, PropertyMap, PropertyValue, Thunk, VirtualNode};

pub const FIXTURES_FORMAT_V1: &str = "vdom-fixtures-v1";

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureManifest {
    pub format: String,
    pub cases: Vec<TreeFixture>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeFixture {
    pub id: String,
    pub tree: NodeSpec,
    pub expect: ExpectedMetadata,
    /// Expected `TreeSnapshot` lines with default options.
    #[serde(default)]
    pub snapshot: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Element(ElementSpec),
    Text { text: String },
    Widget { widget: String },
    Thunk { thunk: Box<NodeSpec> },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub props: BTreeMap<String, PropSpec>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum PropSpec {
    Bool(bool),
    Number(f64),
    Str(String),
    Hook { hook: String },
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExpectedMetadata {
    pub count: usize,
    pub descendants: usize,
    #[serde(default)]
    pub has_widgets: bool,
    #[serde(default)]
    pub has_thunks: bool,
    #[serde(default)]
    pub descendant_hooks: bool,
    #[serde(default)]
    pub hooks: Vec<String>,
}

impl ExpectedMetadata {
    /// Reads the same fields off a built root.
    pub fn observed(root: &VirtualNode) -> Self {
        Self {
            count: root.count(),
            descendants: root.descendants(),
            has_widgets: root.has_widgets(),
            has_thunks: root.has_thunks(),
            descendant_hooks: root.descendant_hooks(),
            hooks: root
                .hooks()
                .map(|hooks| hooks.names().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

pub fn load_fixtures(path: &Path) -> Vec<TreeFixture> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture manifest {path:?}: {err}"));
    let manifest: FixtureManifest = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse fixture TOML {path:?}: {err}")),
        Some("json") => serde_json::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse fixture JSON {path:?}: {err}")),
        other => panic!("unsupported fixture manifest extension {other:?} for {path:?}"),
    };
    assert_eq!(
        manifest.format, FIXTURES_FORMAT_V1,
        "unsupported fixture manifest format in {path:?}"
    );
    let mut seen = BTreeSet::new();
    for case in &manifest.cases {
        assert!(
            seen.insert(case.id.as_str()),
            "duplicate fixture id in {path:?}: {}",
            case.id
        );
        if !matches!(case.tree, NodeSpec::Element(_)) {
            panic!("fixture '{}' in {path:?} must have an element root", case.id);
        }
    }
    manifest.cases
}

/// Builds fixture trees, recording widget and hook calls in one log.
#[derive(Debug)]
pub struct FixtureBuilder {
    log: CallLog,
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        Self { log: call_log() }
    }
}

impl FixtureBuilder {
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    pub fn build(&self, spec: &NodeSpec) -> Node {
        match spec {
            NodeSpec::Element(element) => Node::element(self.build_element(element)),
            NodeSpec::Text { text } => Node::text(text.as_str()),
            NodeSpec::Widget { widget } => Node::widget(StubWidget::new(widget, &self.log)),
            NodeSpec::Thunk { thunk } => {
                let rendered = self.build(thunk);
                Node::thunk(Thunk::from_fn(move |_| rendered.clone()))
            }
        }
    }

    fn build_element(&self, spec: &ElementSpec) -> VirtualNode {
        let properties: PropertyMap = spec
            .props
            .iter()
            .map(|(name, value)| (Arc::from(name.as_str()), self.build_property(value)))
            .collect();
        let children = spec.children.iter().map(|child| self.build(child)).collect();
        VirtualNode::new(
            spec.tag.as_str(),
            Some(properties),
            Some(children),
            spec.key.as_deref(),
            spec.namespace.as_deref(),
        )
    }

    fn build_property(&self, spec: &PropSpec) -> PropertyValue {
        match spec {
            PropSpec::Bool(flag) => PropertyValue::Bool(*flag),
            PropSpec::Number(number) => PropertyValue::Number(*number),
            PropSpec::Str(text) => PropertyValue::from(text.as_str()),
            PropSpec::Hook { hook } => PropertyValue::hook(RecordingHook::new(hook, &self.log)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExpectedMetadata, FixtureBuilder, FixtureManifest, NodeSpec, PropSpec};

    const MANIFEST: &str = r#"
format = "vdom-fixtures-v1"

[[cases]]
id = "hooked"
tree = { tag = "a", props = { href = "/", focus = { hook = "f" }, tabindex = 1 }, children = [{ widget = "w" }, { thunk = { text = "t" } }] }
expect = { count = 2, descendants = 0, has_widgets = true, has_thunks = true, hooks = ["focus"] }
"#;

    #[test]
    fn toml_manifest_parses_all_node_kinds() {
        let manifest: FixtureManifest = toml::from_str(MANIFEST).expect("manifest parses");
        let case = &manifest.cases[0];
        let NodeSpec::Element(root) = &case.tree else {
            panic!("root should be an element");
        };
        assert!(matches!(root.props["focus"], PropSpec::Hook { .. }));
        assert!(matches!(root.props["href"], PropSpec::Str(_)));
        assert!(matches!(root.props["tabindex"], PropSpec::Number(_)));
        assert!(matches!(root.children[0], NodeSpec::Widget { .. }));
        assert!(matches!(root.children[1], NodeSpec::Thunk { .. }));
    }

    #[test]
    fn built_tree_matches_expectation() {
        let manifest: FixtureManifest = toml::from_str(MANIFEST).expect("manifest parses");
        let case = &manifest.cases[0];
        let builder = FixtureBuilder::default();
        let root = builder.build(&case.tree);
        let root = root.as_element().expect("element root");
        assert_eq!(ExpectedMetadata::observed(root), case.expect);
    }
}
