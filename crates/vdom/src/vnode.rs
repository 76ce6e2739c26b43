//! Structural tree nodes and their derived metadata.
//!
//! Contract:
//! - Metadata is computed once, in the constructor, from the node's own
//!   properties and the already-computed metadata of its direct children.
//!   Construction is O(properties + children), never O(subtree).
//! - `count == children.len() + descendants`.
//! - `descendants` sums `count` over element children only; text, widget and
//!   thunk children add 1 through `children.len()` and nothing else.
//! - `hooks` covers this node's own properties only. Hooks further down
//!   surface as `descendant_hooks`.
//! - Nodes are immutable after construction.

use crate::node::Node;
use crate::property::{HookMap, PropertyMap, PropertyValue, VirtualHook};
use std::sync::{Arc, OnceLock};

fn no_properties() -> Arc<PropertyMap> {
    static NO_PROPERTIES: OnceLock<Arc<PropertyMap>> = OnceLock::new();
    Arc::clone(NO_PROPERTIES.get_or_init(|| Arc::new(PropertyMap::new())))
}

fn no_children() -> Arc<[Node]> {
    static NO_CHILDREN: OnceLock<Arc<[Node]>> = OnceLock::new();
    Arc::clone(NO_CHILDREN.get_or_init(|| Arc::from(Vec::new())))
}

#[derive(Debug)]
pub struct VirtualNode {
    tag_name: Arc<str>,
    properties: Arc<PropertyMap>,
    children: Arc<[Node]>,
    key: Option<Arc<str>>,
    namespace: Option<Arc<str>>,
    count: usize,
    descendants: usize,
    has_widgets: bool,
    has_thunks: bool,
    descendant_hooks: bool,
    hooks: Option<HookMap>,
}

impl VirtualNode {
    /// Builds a node and computes its metadata.
    ///
    /// Absent or empty `properties`/`children` share one process-wide empty
    /// value.
    pub fn new(
        tag_name: impl Into<Arc<str>>,
        properties: Option<PropertyMap>,
        children: Option<Vec<Node>>,
        key: Option<&str>,
        namespace: Option<&str>,
    ) -> Self {
        let properties = match properties {
            Some(map) if !map.is_empty() => Arc::new(map),
            _ => no_properties(),
        };
        let children = match children {
            Some(list) if !list.is_empty() => Arc::from(list),
            _ => no_children(),
        };

        let hooks = HookMap::collect(&properties);

        let mut descendants = 0usize;
        let mut has_widgets = false;
        let mut has_thunks = false;
        let mut descendant_hooks = false;
        for child in children.iter() {
            match child {
                Node::Element(vchild) => {
                    descendants += vchild.count;
                    has_widgets |= vchild.has_widgets;
                    has_thunks |= vchild.has_thunks;
                    descendant_hooks |= vchild.hooks.is_some() || vchild.descendant_hooks;
                }
                Node::Widget(_) => has_widgets = true,
                Node::Thunk(_) => has_thunks = true,
                Node::Text(_) => {}
            }
        }

        let node = Self {
            tag_name: tag_name.into(),
            properties,
            count: children.len() + descendants,
            children,
            key: key.map(Arc::from),
            namespace: namespace.map(Arc::from),
            descendants,
            has_widgets,
            has_thunks,
            descendant_hooks,
            hooks,
        };

        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "vdom.node",
            "built <{}> count={} widgets={} thunks={} hooks={} descendant_hooks={}",
            node.tag_name,
            node.count,
            node.has_widgets,
            node.has_thunks,
            node.hooks.as_ref().map_or(0, HookMap::len),
            node.descendant_hooks
        );

        node
    }

    pub fn builder(tag_name: impl Into<Arc<str>>) -> ElementBuilder {
        ElementBuilder::new(tag_name)
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Nodes below this one, counted through element children.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sum of the element children's own `count`.
    pub fn descendants(&self) -> usize {
        self.descendants
    }

    pub fn has_widgets(&self) -> bool {
        self.has_widgets
    }

    pub fn has_thunks(&self) -> bool {
        self.has_thunks
    }

    pub fn hooks(&self) -> Option<&HookMap> {
        self.hooks.as_ref()
    }

    pub fn descendant_hooks(&self) -> bool {
        self.descendant_hooks
    }

    /// No widgets, thunks or hooks anywhere in this subtree, including on this
    /// node. A diff engine may compare such subtrees purely structurally.
    pub fn is_inert(&self) -> bool {
        !(self.has_widgets || self.has_thunks || self.descendant_hooks || self.hooks.is_some())
    }
}

/// Incremental construction of a [`VirtualNode`].
#[derive(Debug)]
pub struct ElementBuilder {
    tag_name: Arc<str>,
    properties: PropertyMap,
    children: Vec<Node>,
    key: Option<String>,
    namespace: Option<String>,
}

impl ElementBuilder {
    pub fn new(tag_name: impl Into<Arc<str>>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: PropertyMap::new(),
            children: Vec::new(),
            key: None,
            namespace: None,
        }
    }

    pub fn property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(Arc::from(name), value.into());
        self
    }

    pub fn hook<H: VirtualHook + 'static>(mut self, name: &str, hook: H) -> Self {
        self.properties.insert(Arc::from(name), PropertyValue::hook(hook));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn build(self) -> VirtualNode {
        VirtualNode::new(
            self.tag_name,
            Some(self.properties),
            Some(self.children),
            self.key.as_deref(),
            self.namespace.as_deref(),
        )
    }

    pub fn into_node(self) -> Node {
        Node::element(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::VirtualNode;
    use crate::node::Node;
    use crate::property::VirtualHook;
    use crate::thunk::Thunk;
    use crate::widget::Widget;
    use std::any::Any;

    #[derive(Debug)]
    struct Clock;

    impl Widget for Clock {}

    #[derive(Debug)]
    struct Focus;

    impl VirtualHook for Focus {
        fn hook(&self, _target: &mut dyn Any, _property: &str) {}
        fn unhook(&self, _target: &mut dyn Any, _property: &str) {}
    }

    fn lazy_text(text: &'static str) -> Thunk {
        Thunk::from_fn(move |_| Node::text(text))
    }

    #[test]
    fn empty_node_defaults() {
        let node = VirtualNode::new("br", None, None, None, None);
        assert_eq!(node.tag_name(), "br");
        assert!(node.properties().is_empty());
        assert!(node.children().is_empty());
        assert_eq!(node.count(), 0);
        assert_eq!(node.descendants(), 0);
        assert!(!node.descendant_hooks(), "no children means no descendant hooks");
        assert!(node.hooks().is_none());
        assert!(node.key().is_none());
        assert!(node.namespace().is_none());
        assert!(node.is_inert());
    }

    #[test]
    fn empty_defaults_are_shared() {
        let a = VirtualNode::new("a", None, None, None, None);
        let b = VirtualNode::new("b", Some(Default::default()), Some(Vec::new()), None, None);
        assert!(std::ptr::eq(a.properties(), b.properties()));
        assert!(std::ptr::eq(a.children().as_ptr(), b.children().as_ptr()));
    }

    #[test]
    fn count_folds_element_children_only() {
        let span = VirtualNode::builder("span").text("x").into_node();
        let div = VirtualNode::builder("div")
            .text("hi")
            .child(span.clone())
            .child(Node::widget(Clock))
            .child(lazy_text("later"))
            .build();
        let span = span.as_element().expect("span is an element");
        assert_eq!(span.count(), 1);
        assert_eq!(div.descendants(), 1);
        assert_eq!(div.count(), 4 + 1);
        assert_eq!(div.count(), div.children().len() + div.descendants());
    }

    #[test]
    fn widget_and_thunk_flags_propagate_upward() {
        let inner = VirtualNode::builder("li").child(Node::widget(Clock)).into_node();
        let list = VirtualNode::builder("ul").child(inner).into_node();
        let root = VirtualNode::builder("div")
            .child(list)
            .child(VirtualNode::builder("p").child(lazy_text("t")).build())
            .build();
        assert!(root.has_widgets());
        assert!(root.has_thunks());
        assert!(!root.is_inert());
    }

    #[test]
    fn hooks_are_own_properties_only() {
        let button = VirtualNode::builder("button")
            .property("type", "submit")
            .hook("focus", Focus)
            .into_node();
        let form = VirtualNode::builder("form").child(button.clone()).build();
        let button = button.as_element().expect("button is an element");

        let hooks = button.hooks().expect("button has hooks");
        assert_eq!(hooks.names().collect::<Vec<_>>(), vec!["focus"]);
        assert!(!button.descendant_hooks());

        assert!(form.hooks().is_none(), "child hooks must not leak into parent");
        assert!(form.descendant_hooks());
    }

    #[test]
    fn descendant_hooks_propagate_through_hookless_levels() {
        let leaf = VirtualNode::builder("input").hook("focus", Focus).into_node();
        let mid = VirtualNode::builder("label").child(leaf).into_node();
        let top = VirtualNode::builder("form").child(mid).build();
        assert!(top.descendant_hooks());
        assert!(top.hooks().is_none());
    }

    #[test]
    fn metadata_ignores_child_order() {
        let children = || {
            vec![
                Node::text("a"),
                VirtualNode::builder("b").text("c").into_node(),
                Node::widget(Clock),
                VirtualNode::builder("i").hook("focus", Focus).into_node(),
            ]
        };
        let forward = VirtualNode::builder("div").children(children()).build();
        let mut reversed_children = children();
        reversed_children.reverse();
        let reversed = VirtualNode::builder("div").children(reversed_children).build();

        assert_eq!(forward.count(), reversed.count());
        assert_eq!(forward.descendants(), reversed.descendants());
        assert_eq!(forward.has_widgets(), reversed.has_widgets());
        assert_eq!(forward.has_thunks(), reversed.has_thunks());
        assert_eq!(forward.descendant_hooks(), reversed.descendant_hooks());
    }

    #[test]
    fn key_and_namespace_are_carried() {
        let node = VirtualNode::builder("circle")
            .key("c1")
            .namespace("http://www.w3.org/2000/svg")
            .build();
        assert_eq!(node.key(), Some("c1"));
        assert_eq!(node.namespace(), Some("http://www.w3.org/2000/svg"));
    }
}
