//! The node sum type shared by every tree position.
//!
//! Nodes are cheap handles: cloning a `Node` clones an `Arc`, never the
//! subtree behind it, so identity survives clones and `Node::ptr_eq` can be
//! used to tell "the same node" from "an equal node".

use crate::thunk::Thunk;
use crate::vnode::VirtualNode;
use crate::widget::Widget;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum Node {
    Element(Arc<VirtualNode>),
    Text(Arc<VirtualText>),
    Widget(Arc<dyn Widget>),
    Thunk(Arc<Thunk>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
    Widget,
    Thunk,
}

impl NodeKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Text => "text",
            Self::Widget => "widget",
            Self::Thunk => "thunk",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A text leaf. Two texts are equal when their strings are.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VirtualText {
    pub text: String,
}

impl VirtualText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(Arc::new(VirtualText::new(text)))
    }

    pub fn element(node: VirtualNode) -> Self {
        Node::Element(Arc::new(node))
    }

    pub fn widget<W: Widget + 'static>(widget: W) -> Self {
        Node::Widget(Arc::new(widget))
    }

    pub fn thunk(thunk: Thunk) -> Self {
        Node::Thunk(Arc::new(thunk))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Element(_) => NodeKind::Element,
            Node::Text(_) => NodeKind::Text,
            Node::Widget(_) => NodeKind::Widget,
            Node::Thunk(_) => NodeKind::Thunk,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_widget(&self) -> bool {
        matches!(self, Node::Widget(_))
    }

    pub fn is_thunk(&self) -> bool {
        matches!(self, Node::Thunk(_))
    }

    pub fn as_element(&self) -> Option<&VirtualNode> {
        match self {
            Node::Element(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&VirtualText> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_widget(&self) -> Option<&dyn Widget> {
        match self {
            Node::Widget(widget) => Some(widget.as_ref()),
            _ => None,
        }
    }

    pub fn as_thunk(&self) -> Option<&Thunk> {
        match self {
            Node::Thunk(thunk) => Some(thunk),
            _ => None,
        }
    }

    /// Number of nodes below this one. Leaves have none.
    pub fn count(&self) -> usize {
        match self {
            Node::Element(node) => node.count(),
            Node::Text(_) | Node::Widget(_) | Node::Thunk(_) => 0,
        }
    }

    /// True when both handles point at the same node.
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        match (a, b) {
            (Node::Element(a), Node::Element(b)) => Arc::ptr_eq(a, b),
            (Node::Text(a), Node::Text(b)) => Arc::ptr_eq(a, b),
            (Node::Widget(a), Node::Widget(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Node::Thunk(a), Node::Thunk(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<VirtualNode> for Node {
    fn from(node: VirtualNode) -> Self {
        Node::element(node)
    }
}

impl From<VirtualText> for Node {
    fn from(text: VirtualText) -> Self {
        Node::Text(Arc::new(text))
    }
}

impl From<Thunk> for Node {
    fn from(thunk: Thunk) -> Self {
        Node::thunk(thunk)
    }
}
