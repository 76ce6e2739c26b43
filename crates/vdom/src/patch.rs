//! Patch vocabulary exchanged between a diff engine and a patch applier.
//!
//! This module defines the shape of patches only. Producing them (diffing)
//! and executing them against a render target both happen elsewhere.
//!
//! Invariants:
//! - `VirtualPatchType` values are stable wire integers (`NONE = 0` through
//!   `THUNK = 8`) and must never be renumbered.
//! - A `PatchSet` keys patches by the pre-order index of the node they
//!   target in the *old* tree, root = 0 (see `traverse`).
//! - Patches for one index are applied in push order.

use crate::node::{Node, VirtualText};
use crate::property::PropertyValue;
use crate::traverse::index_nodes;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VirtualPatchType {
    /// No-op placeholder.
    None = 0,
    /// Replace text content.
    VText = 1,
    /// Replace with a full node.
    VNode = 2,
    /// Widget mount, update or destroy, depending on the payload.
    Widget = 3,
    /// Apply a property diff.
    Props = 4,
    /// Reorder children.
    Order = 5,
    /// Insert a child.
    Insert = 6,
    /// Remove a child.
    Remove = 7,
    /// Re-render a thunk and graft its result.
    Thunk = 8,
}

impl VirtualPatchType {
    pub const ALL: [VirtualPatchType; 9] = [
        Self::None,
        Self::VText,
        Self::VNode,
        Self::Widget,
        Self::Props,
        Self::Order,
        Self::Insert,
        Self::Remove,
        Self::Thunk,
    ];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::VText),
            2 => Some(Self::VNode),
            3 => Some(Self::Widget),
            4 => Some(Self::Props),
            5 => Some(Self::Order),
            6 => Some(Self::Insert),
            7 => Some(Self::Remove),
            8 => Some(Self::Thunk),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::VText => "VTEXT",
            Self::VNode => "VNODE",
            Self::Widget => "WIDGET",
            Self::Props => "PROPS",
            Self::Order => "ORDER",
            Self::Insert => "INSERT",
            Self::Remove => "REMOVE",
            Self::Thunk => "THUNK",
        }
    }
}

impl fmt::Display for VirtualPatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Property changes for one node. `None` removes the property.
pub type PropertyPatch = BTreeMap<Arc<str>, Option<PropertyValue>>;

/// One child move inside a reorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    /// Child index the move reads from (removes) or writes to (inserts).
    pub index: usize,
    pub key: Option<Arc<str>>,
}

/// Child reordering: apply all `removes` (in order), then all `inserts`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReorderMap {
    pub removes: Vec<Move>,
    pub inserts: Vec<Move>,
}

impl ReorderMap {
    pub fn is_empty(&self) -> bool {
        self.removes.is_empty() && self.inserts.is_empty()
    }
}

/// Payload carried by a patch. Its meaning is agreed between the diff engine
/// and the applier.
#[derive(Clone, Debug)]
pub enum PatchPayload {
    None,
    Text(Arc<VirtualText>),
    Node(Node),
    Widget(Node),
    Props(PropertyPatch),
    Order(ReorderMap),
    Insert(Node),
    Remove,
    Thunk(Node),
}

#[derive(Clone, Debug)]
pub struct VirtualPatch {
    pub kind: VirtualPatchType,
    /// The node at the patched position.
    pub vnode: Node,
    pub patch: PatchPayload,
}

impl VirtualPatch {
    pub fn new(kind: VirtualPatchType, vnode: Node, patch: PatchPayload) -> Self {
        Self { kind, vnode, patch }
    }

    pub fn none(vnode: Node) -> Self {
        Self::new(VirtualPatchType::None, vnode, PatchPayload::None)
    }

    pub fn vtext(vnode: Node, text: Arc<VirtualText>) -> Self {
        Self::new(VirtualPatchType::VText, vnode, PatchPayload::Text(text))
    }

    pub fn vnode(vnode: Node, replacement: Node) -> Self {
        Self::new(VirtualPatchType::VNode, vnode, PatchPayload::Node(replacement))
    }

    pub fn widget(vnode: Node, widget: Node) -> Self {
        Self::new(VirtualPatchType::Widget, vnode, PatchPayload::Widget(widget))
    }

    pub fn props(vnode: Node, changes: PropertyPatch) -> Self {
        Self::new(VirtualPatchType::Props, vnode, PatchPayload::Props(changes))
    }

    pub fn order(vnode: Node, moves: ReorderMap) -> Self {
        Self::new(VirtualPatchType::Order, vnode, PatchPayload::Order(moves))
    }

    pub fn insert(vnode: Node, child: Node) -> Self {
        Self::new(VirtualPatchType::Insert, vnode, PatchPayload::Insert(child))
    }

    pub fn remove(vnode: Node) -> Self {
        Self::new(VirtualPatchType::Remove, vnode, PatchPayload::Remove)
    }

    pub fn thunk(vnode: Node, rendered: Node) -> Self {
        Self::new(VirtualPatchType::Thunk, vnode, PatchPayload::Thunk(rendered))
    }
}

/// All patches for one old-tree root, keyed by pre-order index.
#[derive(Clone, Debug)]
pub struct PatchSet {
    root: Node,
    patches: BTreeMap<usize, Vec<VirtualPatch>>,
}

impl PatchSet {
    pub fn new(root: Node) -> Self {
        Self {
            root,
            patches: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn push(&mut self, index: usize, patch: VirtualPatch) {
        self.patches.entry(index).or_default().push(patch);
    }

    pub fn get(&self, index: usize) -> &[VirtualPatch] {
        self.patches.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.patches.keys().copied()
    }

    /// Number of patched positions.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[VirtualPatch])> {
        self.patches
            .iter()
            .map(|(index, patches)| (*index, patches.as_slice()))
    }

    /// Resolves every patched index to its node in the root tree.
    ///
    /// Indices past the end of the tree are left out.
    pub fn targets(&self) -> BTreeMap<usize, &Node> {
        let wanted: BTreeSet<usize> = self.patches.keys().copied().collect();
        index_nodes(&self.root, &wanted)
    }
}
