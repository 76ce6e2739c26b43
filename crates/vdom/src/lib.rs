//! Virtual tree nodes, their precomputed diff metadata, lazy thunks, and the
//! patch vocabulary a diff engine emits for an applier.

#[cfg(any(test, feature = "tree-invariants"))]
pub mod invariants;
pub mod patch;
#[cfg(any(test, feature = "snapshot"))]
pub mod snapshot;
pub mod traverse;

mod node;
mod property;
mod thunk;
mod vnode;
mod widget;

pub use crate::node::{Node, NodeKind, VirtualText};
pub use crate::patch::{
    Move, PatchPayload, PatchSet, PropertyPatch, ReorderMap, VirtualPatch, VirtualPatchType,
};
pub use crate::property::{
    HookMap, HookProperty, ObjectProperty, PropertyMap, PropertyValue, VirtualHook,
};
pub use crate::thunk::{FnRender, Thunk, ThunkError, ThunkRender, handle_thunk};
pub use crate::traverse::{index_nodes, node_at_index};
pub use crate::vnode::{ElementBuilder, VirtualNode};
pub use crate::widget::Widget;
