//! Lazily rendered subtrees.
//!
//! Contract:
//! - A `Thunk` renders at most once. The first resolution stores the
//!   rendered node in a write-once cell; later resolutions return the cached
//!   node regardless of the `previous` they are given.
//! - A resolved thunk must be an element, text, or widget. Anything else is
//!   `ThunkError::InvalidThunkResult`; the bad result stays cached, so every
//!   later resolution fails the same way without rendering again.
//! - `handle_thunk` resolves the new side with the old node as `previous`,
//!   then the old side with no `previous`.

use crate::node::{Node, NodeKind};
use std::fmt;
use std::sync::OnceLock;

/// Produces the subtree a [`Thunk`] stands for.
///
/// `previous` is the node that occupied the same position in the old tree,
/// when there is one.
pub trait ThunkRender: fmt::Debug + Send + Sync {
    fn render(&self, previous: Option<&Node>) -> Node;
}

/// A [`ThunkRender`] backed by a closure.
pub struct FnRender<F>(F);

impl<F> fmt::Debug for FnRender<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnRender")
    }
}

impl<F> ThunkRender for FnRender<F>
where
    F: Fn(Option<&Node>) -> Node + Send + Sync,
{
    fn render(&self, previous: Option<&Node>) -> Node {
        (self.0)(previous)
    }
}

#[derive(Debug)]
pub enum ThunkError {
    /// The renderer produced a node that is not an element, text, or widget.
    InvalidThunkResult(NodeKind),
}

impl fmt::Display for ThunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThunkError::InvalidThunkResult(kind) => {
                write!(f, "thunk did not return a valid node (got {kind})")
            }
        }
    }
}

impl std::error::Error for ThunkError {}

#[derive(Debug)]
pub struct Thunk {
    renderer: Box<dyn ThunkRender>,
    vnode: OnceLock<Node>,
}

impl Thunk {
    pub fn new<R: ThunkRender + 'static>(renderer: R) -> Self {
        Self {
            renderer: Box::new(renderer),
            vnode: OnceLock::new(),
        }
    }

    pub fn from_fn<F>(render: F) -> Self
    where
        F: Fn(Option<&Node>) -> Node + Send + Sync + 'static,
    {
        Self::new(FnRender(render))
    }

    /// The cached render, if this thunk has been resolved.
    pub fn vnode(&self) -> Option<&Node> {
        self.vnode.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.vnode.get().is_some()
    }

    /// Renders on first use and returns the cached node afterwards.
    ///
    /// A renderer must not resolve its own thunk.
    pub fn resolve(&self, previous: Option<&Node>) -> Result<Node, ThunkError> {
        let mut rendered_now = false;
        let rendered = self.vnode.get_or_init(|| {
            rendered_now = true;
            self.renderer.render(previous)
        });
        if rendered_now {
            log::trace!(
                target: "vdom.thunk",
                "rendered thunk to {} (previous: {})",
                rendered.kind(),
                previous.map_or("none", |node| node.kind().label())
            );
        } else {
            log::trace!(target: "vdom.thunk", "reused cached {} render", rendered.kind());
        }

        match rendered {
            Node::Element(_) | Node::Text(_) | Node::Widget(_) => Ok(rendered.clone()),
            Node::Thunk(_) => {
                log::debug!(
                    target: "vdom.thunk",
                    "thunk resolved to an unrendered {}",
                    rendered.kind()
                );
                Err(ThunkError::InvalidThunkResult(rendered.kind()))
            }
        }
    }
}

/// Replaces thunks at one old/new position pair with their rendered nodes.
///
/// `b` (new) is resolved against `a` (old) first. `a` is resolved with no
/// previous node; an old thunk is normally already cached from the pass that
/// introduced it, in which case this only returns the cached node.
pub fn handle_thunk(a: &Node, b: &Node) -> Result<(Node, Node), ThunkError> {
    let rendered_b = match b {
        Node::Thunk(thunk) => thunk.resolve(Some(a))?,
        _ => b.clone(),
    };
    let rendered_a = match a {
        Node::Thunk(thunk) => thunk.resolve(None)?,
        _ => a.clone(),
    };
    Ok((rendered_a, rendered_b))
}
