//! Tree traversal
//!
//! A [`Visitor`] is an explicit table from node kind to handler functions.
//! [`traverse`] walks the descendants of a path in field order and calls the
//! handlers registered for each node's kind. Handlers may edit the tree
//! through the path they are given; the walk continues from the visited
//! node's original next sibling, so nodes a handler inserts in its place
//! are not visited.

pub mod path;

pub use path::{NodePath, PathSegment, Replacement};

use std::collections::HashMap;

use crate::ast::{Ast, Category, NodeId, NodeType, Slot};
use crate::error::Result;

/// Handler invoked for a visited node
pub type Handler<S> = fn(&mut NodePath, &mut Ast, &mut S) -> Result<()>;

/// Dispatch table from node kind to handlers
pub struct Visitor<S> {
    handlers: HashMap<NodeType, Vec<Handler<S>>>,
}

impl<S> Default for Visitor<S> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<S> Visitor<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for one node kind
    pub fn on(mut self, node_type: NodeType, handler: Handler<S>) -> Self {
        self.handlers.entry(node_type).or_default().push(handler);
        self
    }

    /// Register `handler` for every node kind in `category`
    pub fn on_category(mut self, category: Category, handler: Handler<S>) -> Self {
        for node_type in NodeType::ALL {
            if node_type.is(category) {
                self.handlers.entry(node_type).or_default().push(handler);
            }
        }
        self
    }

    pub fn handlers(&self, node_type: NodeType) -> &[Handler<S>] {
        self.handlers
            .get(&node_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Visit every descendant of `parent`
pub fn traverse<S>(ast: &mut Ast, parent: &NodePath, visitor: &Visitor<S>, state: &mut S) -> Result<()> {
    traverse_children(ast, parent.clone(), visitor, state).map(|_| ())
}

impl NodePath {
    /// Visit every descendant of this path
    pub fn traverse<S>(&self, ast: &mut Ast, visitor: &Visitor<S>, state: &mut S) -> Result<()> {
        traverse(ast, self, visitor, state)
    }
}

/// Returns `true` once a handler stopped the traversal
fn traverse_children<S>(
    ast: &mut Ast,
    mut parent: NodePath,
    visitor: &Visitor<S>,
    state: &mut S,
) -> Result<bool> {
    parent.resync(ast);
    let Some(node) = parent.node(ast) else {
        return Ok(false);
    };
    // (key, first element for list fields)
    let fields: Vec<(&'static str, Option<Option<NodeId>>)> = node
        .kind
        .slots()
        .into_iter()
        .map(|(key, slot)| match slot {
            Slot::List(nodes) => (key, Some(nodes.first().map(|n| n.id))),
            _ => (key, None),
        })
        .collect();

    for (key, list_start) in fields {
        let Some(first) = list_start else {
            parent.resync(ast);
            if parent.is_removed() {
                return Ok(false);
            }
            let mut path = parent.child(ast, key, None);
            if path.node_id().is_some() && visit(ast, &mut path, visitor, state)? {
                return Ok(true);
            }
            continue;
        };

        let mut next = first;
        while let Some(id) = next {
            parent.resync(ast);
            if parent.is_removed() {
                return Ok(false);
            }
            let position = parent
                .node(ast)
                .and_then(|node| match node.slot(key) {
                    Some(Slot::List(nodes)) => nodes
                        .iter()
                        .position(|n| n.id == id)
                        .map(|index| (index, nodes.get(index + 1).map(|n| n.id))),
                    _ => None,
                });
            let Some((index, following)) = position else {
                break;
            };
            next = following;

            let mut path = parent.child(ast, key, Some(index));
            if visit(ast, &mut path, visitor, state)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn visit<S>(ast: &mut Ast, path: &mut NodePath, visitor: &Visitor<S>, state: &mut S) -> Result<bool> {
    if let Some(node_type) = path.node_type() {
        log::trace!("visiting {} at {:?}", node_type, path.key());
        for handler in visitor.handlers(node_type) {
            handler(path, ast, state)?;
            if path.is_stopped() {
                return Ok(true);
            }
            if path.is_removed() || path.is_skipped() {
                break;
            }
            path.resync(ast);
            if path.node_type() != Some(node_type) {
                break;
            }
        }
    }

    if path.is_stopped() {
        return Ok(true);
    }
    if path.is_removed() || path.is_skipped() {
        return Ok(false);
    }
    traverse_children(ast, path.clone(), visitor, state)
}
