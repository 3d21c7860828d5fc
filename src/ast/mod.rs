//! Syntax tree module
//!
//! The module is organized into sub-modules by functionality:
//!
//! - `node`: the tagged node model and child slot access
//! - `builders`: node constructors
//! - `helpers`: comment inheritance, sequence folding, node-list verification
//!
//! [`Ast`] owns a parsed program together with the scope frames derived
//! from it. Paths into the tree ([`crate::traverse::NodePath`]) borrow it
//! only for the duration of each operation.

pub mod builders;
pub mod helpers;
pub mod node;

pub use node::{
    Category, Comment, CommentKind, DeclarationKind, ListKind, Node, NodeExtra, NodeId, NodeKind,
    NodeType, Slot, SlotMut, SlotRole,
};

use crate::error::{Error, Result};
use crate::scope::ScopeTree;
use crate::traverse::{NodePath, PathSegment};

/// A program and its scope frames
#[derive(Debug, Clone)]
pub struct Ast {
    pub program: Node,
    pub scopes: ScopeTree,
}

impl Ast {
    /// Wrap a `Program` node
    pub fn new(program: Node) -> Result<Self> {
        if !program.is_program() {
            return Err(Error::invalid_operation(format!(
                "expected a Program root, found {}",
                program.node_type()
            )));
        }
        Ok(Self {
            program,
            scopes: ScopeTree::new(),
        })
    }

    /// Parse source text into a program
    pub fn parse(source: &str) -> Result<Self> {
        Self::new(crate::parser::parse(source)?)
    }

    /// Print the program as source text
    pub fn print(&self) -> Result<String> {
        crate::codegen::generate(&self.program)
    }

    /// Serialize the program as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.program).map_err(|e| Error::Codegen {
            message: e.to_string(),
        })
    }

    /// Path to the program root
    pub fn root(&mut self) -> NodePath {
        NodePath::root(self)
    }

    /// Path at a dotted route below the program, e.g. `body.0.expression`
    pub fn path(&mut self, route: &str) -> Result<NodePath> {
        let root = self.root();
        if route.is_empty() {
            return Ok(root);
        }
        root.get(self, route)
    }

    /// Node at the end of a route, if every step still resolves
    pub fn node_at(&self, segments: &[PathSegment]) -> Option<&Node> {
        let mut node = &self.program;
        for segment in segments {
            node = node.child(segment.key, segment.index)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, segments: &[PathSegment]) -> Option<&mut Node> {
        let mut node = &mut self.program;
        for segment in segments {
            node = node.child_mut(segment.key, segment.index)?;
        }
        Some(node)
    }

    /// Route from the program root to the node with identity `id`
    pub fn find_route(&self, id: NodeId) -> Option<Vec<PathSegment>> {
        let mut route = Vec::new();
        if self.program.id == id || search_route(&self.program, id, &mut route) {
            Some(route)
        } else {
            None
        }
    }
}

fn search_route(node: &Node, id: NodeId, route: &mut Vec<PathSegment>) -> bool {
    for (key, slot) in node.kind.slots() {
        let children: Vec<(Option<usize>, &Node)> = match slot {
            Slot::Single(child) => vec![(None, child)],
            Slot::Optional(Some(child)) => vec![(None, child)],
            Slot::Optional(None) => Vec::new(),
            Slot::List(nodes) => nodes.iter().enumerate().map(|(i, n)| (Some(i), n)).collect(),
        };
        for (index, child) in children {
            route.push(PathSegment {
                key,
                index,
                node_id: Some(child.id),
            });
            if child.id == id || search_route(child, id, route) {
                return true;
            }
            route.pop();
        }
    }
    false
}
