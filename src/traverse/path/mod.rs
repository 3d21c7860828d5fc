//! Paths: non-owning locators into an [`Ast`]
//!
//! A path records the route from the program root to one position
//! (field key plus list index per step) along with the identity of the node
//! found there. Every operation re-synchronizes the route against the live
//! tree first, so a path survives edits made through other paths as long
//! as its node is still somewhere in the tree.

mod conversion;
mod hoisting;
mod introspection;
mod modification;
mod replacement;

pub use replacement::Replacement;

use crate::ast::{Ast, Node, NodeId, NodeType, Slot};
use crate::error::{Error, Result};
use crate::scope::ScopeId;

/// One step of a route: the field `key` of the previous node, and the
/// element `index` when that field is a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment {
    pub key: &'static str,
    pub index: Option<usize>,
    /// Node found at this step; `None` for an empty optional field
    pub node_id: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct NodePath {
    segments: Vec<PathSegment>,
    root_id: NodeId,
    node_type: Option<NodeType>,
    scope: ScopeId,
    removed: bool,
    skip: bool,
    stop: bool,
}

impl NodePath {
    /// Path to the program root
    pub fn root(ast: &mut Ast) -> Self {
        Self::from_segments(ast, Vec::new())
    }

    pub(crate) fn from_segments(ast: &mut Ast, segments: Vec<PathSegment>) -> Self {
        let node_type = ast.node_at(&segments).map(Node::node_type);
        let scope = ast.scopes.resolve(&ast.program, &segments, true);
        Self {
            segments,
            root_id: ast.program.id,
            node_type,
            scope,
            removed: false,
            skip: false,
            stop: false,
        }
    }

    pub fn node_id(&self) -> Option<NodeId> {
        match self.segments.last() {
            Some(segment) => segment.node_id,
            None => Some(self.root_id),
        }
    }

    /// Cached kind of the node at this path
    pub fn node_type(&self) -> Option<NodeType> {
        self.node_type
    }

    pub fn is(&self, node_type: NodeType) -> bool {
        self.node_type == Some(node_type)
    }

    /// Innermost scope frame, the node's own frame if it owns one
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Field of the parent holding this node
    pub fn key(&self) -> Option<&'static str> {
        self.segments.last().map(|segment| segment.key)
    }

    /// Position in the parent's list field
    pub fn index(&self) -> Option<usize> {
        self.segments.last().and_then(|segment| segment.index)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Do not descend into this node's children
    pub fn skip(&mut self) {
        self.skip = true;
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    /// End the whole traversal
    pub fn stop(&mut self) {
        self.stop = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stop
    }

    /// Node at this path, unless removed or the route no longer resolves
    pub fn node<'a>(&self, ast: &'a Ast) -> Option<&'a Node> {
        if self.removed {
            return None;
        }
        ast.node_at(&self.segments)
    }

    pub fn require_node<'a>(&self, ast: &'a Ast) -> Result<&'a Node> {
        self.node(ast)
            .ok_or_else(|| Error::invalid_operation("path does not point at a node"))
    }

    pub(crate) fn node_mut<'a>(&self, ast: &'a mut Ast) -> Option<&'a mut Node> {
        if self.removed {
            return None;
        }
        ast.node_at_mut(&self.segments)
    }

    pub fn parent_node<'a>(&self, ast: &'a Ast) -> Option<&'a Node> {
        let (_, parent) = self.segments.split_last()?;
        ast.node_at(parent)
    }

    pub fn parent_type(&self, ast: &Ast) -> Option<NodeType> {
        self.parent_node(ast).map(Node::node_type)
    }

    pub fn parent_path(&self, ast: &mut Ast) -> Option<NodePath> {
        let (_, parent) = self.segments.split_last()?;
        Some(Self::from_segments(ast, parent.to_vec()))
    }

    /// Path to `key`/`index` directly below this one
    pub(crate) fn child(&self, ast: &mut Ast, key: &'static str, index: Option<usize>) -> NodePath {
        let node_id = self
            .node(ast)
            .and_then(|node| node.child(key, index))
            .map(|child| child.id);
        let mut segments = self.segments.clone();
        segments.push(PathSegment {
            key,
            index,
            node_id,
        });
        Self::from_segments(ast, segments)
    }

    /// Path at a dotted route below this one, e.g. `callee.body` or `body.0`
    pub fn get(&self, ast: &mut Ast, route: &str) -> Result<NodePath> {
        let segments = {
            let mut node = Some(self.require_node(ast)?);
            let mut segments = self.segments.clone();
            let mut parts = route.split('.').peekable();
            while let Some(part) = parts.next() {
                let current = node.ok_or_else(|| {
                    Error::invalid_operation(format!("`{}` does not exist in `{}`", part, route))
                })?;
                let (key, slot) = current
                    .kind
                    .slots()
                    .into_iter()
                    .find(|(key, _)| *key == part)
                    .ok_or_else(|| Error::UnknownField {
                        field: part.to_string(),
                        node: current.node_type().to_string(),
                    })?;
                node = match slot {
                    Slot::Single(child) => {
                        segments.push(PathSegment {
                            key,
                            index: None,
                            node_id: Some(child.id),
                        });
                        Some(child)
                    }
                    Slot::Optional(child) => {
                        segments.push(PathSegment {
                            key,
                            index: None,
                            node_id: child.map(|c| c.id),
                        });
                        child
                    }
                    Slot::List(nodes) => {
                        let index = parts
                            .next()
                            .and_then(|p| p.parse::<usize>().ok())
                            .ok_or_else(|| {
                                Error::invalid_operation(format!(
                                    "`{}` is a list; address an element with `{}.<index>`",
                                    key, key
                                ))
                            })?;
                        let child = nodes.get(index).ok_or_else(|| {
                            Error::invalid_operation(format!(
                                "`{}` has {} elements, no element {}",
                                key,
                                nodes.len(),
                                index
                            ))
                        })?;
                        segments.push(PathSegment {
                            key,
                            index: Some(index),
                            node_id: Some(child.id),
                        });
                        Some(child)
                    }
                };
            }
            segments
        };
        Ok(Self::from_segments(ast, segments))
    }

    /// Paths to every element of the list field `key`
    pub fn get_list(&self, ast: &mut Ast, key: &str) -> Result<Vec<NodePath>> {
        let (key, ids) = {
            let node = self.require_node(ast)?;
            match node.kind.slots().into_iter().find(|(k, _)| *k == key) {
                Some((key, Slot::List(nodes))) => (key, nodes.iter().map(|n| n.id).collect::<Vec<_>>()),
                Some(_) => {
                    return Err(Error::invalid_operation(format!("`{}` is not a list", key)))
                }
                None => {
                    return Err(Error::UnknownField {
                        field: key.to_string(),
                        node: node.node_type().to_string(),
                    })
                }
            }
        };

        Ok(ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| {
                let mut segments = self.segments.clone();
                segments.push(PathSegment {
                    key,
                    index: Some(index),
                    node_id: Some(id),
                });
                Self::from_segments(ast, segments)
            })
            .collect())
    }

    /// Re-locate this path's node in the live tree.
    ///
    /// List positions are looked up again by node identity; if the route
    /// itself broke, the node is searched for from the root. A node that is
    /// no longer anywhere in the tree marks the path removed.
    pub fn resync(&mut self, ast: &Ast) {
        if self.removed {
            return;
        }
        if ast.program.id != self.root_id {
            self.mark_removed();
            return;
        }

        if !self.resync_route(ast) {
            match self.node_id().and_then(|id| ast.find_route(id)) {
                Some(route) => {
                    log::trace!("path to #{:?} relocated", self.node_id());
                    self.segments = route;
                }
                None => {
                    log::warn!(
                        "path to {:?} #{:?} no longer resolves; treating it as removed",
                        self.node_type,
                        self.node_id()
                    );
                    self.mark_removed();
                    return;
                }
            }
        }
        self.node_type = ast.node_at(&self.segments).map(Node::node_type);
    }

    fn resync_route(&mut self, ast: &Ast) -> bool {
        let mut node = &ast.program;
        let last = self.segments.len().saturating_sub(1);
        for (i, segment) in self.segments.iter_mut().enumerate() {
            match node.slot(segment.key) {
                Some(Slot::List(nodes)) => {
                    let matches = segment
                        .index
                        .and_then(|index| nodes.get(index))
                        .map(|n| Some(n.id) == segment.node_id)
                        .unwrap_or(false);
                    let index = if matches {
                        segment.index
                    } else {
                        segment
                            .node_id
                            .and_then(|id| nodes.iter().position(|n| n.id == id))
                    };
                    match index {
                        Some(index) => {
                            segment.index = Some(index);
                            node = &nodes[index];
                        }
                        None => return false,
                    }
                }
                Some(Slot::Single(child)) if Some(child.id) == segment.node_id => node = child,
                Some(Slot::Optional(child)) => match (child, segment.node_id) {
                    (Some(child), Some(id)) if child.id == id => node = child,
                    (None, None) if i == last => {}
                    (Some(child), None) if i == last => {
                        segment.node_id = Some(child.id);
                    }
                    _ => return false,
                },
                _ => return false,
            }
        }
        true
    }

    /// Recompute the scope frame from the current route
    pub fn set_scope(&mut self, ast: &mut Ast) {
        self.scope = ast.scopes.resolve(&ast.program, &self.segments, true);
    }

    /// Frame the node sits in, ignoring a frame the node owns itself
    pub fn enclosing_scope(&self, ast: &mut Ast) -> ScopeId {
        ast.scopes.resolve(&ast.program, &self.segments, false)
    }

    /// Run a multi-step edit; if it fails, put the tree and this path back
    /// the way they were
    pub(crate) fn atomically(
        &mut self,
        ast: &mut Ast,
        edit: impl FnOnce(&mut NodePath, &mut Ast) -> Result<()>,
    ) -> Result<()> {
        let (saved_ast, saved_path) = (ast.clone(), self.clone());
        if let Err(err) = edit(self, ast) {
            log::debug!("restoring tree after failed edit: {}", err);
            *ast = saved_ast;
            *self = saved_path;
            return Err(err);
        }
        Ok(())
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
        self.node_type = None;
    }

    pub(crate) fn assert_unremoved(&self) -> Result<()> {
        if self.removed {
            return Err(Error::invalid_operation(
                "this path's node was already removed",
            ));
        }
        Ok(())
    }

    /// Point the final segment at a node newly written into the container
    pub(crate) fn retarget(&mut self, node_id: NodeId, node_type: NodeType) {
        if let Some(segment) = self.segments.last_mut() {
            segment.node_id = Some(node_id);
        } else {
            self.root_id = node_id;
        }
        self.node_type = Some(node_type);
    }

    pub(crate) fn clear_target(&mut self) {
        if let Some(segment) = self.segments.last_mut() {
            segment.node_id = None;
        }
        self.node_type = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    fn sample() -> Ast {
        Ast::new(program(vec![
            expression_statement(identifier("a")),
            expression_statement(call_expression(identifier("f"), vec![identifier("x")])),
        ]))
        .unwrap()
    }

    #[test]
    fn test_get_dotted_route() {
        let mut ast = sample();
        let path = ast.path("body.1.expression.arguments.0").unwrap();
        assert_eq!(path.node_type(), Some(NodeType::Identifier));
        assert_eq!(path.key(), Some("arguments"));
        assert_eq!(path.index(), Some(0));
        assert_eq!(path.node(&ast).and_then(Node::identifier_name), Some("x"));
    }

    #[test]
    fn test_get_errors() {
        let mut ast = sample();
        let root = ast.root();
        assert!(matches!(
            root.get(&mut ast, "callee"),
            Err(Error::UnknownField { .. })
        ));
        assert!(matches!(
            root.get(&mut ast, "body"),
            Err(Error::InvalidOperation { .. })
        ));
        assert!(root.get(&mut ast, "body.7").is_err());
    }

    #[test]
    fn test_resync_follows_list_shift() {
        let mut ast = sample();
        let mut path = ast.path("body.1").unwrap();
        if let crate::ast::NodeKind::Program { body } = &mut ast.program.kind {
            body.insert(0, empty_statement());
        }
        path.resync(&ast);
        assert_eq!(path.index(), Some(2));
        assert!(!path.is_removed());
    }

    #[test]
    fn test_resync_marks_missing_node_removed() {
        let mut ast = sample();
        let mut path = ast.path("body.0").unwrap();
        if let crate::ast::NodeKind::Program { body } = &mut ast.program.kind {
            body.remove(0);
        }
        path.resync(&ast);
        assert!(path.is_removed());
        assert!(path.node(&ast).is_none());
    }

    #[test]
    fn test_failed_edit_is_rolled_back() {
        let mut ast = sample();
        let mut path = ast.path("body.0").unwrap();
        let result = path.atomically(&mut ast, |path, ast| {
            path.replace_with(ast, expression_statement(identifier("z")))?;
            path.insert_after(ast, vec![expression_statement(identifier("w"))])?;
            Err(Error::internal("late failure"))
        });

        assert!(matches!(result, Err(Error::Internal { .. })));
        assert_eq!(ast.print().unwrap(), "a;\nf(x);\n");
        let statement = path.node(&ast).unwrap();
        assert!(matches!(
            &statement.kind,
            crate::ast::NodeKind::ExpressionStatement { expression }
                if expression.identifier_name() == Some("a")
        ));
    }

    #[test]
    fn test_get_list() {
        let mut ast = sample();
        let root = ast.root();
        let statements = root.get_list(&mut ast, "body").unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].index(), Some(1));
        assert!(root.get_list(&mut ast, "expression").is_err());
    }
}
