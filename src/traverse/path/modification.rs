//! Container edits: insertion, removal and raw writes

use super::NodePath;
use crate::ast::builders::{assign, block_statement, expression_statement, identifier, undefined_node};
use crate::ast::helpers::{fresh_identities, verify_node_list};
use crate::ast::{Ast, Category, ListKind, Node, NodeKind, NodeType, SlotMut, SlotRole};
use crate::error::{Error, Result};

/// Expressions headed for a statement list become expression statements
pub(crate) fn wrap_for_list(nodes: Vec<Node>, kind: Option<ListKind>) -> Vec<Node> {
    if kind != Some(ListKind::Statements) {
        return nodes;
    }
    nodes
        .into_iter()
        .map(|node| {
            if node.is_expression() {
                expression_statement(node)
            } else {
                node
            }
        })
        .collect()
}

impl NodePath {
    /// Insert `nodes` after this one.
    ///
    /// Inside a list they are spliced in after this element. In a
    /// single-statement field the field becomes a block of this node
    /// followed by `nodes`. In an expression position the value is saved
    /// to a temporary, `nodes` run, and the temporary is the result.
    pub fn insert_after(&mut self, ast: &mut Ast, nodes: Vec<Node>) -> Result<()> {
        self.resync(ast);
        self.assert_unremoved()?;
        let mut nodes = nodes;
        fresh_identities(&ast.program, None, &mut nodes);
        verify_node_list(&nodes, None)?;

        if matches!(
            self.parent_type(ast),
            Some(NodeType::ExpressionStatement | NodeType::LabeledStatement)
        ) {
            let mut parent = self
                .parent_path(ast)
                .ok_or_else(|| Error::internal("statement without a parent"))?;
            return parent.insert_after(ast, nodes);
        }

        if self.is_node_type(ast, Category::Expression) || self.is_for_init(ast) {
            if let Some(current) = self.node(ast).cloned() {
                if current.is_statement() {
                    return Err(Error::invalid_operation(format!(
                        "cannot insert after a {} in an expression position",
                        current.node_type()
                    )));
                }
                let scope = self.enclosing_scope(ast);
                let temp = ast
                    .scopes
                    .generate_declared_uid(scope, &mut ast.program, "temp")?;
                let name = temp.identifier_name().unwrap_or_default().to_string();
                nodes.insert(0, expression_statement(assign(temp, current)));
                nodes.push(expression_statement(identifier(name)));
            }
            return self.replace_expression_with_statements(ast, nodes);
        }

        if self.index().is_some() {
            return self.insert_into_container_after(ast, nodes);
        }

        if self.is_statement_or_block(ast) {
            let mut body = Vec::with_capacity(nodes.len() + 1);
            if let Some(current) = self.node(ast) {
                body.push(current.clone());
            }
            body.extend(wrap_for_list(nodes, Some(ListKind::Statements)));
            return self.write(ast, block_statement(body));
        }

        Err(Error::invalid_operation(format!(
            "cannot insert after the node in {}.{}",
            self.parent_type(ast).map(|t| t.as_str()).unwrap_or("?"),
            self.key().unwrap_or("?")
        )))
    }

    /// Splice `nodes` into this path's list right after this element
    pub fn insert_into_container_after(&mut self, ast: &mut Ast, nodes: Vec<Node>) -> Result<()> {
        self.resync(ast);
        self.assert_unremoved()?;
        let (Some(key), Some(index)) = (self.key(), self.index()) else {
            return Err(Error::invalid_operation("path is not an element of a list"));
        };
        let kind = self.parent_node(ast).and_then(|p| p.list_kind(key));
        let mut nodes = nodes;
        fresh_identities(&ast.program, None, &mut nodes);
        verify_node_list(&nodes, kind)?;
        let nodes = wrap_for_list(nodes, kind);

        let enclosing = self.enclosing_scope(ast);
        for node in &nodes {
            ast.scopes.check_declaration(enclosing, node, None)?;
        }
        for node in &nodes {
            ast.scopes.register_declaration(enclosing, node)?;
        }

        let count = nodes.len();
        let list = self.container_list(ast)?;
        let at = (index + 1).min(list.len());
        list.splice(at..at, nodes);
        log::debug!("inserted {} nodes into {} after index {}", count, key, index);
        Ok(())
    }

    /// Append `nodes` to this node's list field `key`
    pub fn push_container(&mut self, ast: &mut Ast, key: &str, nodes: Vec<Node>) -> Result<()> {
        self.insert_into_own_list(ast, key, nodes, false)
    }

    /// Prepend `nodes` to this node's list field `key`
    pub fn unshift_container(&mut self, ast: &mut Ast, key: &str, nodes: Vec<Node>) -> Result<()> {
        self.insert_into_own_list(ast, key, nodes, true)
    }

    fn insert_into_own_list(
        &mut self,
        ast: &mut Ast,
        key: &str,
        nodes: Vec<Node>,
        at_start: bool,
    ) -> Result<()> {
        self.resync(ast);
        self.assert_unremoved()?;
        let node = self.require_node(ast)?;
        let kind = node.list_kind(key);
        if kind.is_none() {
            return Err(Error::invalid_operation(format!(
                "{} has no list field `{}`",
                node.node_type(),
                key
            )));
        }
        let mut nodes = nodes;
        fresh_identities(&ast.program, None, &mut nodes);
        verify_node_list(&nodes, kind)?;
        let nodes = wrap_for_list(nodes, kind);

        let scope = self.scope;
        for node in &nodes {
            ast.scopes.check_declaration(scope, node, None)?;
        }
        for node in &nodes {
            ast.scopes.register_declaration(scope, node)?;
        }

        let node = self
            .node_mut(ast)
            .ok_or_else(|| Error::internal("container vanished during insertion"))?;
        let Some(SlotMut::List(list)) = node.slot_mut(key) else {
            return Err(Error::internal("list field changed shape"));
        };
        if at_start {
            list.splice(0..0, nodes);
        } else {
            list.extend(nodes);
        }
        Ok(())
    }

    /// Remove this node from the tree.
    ///
    /// Removing the only meaningful part of a parent repairs the parent:
    /// an expression statement or labeled statement goes with its content,
    /// a binary expression collapses to its other operand, a loop body or
    /// `if` branch becomes `{}`, and an arrow body becomes `void 0`.
    pub fn remove(&mut self, ast: &mut Ast) -> Result<()> {
        self.resync(ast);
        self.assert_unremoved()?;
        let Some(key) = self.key() else {
            return Err(Error::invalid_operation("the program root cannot be removed"));
        };
        let parent = self
            .parent_node(ast)
            .ok_or_else(|| Error::internal("path without a parent node"))?;
        let parent_type = parent.node_type();
        let role = parent.slot_role(key);
        let parent_len = match &parent.kind {
            NodeKind::VariableDeclaration { declarations, .. } => declarations.len(),
            NodeKind::SequenceExpression { expressions } => expressions.len(),
            _ => 0,
        };

        self.forget_bindings(ast)?;

        if parent_type == NodeType::ArrowFunctionExpression && key == "body" {
            return self.write(ast, undefined_node());
        }

        let removes_parent = (parent_type == NodeType::ExpressionStatement && key == "expression")
            || (parent_type == NodeType::LabeledStatement && key == "body")
            || (parent_type == NodeType::VariableDeclaration && parent_len == 1);
        if removes_parent {
            let mut parent = self
                .parent_path(ast)
                .ok_or_else(|| Error::internal("path without a parent path"))?;
            parent.remove(ast)?;
            self.mark_removed();
            return Ok(());
        }

        if parent_type == NodeType::SequenceExpression && parent_len == 2 {
            let other = 1 - self.index().unwrap_or(0);
            let mut parent = self
                .parent_path(ast)
                .ok_or_else(|| Error::internal("path without a parent path"))?;
            let remaining = parent.get(ast, &format!("expressions.{}", other))?;
            let remaining = remaining.require_node(ast)?.clone();
            parent.replace_with(ast, remaining)?;
            self.mark_removed();
            return Ok(());
        }

        if matches!(
            parent_type,
            NodeType::BinaryExpression | NodeType::LogicalExpression
        ) {
            let other = if key == "left" { "right" } else { "left" };
            let mut parent = self
                .parent_path(ast)
                .ok_or_else(|| Error::internal("path without a parent path"))?;
            let remaining = parent.get(ast, other)?.require_node(ast)?.clone();
            parent.replace_with(ast, remaining)?;
            self.mark_removed();
            return Ok(());
        }

        if let Some(index) = self.index() {
            self.container_list(ast)?.remove(index);
            log::trace!("removed {}.{}", key, index);
            self.mark_removed();
            return Ok(());
        }

        let mut container = self.container_slot(ast)?;
        if let SlotMut::Optional(slot) = &mut container {
            **slot = None;
            self.clear_target();
            self.removed = true;
            return Ok(());
        }

        if role == SlotRole::Statement {
            return self.write(ast, block_statement(Vec::new()));
        }

        Err(Error::invalid_operation(format!(
            "{}.{} is required and cannot be removed",
            parent_type, key
        )))
    }

    /// Drop bindings introduced by this node from the frames around it
    fn forget_bindings(&self, ast: &mut Ast) -> Result<()> {
        let Some(id) = self.node_id() else {
            return Ok(());
        };
        let enclosing = self.enclosing_scope(ast);
        let function = ast.scopes.function_parent(enclosing);
        ast.scopes.remove_bindings_declared_by(enclosing, id)?;
        ast.scopes.remove_bindings_declared_by(function, id)
    }

    /// Mutable access to the field holding this path's node
    pub(crate) fn container_slot<'a>(&self, ast: &'a mut Ast) -> Result<SlotMut<'a>> {
        let (segment, parent) = self
            .segments
            .split_last()
            .ok_or_else(|| Error::invalid_operation("the program root has no container"))?;
        let parent = ast
            .node_at_mut(parent)
            .ok_or_else(|| Error::internal("parent of path no longer resolves"))?;
        let parent_type = parent.node_type();
        parent.slot_mut(segment.key).ok_or_else(|| Error::UnknownField {
            field: segment.key.to_string(),
            node: parent_type.to_string(),
        })
    }

    pub(crate) fn container_list<'a>(&self, ast: &'a mut Ast) -> Result<&'a mut Vec<Node>> {
        match self.container_slot(ast)? {
            SlotMut::List(list) => Ok(list),
            _ => Err(Error::invalid_operation("path is not an element of a list")),
        }
    }

    /// Store `node` at this path's position without any checks
    pub(crate) fn write(&mut self, ast: &mut Ast, node: Node) -> Result<()> {
        let (id, node_type) = (node.id, node.node_type());
        let index = self.index();
        match self.container_slot(ast)? {
            SlotMut::Single(slot) => **slot = node,
            SlotMut::Optional(slot) => *slot = Some(Box::new(node)),
            SlotMut::List(list) => {
                let index = index.ok_or_else(|| Error::internal("list element without index"))?;
                let entry = list
                    .get_mut(index)
                    .ok_or_else(|| Error::internal("list index out of range"))?;
                *entry = node;
            }
        }
        self.retarget(id, node_type);
        self.set_scope(ast);
        Ok(())
    }
}
