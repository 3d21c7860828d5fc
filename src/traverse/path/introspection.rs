//! Questions a path can answer about its position

use super::NodePath;
use crate::ast::{Ast, Category, Node, NodeId, NodeType, SlotRole};
use crate::error::Result;

impl NodePath {
    pub fn is_loop(&self) -> bool {
        self.node_type.map_or(false, |t| t.is_loop())
    }

    /// Whether the cached node kind belongs to `category`
    pub fn is_previous_type(&self, category: Category) -> bool {
        self.node_type.map_or(false, |t| t.is(category))
    }

    /// Whether this position holds a node of `category`.
    ///
    /// Uses the cached kind when there is a node, and the role of the field
    /// otherwise.
    pub fn is_node_type(&self, ast: &Ast, category: Category) -> bool {
        if self.node_type.is_some() {
            return self.is_previous_type(category);
        }
        match (self.slot_role(ast), category) {
            (SlotRole::Statement, Category::Statement) => true,
            (SlotRole::Expression, Category::Expression) => true,
            _ => false,
        }
    }

    /// Role of the field this path sits in
    pub fn slot_role(&self, ast: &Ast) -> SlotRole {
        match (self.parent_node(ast), self.key()) {
            (Some(parent), Some(key)) if self.index().is_none() => parent.slot_role(key),
            _ => SlotRole::Other,
        }
    }

    /// Single-statement field such as an `if` branch or a loop body
    pub fn is_statement_or_block(&self, ast: &Ast) -> bool {
        self.index().is_none() && self.slot_role(ast) == SlotRole::Statement
    }

    /// `for (init;;)`, `for (left in ...)` and `for (left of ...)` accept
    /// both declarations and expressions
    pub fn can_have_variable_declaration_or_expression(&self, ast: &Ast) -> bool {
        match (self.parent_type(ast), self.key()) {
            (Some(NodeType::ForStatement), Some("init")) => true,
            (Some(NodeType::ForInStatement | NodeType::ForOfStatement), Some("left")) => true,
            _ => false,
        }
    }

    pub(crate) fn is_for_init(&self, ast: &Ast) -> bool {
        self.parent_type(ast) == Some(NodeType::ForStatement) && self.key() == Some("init")
    }

    /// An arrow function body may switch between a block and an expression
    pub fn can_swap_between_expression_and_statement(&self, ast: &Ast, replacement: &Node) -> bool {
        if self.key() != Some("body")
            || self.parent_type(ast) != Some(NodeType::ArrowFunctionExpression)
        {
            return false;
        }
        if self.is_previous_type(Category::Expression) {
            replacement.node_type() == NodeType::BlockStatement
        } else if self.is(NodeType::BlockStatement) {
            replacement.is_expression()
        } else {
            false
        }
    }

    /// Nearest ancestor satisfying `predicate`
    pub fn find_parent(
        &self,
        ast: &mut Ast,
        mut predicate: impl FnMut(&NodePath) -> bool,
    ) -> Option<NodePath> {
        let mut current = self.parent_path(ast);
        while let Some(path) = current {
            if predicate(&path) {
                return Some(path);
            }
            current = path.parent_path(ast);
        }
        None
    }

    /// Like [`NodePath::find_parent`], giving up on reaching `boundary`
    pub fn find_parent_within(
        &self,
        ast: &mut Ast,
        boundary: NodeId,
        mut predicate: impl FnMut(&NodePath) -> bool,
    ) -> Option<NodePath> {
        self.find_parent(ast, |path| path.node_id() == Some(boundary) || predicate(path))
            .filter(|path| path.node_id() != Some(boundary))
    }

    /// Paths whose value becomes the completion value of this node.
    ///
    /// Branches of an `if` and every part of a `try` contribute; loops,
    /// functions, labels and catch clauses defer to their body; blocks and
    /// programs to their last statement. Anything else is its own record.
    pub fn completion_records(&self, ast: &mut Ast) -> Result<Vec<NodePath>> {
        let mut records = Vec::new();
        self.collect_completion_records(ast, &mut records)?;
        Ok(records)
    }

    fn collect_completion_records(&self, ast: &mut Ast, records: &mut Vec<NodePath>) -> Result<()> {
        let Some(node_type) = self.node_type.filter(|_| !self.removed) else {
            return Ok(());
        };

        let keys: &[&str] = match node_type {
            NodeType::IfStatement => &["consequent", "alternate"],
            NodeType::TryStatement => &["block", "handler"],
            NodeType::CatchClause | NodeType::LabeledStatement => &["body"],
            t if t.is_loop() || t.is_function() => &["body"],
            NodeType::Program | NodeType::BlockStatement => {
                if let Some(last) = self.get_list(ast, "body")?.pop() {
                    last.collect_completion_records(ast, records)?;
                }
                return Ok(());
            }
            _ => {
                records.push(self.clone());
                return Ok(());
            }
        };

        for key in keys {
            self.get(ast, key)?.collect_completion_records(ast, records)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Ast;
    use crate::ast::NodeType;

    fn records(source: &str, route: &str) -> Vec<(NodeType, String)> {
        let mut ast = Ast::parse(source).unwrap();
        let path = ast.path(route).unwrap();
        path.completion_records(&mut ast)
            .unwrap()
            .into_iter()
            .map(|p| {
                let route = p
                    .segments()
                    .iter()
                    .map(|s| match s.index {
                        Some(i) => format!("{}.{}", s.key, i),
                        None => s.key.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                (p.node_type().unwrap(), route)
            })
            .collect()
    }

    #[test]
    fn test_if_contributes_both_branches() {
        let found = records("if (a) { b; } else { c; d; }", "body.0");
        assert_eq!(
            found,
            vec![
                (NodeType::ExpressionStatement, "body.0.consequent.body.0".to_string()),
                (NodeType::ExpressionStatement, "body.0.alternate.body.1".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_alternate_contributes_nothing() {
        let found = records("if (a) b;", "body.0");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_loop_and_try_records() {
        let found = records("while (x) { y; }", "body.0");
        assert_eq!(found[0].1, "body.0.body.body.0");

        let found = records("try { a; } catch (e) { b; } finally { c; }", "body.0");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].1, "body.0.block.body.0");
        assert_eq!(found[1].1, "body.0.handler.body.body.0");

        let found = records("try { a; } finally { c; }", "body.0");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, "body.0.block.body.0");
    }

    #[test]
    fn test_empty_block_has_no_records() {
        assert!(records("{}", "body.0").is_empty());
    }

    #[test]
    fn test_find_parent_within_boundary() {
        let mut ast = Ast::parse("while (a) { (function () { b; }); }").unwrap();
        let statement = ast.path("body.0.body.body.0.expression.body.body.0").unwrap();
        let func = ast.path("body.0.body.body.0.expression").unwrap();
        let boundary = func.node_id().unwrap();

        assert!(statement.find_parent(&mut ast, |p| p.is_loop()).is_some());
        assert!(statement
            .find_parent_within(&mut ast, boundary, |p| p.is_loop())
            .is_none());
    }
}
