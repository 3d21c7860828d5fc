//! Statement lists in expression positions

use super::hoisting::hoist_variables;
use super::NodePath;
use crate::ast::builders::{
    assign, block_statement, call_expression, expression_statement, function_expression,
    identifier, return_statement,
};
use crate::ast::helpers::{declaration_names, is_var, to_sequence_expression};
use crate::ast::{Ast, Node, NodeId, NodeType};
use crate::error::{Error, Result};
use crate::scope::{BindingKind, ScopeId};

impl NodePath {
    /// Replace the expression at this path with the effect and value of
    /// `nodes`.
    ///
    /// Plain expression statements fold into one sequence expression.
    /// Anything else runs inside an immediately invoked function whose
    /// `var` declarations are hoisted into the enclosing function scope and
    /// whose completion values are returned. Afterwards this path points at
    /// the call.
    pub fn replace_expression_with_statements(&mut self, ast: &mut Ast, nodes: Vec<Node>) -> Result<()> {
        self.resync(ast);
        self.assert_unremoved()?;

        if let Some(folded) = to_sequence_expression(&nodes) {
            log::debug!("folding {} statements into one expression", nodes.len());
            return self.replace_with(ast, folded);
        }

        let enclosing = self.enclosing_scope(ast);
        let target = ast.scopes.function_parent(enclosing);
        for name in hoisted_names(&nodes) {
            ast.scopes.check_binding(target, &name, BindingKind::Var, None)?;
        }

        let count = nodes.len();
        let body = nodes
            .into_iter()
            .map(|node| {
                if node.is_expression() {
                    expression_statement(node)
                } else {
                    node
                }
            })
            .collect();
        let mut wrapper = function_expression(None, Vec::new(), block_statement(body));
        wrapper.extra.shadow = true;
        log::debug!("wrapping {} statements in an immediately invoked function", count);

        self.atomically(ast, |path, ast| path.wrap_statements(ast, wrapper, target))
    }

    /// Put the call to `wrapper` at this path, hoist its declarations into
    /// `target` and return its completion values
    fn wrap_statements(&mut self, ast: &mut Ast, wrapper: Node, target: ScopeId) -> Result<()> {
        let wrapper_id = wrapper.id;
        self.replace_with(ast, call_expression(wrapper, Vec::new()))?;

        let route = ast
            .find_route(wrapper_id)
            .ok_or_else(|| Error::internal("wrapper function vanished after replacement"))?;
        let callee = NodePath::from_segments(ast, route);
        let body = callee.get(ast, "body")?;
        let hoisted = hoist_variables(ast, &body, target)?;
        if !hoisted.is_empty() {
            log::debug!("hoisted {:?} out of the wrapper", hoisted);
            if let Some(wrapper) = ast.program.find(wrapper_id) {
                ast.scopes.recrawl(callee.scope(), wrapper)?;
            }
        }

        return_completion_values(ast, wrapper_id)
    }
}

/// Names bound by `var` declarations in `nodes`, not counting nested functions
fn hoisted_names(nodes: &[Node]) -> Vec<String> {
    let mut names = Vec::new();
    for node in nodes {
        node.walk(&mut |child| {
            if is_var(child) {
                names.extend(declaration_names(child));
            }
            !child.is_function()
        });
    }
    names
}

/// Turn each completion record of the wrapper into a `return`.
///
/// Records inside a loop assign one shared temporary instead, which is
/// returned once after the wrapper's last statement.
fn return_completion_values(ast: &mut Ast, wrapper_id: NodeId) -> Result<()> {
    let callee = locate(ast, wrapper_id)?;
    let records = callee.completion_records(ast)?;
    let mut temporary: Option<String> = None;

    for mut record in records {
        record.resync(ast);
        if record.is_removed() || !record.is(NodeType::ExpressionStatement) {
            continue;
        }

        let in_loop = record
            .find_parent_within(ast, wrapper_id, |path| path.is_loop())
            .is_some();
        let mut expression_path = record.get(ast, "expression")?;
        let expression = expression_path.require_node(ast)?.clone();

        if in_loop {
            let name = match &temporary {
                Some(name) => name.clone(),
                None => {
                    let scope = locate(ast, wrapper_id)?.scope();
                    let uid = ast.scopes.generate_declared_uid(scope, &mut ast.program, "ret")?;
                    let name = uid
                        .identifier_name()
                        .ok_or_else(|| Error::internal("generated uid is not an identifier"))?
                        .to_string();
                    temporary = Some(name.clone());
                    name
                }
            };
            expression_path.replace_with(ast, assign(identifier(name), expression))?;
        } else {
            record.replace_with(ast, return_statement(Some(expression)))?;
        }
    }

    if let Some(name) = temporary {
        log::debug!("returning loop completion value through {}", name);
        let mut body = locate(ast, wrapper_id)?.get(ast, "body")?;
        body.push_container(ast, "body", vec![return_statement(Some(identifier(name)))])?;
    }
    Ok(())
}

fn locate(ast: &mut Ast, id: NodeId) -> Result<NodePath> {
    let route = ast
        .find_route(id)
        .ok_or_else(|| Error::internal(format!("node #{} is no longer in the tree", id)))?;
    Ok(NodePath::from_segments(ast, route))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::DeclarationKind;

    #[test]
    fn test_hoisted_names_skip_nested_functions() {
        let nodes = vec![
            variable_declaration(
                DeclarationKind::Var,
                vec![variable_declarator(identifier("a"), None)],
            ),
            expression_statement(function_expression(
                None,
                vec![],
                block_statement(vec![variable_declaration(
                    DeclarationKind::Var,
                    vec![variable_declarator(identifier("inner"), None)],
                )]),
            )),
            block_statement(vec![variable_declaration(
                DeclarationKind::Var,
                vec![variable_declarator(identifier("b"), None)],
            )]),
            variable_declaration(
                DeclarationKind::Let,
                vec![variable_declarator(identifier("c"), None)],
            ),
        ];
        assert_eq!(hoisted_names(&nodes), vec!["a", "b"]);
    }
}
