//! Lifting `var` declarations out of a synthesized wrapper function

use super::NodePath;
use crate::ast::builders::{assign, expression_statement, identifier, sequence_expression};
use crate::ast::helpers::is_var;
use crate::ast::{Ast, Category, DeclarationKind, NodeKind, NodeType};
use crate::error::Result;
use crate::scope::{BindingKind, ScopeId};
use crate::traverse::{traverse, Visitor};

struct HoistState {
    /// Frame receiving the hoisted names
    target: ScopeId,
    hoisted: Vec<String>,
}

/// Move every `var` below `body` (outside nested functions) into `target`.
///
/// Each declaration is rewritten into assignments for its initialized
/// declarators; declarators without an initializer leave nothing behind.
/// Returns the hoisted names in source order.
pub(super) fn hoist_variables(ast: &mut Ast, body: &NodePath, target: ScopeId) -> Result<Vec<String>> {
    let visitor = Visitor::new()
        .on_category(Category::Function, skip_function)
        .on(NodeType::VariableDeclaration, hoist_declaration);
    let mut state = HoistState {
        target,
        hoisted: Vec::new(),
    };
    traverse(ast, body, &visitor, &mut state)?;
    Ok(state.hoisted)
}

fn skip_function(path: &mut NodePath, _ast: &mut Ast, _state: &mut HoistState) -> Result<()> {
    path.skip();
    Ok(())
}

fn hoist_declaration(path: &mut NodePath, ast: &mut Ast, state: &mut HoistState) -> Result<()> {
    let node = path.require_node(ast)?;
    if !is_var(node) {
        return Ok(());
    }
    let NodeKind::VariableDeclaration { declarations, .. } = &node.kind else {
        return Ok(());
    };

    let mut names = Vec::new();
    let mut ids = Vec::new();
    let mut assignments = Vec::new();
    for declarator in declarations {
        if let NodeKind::VariableDeclarator { id, init } = &declarator.kind {
            if let Some(name) = id.identifier_name() {
                names.push(name.to_string());
            }
            ids.push((**id).clone());
            if let Some(init) = init {
                assignments.push(assign((**id).clone(), (**init).clone()));
            }
        }
    }

    // Pushing into the target frame can shift this path's route
    let either_form = path.can_have_variable_declaration_or_expression(ast);
    let loop_left = path.key() == Some("left");

    for name in names {
        let already_declared = ast
            .scopes
            .get(state.target)
            .and_then(|scope| scope.get_own_binding(&name))
            .map_or(false, |binding| {
                matches!(binding.kind, BindingKind::Var | BindingKind::Generated)
            });
        if !already_declared {
            ast.scopes.push(
                state.target,
                &mut ast.program,
                identifier(name.clone()),
                None,
                DeclarationKind::Var,
                BindingKind::Var,
            )?;
        }
        state.hoisted.push(name);
    }
    path.resync(ast);

    if either_form {
        if loop_left {
            // for (var k in o) -> for (k in o)
            return match ids.into_iter().next() {
                Some(id) => path.replace_with(ast, id),
                None => Ok(()),
            };
        }
        return match assignments.len() {
            0 => path.remove(ast),
            1 => path.replace_with(ast, assignments.remove(0)),
            _ => path.replace_with(ast, sequence_expression(assignments)),
        };
    }

    if assignments.is_empty() {
        path.remove(ast)
    } else {
        let statements = assignments.into_iter().map(expression_statement).collect();
        path.replace_with_multiple(ast, statements)
    }
}
