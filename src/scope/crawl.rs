//! Binding collection for a freshly created scope frame

use super::{Binding, BindingKind};
use crate::ast::{DeclarationKind, Node, NodeKind, NodeType};

/// Collect the bindings owned by the frame of `owner`
pub(super) fn crawl(owner: &Node) -> Vec<Binding> {
    let mut bindings = Vec::new();
    match &owner.kind {
        NodeKind::Program { body } => {
            for statement in body {
                collect_vars(statement, &mut bindings);
            }
            collect_lexical(body, &mut bindings);
        }
        NodeKind::FunctionDeclaration { params, body, .. } => {
            collect_params(params, &mut bindings);
            collect_function_body(body, &mut bindings);
        }
        NodeKind::FunctionExpression {
            id, params, body, ..
        } => {
            if let Some(name) = id.as_deref().and_then(Node::identifier_name) {
                bindings.push(binding(name, BindingKind::Local, owner));
            }
            collect_params(params, &mut bindings);
            collect_function_body(body, &mut bindings);
        }
        NodeKind::ArrowFunctionExpression { params, body, .. } => {
            collect_params(params, &mut bindings);
            collect_function_body(body, &mut bindings);
        }
        NodeKind::BlockStatement { body } => collect_lexical(body, &mut bindings),
        NodeKind::ForStatement { init: Some(head), .. }
        | NodeKind::ForInStatement { left: head, .. }
        | NodeKind::ForOfStatement { left: head, .. } => {
            if let NodeKind::VariableDeclaration { kind, .. } = &head.kind {
                if !kind.is_hoisted() {
                    collect_declaration(head, &mut bindings);
                }
            }
        }
        NodeKind::CatchClause { param, body } => {
            if let Some(param) = param.as_deref() {
                if let Some(name) = param.identifier_name() {
                    bindings.push(binding(name, BindingKind::CatchParam, param));
                }
            }
            if let NodeKind::BlockStatement { body } = &body.kind {
                collect_lexical(body, &mut bindings);
            }
        }
        _ => {}
    }
    bindings
}

fn binding(name: &str, kind: BindingKind, declared_by: &Node) -> Binding {
    Binding {
        name: name.to_string(),
        kind,
        declared_by: Some(declared_by.id),
    }
}

fn collect_params(params: &[Node], bindings: &mut Vec<Binding>) {
    for param in params {
        if let Some(name) = param.identifier_name() {
            bindings.push(binding(name, BindingKind::Param, param));
        }
    }
}

fn collect_function_body(body: &Node, bindings: &mut Vec<Binding>) {
    if let NodeKind::BlockStatement { body: statements } = &body.kind {
        for statement in statements {
            collect_vars(statement, bindings);
        }
        collect_lexical(statements, bindings);
    }
}

/// `var` declarations anywhere below `root`, stopping at nested functions
fn collect_vars(root: &Node, bindings: &mut Vec<Binding>) {
    root.walk(&mut |node| match &node.kind {
        NodeKind::VariableDeclaration {
            kind: DeclarationKind::Var,
            ..
        } => {
            collect_declaration(node, bindings);
            true
        }
        _ => !node.is_function(),
    });
}

/// Block-scoped declarations directly inside a statement list
fn collect_lexical(statements: &[Node], bindings: &mut Vec<Binding>) {
    for statement in statements {
        match &statement.kind {
            NodeKind::VariableDeclaration { kind, .. } if !kind.is_hoisted() => {
                collect_declaration(statement, bindings);
            }
            NodeKind::FunctionDeclaration { id: Some(id), .. } => {
                if let Some(name) = id.identifier_name() {
                    bindings.push(binding(name, BindingKind::Hoisted, statement));
                }
            }
            _ => {}
        }
    }
}

fn collect_declaration(declaration: &Node, bindings: &mut Vec<Binding>) {
    let NodeKind::VariableDeclaration { kind, declarations } = &declaration.kind else {
        return;
    };
    for declarator in declarations {
        if let NodeKind::VariableDeclarator { id, .. } = &declarator.kind {
            if let Some(name) = id.identifier_name() {
                bindings.push(binding(name, BindingKind::from(*kind), declaration));
            }
        }
    }
}

/// Whether `child`, found at `parent.key`, owns a scope frame
pub(super) fn creates_scope(parent: &Node, key: &str, child: &Node) -> bool {
    let child_type = child.node_type();
    if child_type == NodeType::BlockStatement
        && key == "body"
        && (parent.is_function() || parent.node_type() == NodeType::CatchClause)
    {
        return false;
    }
    child_type.is(crate::ast::Category::Scopable)
}
