//! Predicates and small tree utilities shared by the rewriting passes

use std::collections::HashSet;

use super::builders::{sequence_expression, undefined_node};
use super::node::{
    Comment, DeclarationKind, ListKind, Node, NodeExtra, NodeId, NodeKind, NodeType,
};
use crate::error::{Error, Result};

/// Append `src`'s comments to `dst`'s, keeping order and dropping duplicates
pub fn inherit_comments(dst: &mut Node, src: &Node) {
    inherit_leading_comments(dst, src);
    inherit_trailing_comments(dst, src);
}

pub fn inherit_leading_comments(dst: &mut Node, src: &Node) {
    merge_comments(&mut dst.leading_comments, &src.leading_comments);
}

pub fn inherit_trailing_comments(dst: &mut Node, src: &Node) {
    merge_comments(&mut dst.trailing_comments, &src.trailing_comments);
}

fn merge_comments(dst: &mut Vec<Comment>, src: &[Comment]) {
    for comment in src {
        if !dst.contains(comment) {
            dst.push(comment.clone());
        }
    }
}

/// Fold a statement list into a single expression.
///
/// Only bare expressions and expression statements fold; anything else
/// returns `None`. An empty list folds to `void 0`, a single item to itself
/// and longer lists to a sequence expression.
pub fn to_sequence_expression(nodes: &[Node]) -> Option<Node> {
    let mut expressions = Vec::with_capacity(nodes.len());
    for node in nodes {
        match &node.kind {
            NodeKind::ExpressionStatement { expression } => {
                let mut expression = (**expression).clone();
                inherit_leading_comments(&mut expression, node);
                expressions.push(expression);
            }
            _ if node.is_expression() => expressions.push(node.clone()),
            _ => return None,
        }
    }

    match expressions.len() {
        0 => Some(undefined_node()),
        1 => expressions.pop(),
        _ => Some(sequence_expression(expressions)),
    }
}

/// Check a replacement list before it is written anywhere.
///
/// `target` names what the destination list holds, when known.
pub fn verify_node_list(nodes: &[Node], target: Option<ListKind>) -> Result<()> {
    if nodes.is_empty() {
        return Err(Error::verification(None, "node list is empty"));
    }

    for (index, node) in nodes.iter().enumerate() {
        let node_type = node.node_type();
        if node_type == NodeType::Program {
            return Err(Error::verification(
                Some(index),
                "a Program cannot be nested in another node",
            ));
        }

        let fits = match target {
            None => true,
            Some(ListKind::Statements) => node.is_statement() || node.is_expression(),
            Some(ListKind::Expressions) => node.is_expression(),
            Some(ListKind::Declarators) => node_type == NodeType::VariableDeclarator,
            Some(ListKind::Properties) => node_type == NodeType::Property,
            Some(ListKind::Params) => node_type == NodeType::Identifier,
        };
        if !fits {
            return Err(Error::verification(
                Some(index),
                format!("{} cannot be placed in this container", node_type),
            ));
        }
    }
    Ok(())
}

/// Re-issue identities for incoming nodes that share one with `tree` or
/// with an earlier entry of `nodes`.
///
/// The subtree of `replacing` is about to leave the tree and does not count.
pub fn fresh_identities(tree: &Node, replacing: Option<NodeId>, nodes: &mut [Node]) {
    let mut taken = HashSet::new();
    tree.walk(&mut |node| {
        if Some(node.id) == replacing {
            return false;
        }
        taken.insert(node.id);
        true
    });

    for node in nodes.iter_mut() {
        let mut clash = false;
        node.walk(&mut |child| {
            clash = taken.contains(&child.id);
            !clash
        });
        if clash {
            log::trace!("re-issuing identities for an incoming {}", node.node_type());
            node.renumber();
        }
        node.walk(&mut |child| {
            taken.insert(child.id);
            true
        });
    }
}

/// Strip bookkeeping from a subtree and give it fresh identities
pub fn remove_properties(node: &mut Node) {
    node.span = None;
    node.extra = NodeExtra::default();
    node.id = super::node::next_node_id();
    node.for_each_child_mut(remove_properties);
}

/// Whether `node` is a `var` declaration
pub fn is_var(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::VariableDeclaration {
            kind: DeclarationKind::Var,
            ..
        }
    )
}

/// Names a declaration introduces into its scope
pub fn declaration_names(node: &Node) -> Vec<String> {
    match &node.kind {
        NodeKind::VariableDeclaration { declarations, .. } => declarations
            .iter()
            .filter_map(|declarator| match &declarator.kind {
                NodeKind::VariableDeclarator { id, .. } => id.identifier_name(),
                _ => None,
            })
            .map(str::to_string)
            .collect(),
        NodeKind::FunctionDeclaration { id: Some(id), .. } => {
            id.identifier_name().map(str::to_string).into_iter().collect()
        }
        _ => Vec::new(),
    }
}

/// Every identifier name used anywhere in a subtree
pub fn collect_identifier_names(root: &Node, names: &mut HashSet<String>) {
    root.walk(&mut |node| {
        match &node.kind {
            NodeKind::Identifier { name } => {
                names.insert(name.clone());
            }
            NodeKind::LabeledStatement { label, .. } => {
                names.insert(label.clone());
            }
            _ => {}
        }
        true
    });
}
