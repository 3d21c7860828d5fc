//! Replacing the node at a path

use super::modification::wrap_for_list;
use super::NodePath;
use crate::ast::builders::{block_statement, expression_statement};
use crate::ast::helpers::{
    fresh_identities, inherit_comments, inherit_leading_comments, inherit_trailing_comments,
    remove_properties, verify_node_list,
};
use crate::ast::{Ast, Category, Node, NodeKind, NodeType};
use crate::error::{Error, Result};
use crate::parser;

/// What a node can be replaced with
#[derive(Debug, Clone)]
pub enum Replacement {
    /// No value; never a valid replacement
    Absent,
    Node(Node),
    /// Several nodes; needs the multi-form opt-in
    Nodes(Vec<Node>),
    /// Source text of an expression; needs the multi-form opt-in
    Source(String),
}

impl From<Node> for Replacement {
    fn from(node: Node) -> Self {
        Replacement::Node(node)
    }
}

impl From<Option<Node>> for Replacement {
    fn from(node: Option<Node>) -> Self {
        node.map_or(Replacement::Absent, Replacement::Node)
    }
}

impl From<Vec<Node>> for Replacement {
    fn from(nodes: Vec<Node>) -> Self {
        Replacement::Nodes(nodes)
    }
}

impl From<&str> for Replacement {
    fn from(source: &str) -> Self {
        Replacement::Source(source.to_string())
    }
}

impl From<String> for Replacement {
    fn from(source: String) -> Self {
        Replacement::Source(source)
    }
}

impl NodePath {
    /// Replace the node at this path with a single node
    pub fn replace_with(&mut self, ast: &mut Ast, replacement: impl Into<Replacement>) -> Result<()> {
        self.replace_with_opts(ast, replacement, false)
    }

    /// Replace the node at this path.
    ///
    /// With `allow_multi_form`, a list is forwarded to
    /// [`NodePath::replace_with_multiple`] and source text to
    /// [`NodePath::replace_with_source_string`]. A `Program` replacement is
    /// always unwrapped into its statements.
    ///
    /// An expression placed in a statement position is wrapped in an
    /// expression statement; a statement placed in an expression position
    /// goes through [`NodePath::replace_expression_with_statements`].
    pub fn replace_with_opts(
        &mut self,
        ast: &mut Ast,
        replacement: impl Into<Replacement>,
        allow_multi_form: bool,
    ) -> Result<()> {
        self.resync(ast);
        if self.removed {
            return Err(Error::invalid_operation(
                "cannot replace a node that was already removed",
            ));
        }

        let mut replacement = match replacement.into() {
            Replacement::Absent => {
                return Err(Error::invalid_operation(
                    "cannot replace a node with nothing; use `remove` instead",
                ))
            }
            Replacement::Nodes(nodes) if allow_multi_form => {
                return self.replace_with_multiple(ast, nodes)
            }
            Replacement::Nodes(_) => {
                return Err(Error::invalid_operation(
                    "`replace_with` takes a single node; use `replace_with_multiple` for a list",
                ))
            }
            Replacement::Source(source) if allow_multi_form => {
                return self.replace_with_source_string(ast, &source)
            }
            Replacement::Source(_) => {
                return Err(Error::invalid_operation(
                    "`replace_with` takes a node; use `replace_with_source_string` for source text",
                ))
            }
            Replacement::Node(node) => node,
        };

        if Some(replacement.id) == self.node_id() && self.node(ast) == Some(&replacement) {
            log::trace!("replacement is the current node; nothing to do");
            return Ok(());
        }

        if let NodeKind::Program { body } = replacement.kind {
            return self.replace_with_multiple(ast, body);
        }
        fresh_identities(&ast.program, self.node_id(), std::slice::from_mut(&mut replacement));

        let either_form = self.can_have_variable_declaration_or_expression(ast)
            || self.can_swap_between_expression_and_statement(ast, &replacement);

        if self.is_node_type(ast, Category::Statement) && replacement.is_expression() && !either_form {
            replacement = expression_statement(replacement);
        }

        if self.is_node_type(ast, Category::Expression) && replacement.is_statement() && !either_form {
            return self.replace_expression_with_statements(ast, vec![replacement]);
        }

        self.write_replacement(ast, replacement)
    }

    /// Swap in `replacement`, carrying over comments and scope bindings
    fn write_replacement(&mut self, ast: &mut Ast, mut replacement: Node) -> Result<()> {
        if self.is_root() {
            return Err(Error::invalid_operation(
                "the program root cannot be replaced by a single node",
            ));
        }

        let old_id = self.node_id();
        let old_type = self.node_type;
        let enclosing = self.enclosing_scope(ast);
        ast.scopes.check_declaration(enclosing, &replacement, old_id)?;

        if let Some(old) = self.node(ast) {
            inherit_comments(&mut replacement, old);
        }

        if let Some(old_id) = old_id {
            let function = ast.scopes.function_parent(enclosing);
            ast.scopes.remove_bindings_declared_by(enclosing, old_id)?;
            ast.scopes.remove_bindings_declared_by(function, old_id)?;
        }
        ast.scopes.register_declaration(enclosing, &replacement)?;

        log::debug!(
            "replacing {} with {}",
            old_type.map(|t| t.as_str()).unwrap_or("empty slot"),
            replacement.node_type()
        );
        self.write(ast, replacement)
    }

    /// Replace the node at this path with a list of nodes.
    ///
    /// The first node takes the original's leading comments and the last
    /// its trailing comments. Inside a list the nodes are spliced in place
    /// and this path is left removed. A single-statement field receives a
    /// block; an expression position goes through the statement/expression
    /// converter.
    pub fn replace_with_multiple(&mut self, ast: &mut Ast, nodes: Vec<Node>) -> Result<()> {
        self.resync(ast);
        self.assert_unremoved()?;
        let Some(key) = self.key() else {
            return Err(Error::invalid_operation(
                "the program root cannot be replaced",
            ));
        };

        let mut nodes = nodes;
        fresh_identities(&ast.program, self.node_id(), &mut nodes);

        let list_kind = match self.index() {
            Some(_) => self.parent_node(ast).and_then(|parent| parent.list_kind(key)),
            None => None,
        };
        verify_node_list(&nodes, list_kind)?;

        if let Some(old) = self.node(ast) {
            if let Some(first) = nodes.first_mut() {
                inherit_leading_comments(first, old);
            }
            if let Some(last) = nodes.last_mut() {
                inherit_trailing_comments(last, old);
            }
        }

        if let Some(index) = self.index() {
            let nodes = wrap_for_list(nodes, list_kind);
            let old_id = self.node_id();
            let enclosing = self.enclosing_scope(ast);
            for node in &nodes {
                ast.scopes.check_declaration(enclosing, node, old_id)?;
            }
            if let Some(old_id) = old_id {
                let function = ast.scopes.function_parent(enclosing);
                ast.scopes.remove_bindings_declared_by(enclosing, old_id)?;
                ast.scopes.remove_bindings_declared_by(function, old_id)?;
            }
            for node in &nodes {
                ast.scopes.register_declaration(enclosing, node)?;
            }

            let count = nodes.len();
            let list = self.container_list(ast)?;
            if index >= list.len() {
                return Err(Error::internal("list index out of range"));
            }
            list.splice(index..=index, nodes);
            log::debug!("replaced {}.{} with {} nodes", key, index, count);
            self.mark_removed();
            return Ok(());
        }

        if self.parent_type(ast) == Some(NodeType::ExpressionStatement) && key == "expression" {
            let mut parent = self
                .parent_path(ast)
                .ok_or_else(|| Error::internal("expression without its statement"))?;
            parent.replace_with_multiple(ast, nodes)?;
            self.mark_removed();
            return Ok(());
        }

        if self.is_node_type(ast, Category::Expression) || self.is_for_init(ast) {
            return self.replace_expression_with_statements(ast, nodes);
        }

        if self.is_statement_or_block(ast) {
            let body = wrap_for_list(nodes, Some(crate::ast::ListKind::Statements));
            log::debug!("wrapping {} nodes in a block for {}", body.len(), key);
            return self.write(ast, block_statement(body));
        }

        Err(Error::invalid_operation(format!(
            "{}.{} holds a single node and cannot take a list",
            self.parent_type(ast).map(|t| t.as_str()).unwrap_or("?"),
            key
        )))
    }

    /// Parse `source` as an expression and replace the node with it.
    ///
    /// The text is parsed wrapped in parentheses. A parse failure carries a
    /// code frame of the offending text and leaves the tree untouched.
    pub fn replace_with_source_string(&mut self, ast: &mut Ast, source: &str) -> Result<()> {
        self.resync(ast);
        self.assert_unremoved()?;

        let wrapped = format!("({})", source);
        let program = match parser::parse(&wrapped) {
            Ok(program) => program,
            Err(Error::Parse {
                message,
                line,
                column,
            }) => {
                let frame = parser::code_frame(&wrapped, line, column);
                return Err(Error::Parse {
                    message: format!("{} - make sure this is an expression.\n{}", message, frame),
                    line,
                    column,
                });
            }
            Err(err) => return Err(err),
        };

        let NodeKind::Program { body } = program.kind else {
            return Err(Error::internal("parser returned a non-program root"));
        };
        let mut expression = match body.into_iter().next().map(|statement| statement.kind) {
            Some(NodeKind::ExpressionStatement { expression }) => *expression,
            _ => return Err(Error::internal("parenthesized source did not yield an expression")),
        };
        remove_properties(&mut expression);
        self.replace_with(ast, expression)
    }

    /// Replace with one node, or splice a list in place.
    ///
    /// A list inside a list container is inserted after this element, which
    /// is then removed. A list anywhere else goes to
    /// [`NodePath::replace_with_multiple`]; a single node to
    /// [`NodePath::replace_with`].
    pub fn replace_inline(&mut self, ast: &mut Ast, replacement: impl Into<Replacement>) -> Result<()> {
        self.resync(ast);
        match replacement.into() {
            Replacement::Nodes(nodes) => {
                if self.index().is_some() {
                    self.assert_unremoved()?;
                    let kind = self
                        .key()
                        .and_then(|key| self.parent_node(ast).and_then(|p| p.list_kind(key)));
                    verify_node_list(&nodes, kind)?;
                    self.insert_into_container_after(ast, nodes)?;
                    self.remove(ast)
                } else {
                    self.replace_with_multiple(ast, nodes)
                }
            }
            other => self.replace_with(ast, other),
        }
    }
}
