//! Lexical scope frames
//!
//! Frames live in an arena owned by [`ScopeTree`] and are keyed by the id of
//! the node that owns them. A frame is created and crawled the first time a
//! path walks through its owner; the parent link is refreshed on every walk
//! so frames follow their owner when it moves.

mod crawl;

use std::collections::{HashMap, HashSet};

use crate::ast::builders::{
    block_statement, empty_statement, identifier, return_statement, variable_declaration,
    variable_declarator,
};
use crate::ast::helpers::{collect_identifier_names, declaration_names};
use crate::ast::{DeclarationKind, Node, NodeId, NodeKind, NodeType};
use crate::error::{Error, Result};
use crate::traverse::PathSegment;

/// Index of a frame in the [`ScopeTree`]
pub type ScopeId = usize;

/// How a name was bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    /// Function declaration
    Hoisted,
    Param,
    /// Name of a function expression, visible inside its own body
    Local,
    CatchParam,
    /// Identifier synthesized by [`ScopeTree::generate_declared_uid`]
    Generated,
}

impl BindingKind {
    pub fn is_block_scoped(&self) -> bool {
        matches!(self, BindingKind::Let | BindingKind::Const)
    }
}

impl From<DeclarationKind> for BindingKind {
    fn from(kind: DeclarationKind) -> Self {
        match kind {
            DeclarationKind::Var => BindingKind::Var,
            DeclarationKind::Let => BindingKind::Let,
            DeclarationKind::Const => BindingKind::Const,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
    /// Statement, parameter or clause that introduced the name
    pub declared_by: Option<NodeId>,
}

/// One lexical frame
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub owner: NodeId,
    pub owner_type: NodeType,
    pub parent: Option<ScopeId>,
    bindings: HashMap<String, Binding>,
}

impl Scope {
    pub fn get_own_binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn has_own_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    /// Function and program frames are where `var` declarations land
    pub fn is_function_scope(&self) -> bool {
        self.owner_type == NodeType::Program || self.owner_type.is_function()
    }
}

/// Arena of scope frames for one program
#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    by_owner: HashMap<NodeId, ScopeId>,
    /// Every uid handed out so far
    uids: HashSet<String>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    fn frame(&self, id: ScopeId) -> Result<&Scope> {
        self.scopes
            .get(id)
            .ok_or_else(|| Error::internal(format!("unknown scope {}", id)))
    }

    fn frame_mut(&mut self, id: ScopeId) -> Result<&mut Scope> {
        self.scopes
            .get_mut(id)
            .ok_or_else(|| Error::internal(format!("unknown scope {}", id)))
    }

    /// Frame owned by the node `owner`, if it was created already
    pub fn scope_of(&self, owner: NodeId) -> Option<ScopeId> {
        self.by_owner.get(&owner).copied()
    }

    /// Frame owned by `owner`, crawling it on first use
    pub fn ensure(&mut self, owner: &Node, parent: Option<ScopeId>) -> ScopeId {
        if let Some(&id) = self.by_owner.get(&owner.id) {
            self.scopes[id].parent = parent;
            return id;
        }

        let id = self.scopes.len();
        let bindings = crawl::crawl(owner)
            .into_iter()
            .map(|binding| (binding.name.clone(), binding))
            .collect::<HashMap<_, _>>();
        log::trace!(
            "created scope {} for {} #{} with {} bindings",
            id,
            owner.node_type(),
            owner.id,
            bindings.len()
        );
        self.scopes.push(Scope {
            id,
            owner: owner.id,
            owner_type: owner.node_type(),
            parent,
            bindings,
        });
        self.by_owner.insert(owner.id, id);
        id
    }

    /// Rebuild a frame's bindings from its owner's current contents
    pub fn recrawl(&mut self, id: ScopeId, owner: &Node) -> Result<()> {
        let frame = self.frame_mut(id)?;
        frame.bindings = crawl::crawl(owner)
            .into_iter()
            .map(|binding| (binding.name.clone(), binding))
            .collect();
        Ok(())
    }

    /// Innermost frame along a route from the program root.
    ///
    /// With `include_self` the frame owned by the route's final node counts;
    /// without it the result is the frame that node sits in.
    pub fn resolve(&mut self, program: &Node, segments: &[PathSegment], include_self: bool) -> ScopeId {
        let mut current = self.ensure(program, None);
        let mut node = program;
        for (i, segment) in segments.iter().enumerate() {
            if i + 1 == segments.len() && !include_self {
                break;
            }
            let Some(child) = node.child(segment.key, segment.index) else {
                break;
            };
            if crawl::creates_scope(node, segment.key, child) {
                current = self.ensure(child, Some(current));
            }
            node = child;
        }
        current
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes.get(id).and_then(|scope| scope.parent)
    }

    /// Nearest function or program frame at or above `id`
    pub fn function_parent(&self, id: ScopeId) -> ScopeId {
        let mut current = id;
        loop {
            match self.scopes.get(current) {
                Some(scope) if scope.is_function_scope() => return current,
                Some(Scope {
                    parent: Some(parent),
                    ..
                }) => current = *parent,
                _ => return current,
            }
        }
    }

    /// Binding for `name` visible from `id`
    pub fn get_binding(&self, id: ScopeId, name: &str) -> Option<&Binding> {
        let mut current = Some(id);
        while let Some(scope) = current.and_then(|id| self.scopes.get(id)) {
            if let Some(binding) = scope.bindings.get(name) {
                return Some(binding);
            }
            current = scope.parent;
        }
        None
    }

    pub fn has_binding(&self, id: ScopeId, name: &str) -> bool {
        self.get_binding(id, name).is_some()
    }

    pub fn has_own_binding(&self, id: ScopeId, name: &str) -> bool {
        self.scopes
            .get(id)
            .map_or(false, |scope| scope.has_own_binding(name))
    }

    /// Check that `name` may be bound as `kind` in frame `id`.
    ///
    /// A binding introduced by `replacing` does not count as a collision.
    pub fn check_binding(
        &self,
        id: ScopeId,
        name: &str,
        kind: BindingKind,
        replacing: Option<NodeId>,
    ) -> Result<()> {
        let Some(local) = self.frame(id)?.bindings.get(name) else {
            return Ok(());
        };
        if replacing.is_some() && local.declared_by == replacing {
            return Ok(());
        }
        if kind == BindingKind::Param {
            return Ok(());
        }
        if kind == BindingKind::Hoisted && local.kind == BindingKind::Let {
            return Ok(());
        }
        if kind.is_block_scoped() || local.kind.is_block_scoped() {
            return Err(Error::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Add a binding to frame `id`, rejecting block-scoped collisions
    pub fn register_binding(&mut self, id: ScopeId, binding: Binding) -> Result<()> {
        self.check_binding(id, &binding.name, binding.kind, None)?;
        log::trace!("scope {}: bind {} as {:?}", id, binding.name, binding.kind);
        self.frame_mut(id)?
            .bindings
            .insert(binding.name.clone(), binding);
        Ok(())
    }

    /// Drop every binding of frame `id` introduced by `declared_by`
    pub fn remove_bindings_declared_by(&mut self, id: ScopeId, declared_by: NodeId) -> Result<()> {
        self.frame_mut(id)?
            .bindings
            .retain(|_, binding| binding.declared_by != Some(declared_by));
        Ok(())
    }

    /// Frame and binding kind a declaration statement binds into, seen from `enclosing`
    fn declaration_target(&self, enclosing: ScopeId, node: &Node) -> Option<(ScopeId, BindingKind)> {
        match &node.kind {
            NodeKind::VariableDeclaration { kind, .. } if kind.is_hoisted() => {
                Some((self.function_parent(enclosing), BindingKind::Var))
            }
            NodeKind::VariableDeclaration { kind, .. } => Some((enclosing, BindingKind::from(*kind))),
            NodeKind::FunctionDeclaration { .. } => Some((enclosing, BindingKind::Hoisted)),
            _ => None,
        }
    }

    /// Check the names a declaration statement would introduce
    pub fn check_declaration(
        &self,
        enclosing: ScopeId,
        node: &Node,
        replacing: Option<NodeId>,
    ) -> Result<()> {
        let Some((target, kind)) = self.declaration_target(enclosing, node) else {
            return Ok(());
        };
        for name in declaration_names(node) {
            self.check_binding(target, &name, kind, replacing)?;
        }
        Ok(())
    }

    /// Register the names a declaration statement introduces
    pub fn register_declaration(&mut self, enclosing: ScopeId, node: &Node) -> Result<()> {
        let Some((target, kind)) = self.declaration_target(enclosing, node) else {
            return Ok(());
        };
        for name in declaration_names(node) {
            self.register_binding(
                target,
                Binding {
                    name,
                    kind,
                    declared_by: Some(node.id),
                },
            )?;
        }
        Ok(())
    }

    /// Generate an identifier name unused anywhere visible from `id`.
    ///
    /// Candidates are `_base`, `_base2`, `_base3`, ... after stripping
    /// leading underscores and trailing digits from `base`. A candidate is
    /// rejected if it is bound in the chain, was handed out before, or
    /// appears anywhere in `program`.
    pub fn generate_uid(&mut self, id: ScopeId, program: &Node, base: &str) -> String {
        let name = sanitize_base(base);
        let mut used = HashSet::new();
        collect_identifier_names(program, &mut used);

        let mut i = 1;
        let uid = loop {
            let candidate = if i > 1 {
                format!("_{}{}", name, i)
            } else {
                format!("_{}", name)
            };
            if !self.has_binding(id, &candidate)
                && !used.contains(&candidate)
                && !self.uids.contains(&candidate)
            {
                break candidate;
            }
            i += 1;
        };

        log::debug!("generated uid {} in scope {}", uid, id);
        self.uids.insert(uid.clone());
        uid
    }

    /// Generate a uid and declare it with `var` at the top of frame `id`
    pub fn generate_declared_uid(&mut self, id: ScopeId, program: &mut Node, base: &str) -> Result<Node> {
        let uid = self.generate_uid(id, program, base);
        self.push(
            id,
            program,
            identifier(uid.clone()),
            None,
            DeclarationKind::Var,
            BindingKind::Generated,
        )?;
        Ok(identifier(uid))
    }

    /// Declare `kind id [= init]` at the top of frame `id`'s block.
    ///
    /// Declarations pushed into the same frame share one generated
    /// statement per declaration kind. Loop, catch and function owners get
    /// their body converted to a block first.
    pub fn push(
        &mut self,
        id: ScopeId,
        program: &mut Node,
        binding_id: Node,
        init: Option<Node>,
        kind: DeclarationKind,
        binding_kind: BindingKind,
    ) -> Result<()> {
        let name = binding_id
            .identifier_name()
            .ok_or_else(|| Error::invalid_operation("only identifiers can be pushed into a scope"))?
            .to_string();
        self.check_binding(id, &name, binding_kind, None)?;

        let owner_id = self.frame(id)?.owner;
        let owner = program
            .find_mut(owner_id)
            .ok_or_else(|| Error::internal(format!("scope owner #{} is no longer in the tree", owner_id)))?;
        let body = ensure_block_body(owner)?;

        let declarator = variable_declarator(binding_id, init);
        let existing = body.iter_mut().find(|statement| {
            statement.extra.generated
                && matches!(&statement.kind, NodeKind::VariableDeclaration { kind: k, .. } if *k == kind)
        });
        let declared_by = match existing {
            Some(declaration) => {
                if let NodeKind::VariableDeclaration { declarations, .. } = &mut declaration.kind {
                    declarations.push(declarator);
                }
                declaration.id
            }
            None => {
                let mut declaration = variable_declaration(kind, vec![declarator]);
                declaration.extra.generated = true;
                let declared_by = declaration.id;
                body.insert(0, declaration);
                declared_by
            }
        };

        log::debug!("scope {}: pushed {} {}", id, kind.as_str(), name);
        self.register_binding(
            id,
            Binding {
                name,
                kind: binding_kind,
                declared_by: Some(declared_by),
            },
        )
    }
}

fn sanitize_base(base: &str) -> String {
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    let trimmed = cleaned
        .trim_start_matches('_')
        .trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.is_empty() {
        "ref".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Statement list of the block a frame owner declares into
fn ensure_block_body(owner: &mut Node) -> Result<&mut Vec<Node>> {
    let owner_type = owner.node_type();
    match &mut owner.kind {
        NodeKind::Program { body } | NodeKind::BlockStatement { body } => Ok(body),
        NodeKind::ArrowFunctionExpression { body, .. } => {
            if body.node_type() != NodeType::BlockStatement {
                let expression = std::mem::replace(&mut **body, empty_statement());
                **body = block_statement(vec![return_statement(Some(expression))]);
            }
            block_body(body)
        }
        NodeKind::FunctionDeclaration { body, .. }
        | NodeKind::FunctionExpression { body, .. }
        | NodeKind::CatchClause { body, .. }
        | NodeKind::ForStatement { body, .. }
        | NodeKind::ForInStatement { body, .. }
        | NodeKind::ForOfStatement { body, .. }
        | NodeKind::WhileStatement { body, .. }
        | NodeKind::DoWhileStatement { body, .. } => {
            if body.node_type() != NodeType::BlockStatement {
                let statement = std::mem::replace(&mut **body, empty_statement());
                **body = block_statement(vec![statement]);
            }
            block_body(body)
        }
        _ => Err(Error::invalid_operation(format!(
            "cannot declare into a {}",
            owner_type
        ))),
    }
}

fn block_body(block: &mut Node) -> Result<&mut Vec<Node>> {
    match &mut block.kind {
        NodeKind::BlockStatement { body } => Ok(body),
        _ => Err(Error::internal("expected a block statement")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    fn let_declaration(name: &str) -> Node {
        variable_declaration(
            DeclarationKind::Let,
            vec![variable_declarator(identifier(name), None)],
        )
    }

    #[test]
    fn test_sanitize_base() {
        assert_eq!(sanitize_base("ret"), "ret");
        assert_eq!(sanitize_base("__temp12"), "temp");
        assert_eq!(sanitize_base("a-b"), "a_b");
        assert_eq!(sanitize_base("_"), "ref");
    }

    #[test]
    fn test_generate_uid_skips_used_names() {
        let program = program(vec![
            expression_statement(identifier("_ret")),
            let_declaration("_ret2"),
        ]);
        let mut scopes = ScopeTree::new();
        let root = scopes.ensure(&program, None);

        assert_eq!(scopes.generate_uid(root, &program, "ret"), "_ret3");
        assert_eq!(scopes.generate_uid(root, &program, "ret"), "_ret4");
        assert_eq!(scopes.generate_uid(root, &program, "temp"), "_temp");
    }

    #[test]
    fn test_block_scoped_collision() {
        let program = program(vec![let_declaration("x")]);
        let mut scopes = ScopeTree::new();
        let root = scopes.ensure(&program, None);

        let err = scopes
            .register_binding(
                root,
                Binding {
                    name: "x".into(),
                    kind: BindingKind::Var,
                    declared_by: None,
                },
            )
            .unwrap_err();
        assert_eq!(err, Error::DuplicateDeclaration { name: "x".into() });

        // var after var is fine
        scopes
            .register_binding(
                root,
                Binding {
                    name: "y".into(),
                    kind: BindingKind::Var,
                    declared_by: None,
                },
            )
            .unwrap();
        scopes
            .register_binding(
                root,
                Binding {
                    name: "y".into(),
                    kind: BindingKind::Var,
                    declared_by: None,
                },
            )
            .unwrap();
    }

    #[test]
    fn test_push_merges_generated_declarations() {
        let mut program = program(vec![expression_statement(identifier("a"))]);
        let mut scopes = ScopeTree::new();
        let root = scopes.ensure(&program, None);

        let first = scopes.generate_declared_uid(root, &mut program, "ret").unwrap();
        let second = scopes.generate_declared_uid(root, &mut program, "ret").unwrap();
        assert_eq!(first.identifier_name(), Some("_ret"));
        assert_eq!(second.identifier_name(), Some("_ret2"));

        let NodeKind::Program { body } = &program.kind else {
            panic!("expected program");
        };
        assert_eq!(body.len(), 2);
        match &body[0].kind {
            NodeKind::VariableDeclaration { kind, declarations } => {
                assert_eq!(*kind, DeclarationKind::Var);
                assert_eq!(declarations.len(), 2);
            }
            other => panic!("expected declaration, got {:?}", other),
        }
        assert!(body[0].extra.generated);
        assert_eq!(
            scopes.get_binding(root, "_ret").map(|b| b.kind),
            Some(BindingKind::Generated)
        );
    }

    #[test]
    fn test_push_converts_arrow_expression_body() {
        let arrow = arrow_function_expression(vec![], identifier("x"));
        let arrow_id = arrow.id;
        let mut program = program(vec![expression_statement(arrow)]);
        let mut scopes = ScopeTree::new();
        let root = scopes.ensure(&program, None);
        let arrow_scope = {
            let arrow = program.find(arrow_id).unwrap();
            scopes.ensure(arrow, Some(root))
        };

        scopes
            .push(
                arrow_scope,
                &mut program,
                identifier("t"),
                None,
                DeclarationKind::Var,
                BindingKind::Var,
            )
            .unwrap();

        let arrow = program.find(arrow_id).unwrap();
        let NodeKind::ArrowFunctionExpression { body, .. } = &arrow.kind else {
            panic!("expected arrow");
        };
        let NodeKind::BlockStatement { body } = &body.kind else {
            panic!("expected block body");
        };
        assert_eq!(body.len(), 2);
        assert_eq!(body[1].node_type(), NodeType::ReturnStatement);
    }

    #[test]
    fn test_function_parent_and_chain_lookup() {
        let inner = block_statement(vec![let_declaration("b")]);
        let func = function_expression(None, vec![identifier("p")], block_statement(vec![]));
        let program = program(vec![let_declaration("a")]);
        let mut scopes = ScopeTree::new();
        let root = scopes.ensure(&program, None);
        let f = scopes.ensure(&func, Some(root));
        let block = scopes.ensure(&inner, Some(f));

        assert_eq!(scopes.function_parent(block), f);
        assert_eq!(scopes.function_parent(root), root);
        assert!(scopes.has_binding(block, "a"));
        assert!(scopes.has_binding(block, "p"));
        assert!(!scopes.has_own_binding(block, "p"));
        assert!(!scopes.has_binding(root, "b"));
    }
}
