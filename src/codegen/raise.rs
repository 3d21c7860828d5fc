//! Conversion from [`Node`]s back into an oxc syntax tree for printing

use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::{
    Argument, ArrayExpressionElement, AssignmentTarget, BindingPattern, BindingPatternKind,
    BindingRestElement, Expression, ForStatementInit, ForStatementLeft, FormalParameterKind,
    FormalParameters, FunctionBody, FunctionType, ObjectPropertyKind, PropertyKey, PropertyKind,
    SimpleAssignmentTarget, Statement, TSThisParameter, TSTypeAnnotation,
    TSTypeParameterDeclaration, TSTypeParameterInstantiation, VariableDeclaration,
    VariableDeclarationKind,
};
use oxc_ast::AstBuilder;
use oxc_span::{Span, SPAN};
use oxc_syntax::number::NumberBase;
use oxc_syntax::operator::UnaryOperator;

use super::comment_layout::CommentLayout;
use crate::ast::{Comment, DeclarationKind, Node, NodeKind};
use crate::error::{Error, Result};

/// Assignable positions shared by assignments, updates and for-in/of heads
enum Target<'a> {
    Identifier(oxc_allocator::Box<'a, oxc_ast::ast::IdentifierReference<'a>>),
    Static(oxc_allocator::Box<'a, oxc_ast::ast::StaticMemberExpression<'a>>),
    Computed(oxc_allocator::Box<'a, oxc_ast::ast::ComputedMemberExpression<'a>>),
}

pub(super) struct Raiser<'a> {
    ast: AstBuilder<'a>,
    layout: CommentLayout,
}

fn mismatch(expected: &str, node: &Node) -> Error {
    Error::internal(format!("expected {}, found {}", expected, node.node_type()))
}

impl<'a> Raiser<'a> {
    pub(super) fn new(ast: AstBuilder<'a>) -> Self {
        Self {
            ast,
            layout: CommentLayout::new(),
        }
    }

    pub(super) fn into_layout(self) -> CommentLayout {
        self.layout
    }

    /// A statement list; trailing comments move ahead of the next statement
    pub(super) fn statements(&mut self, nodes: &[Node]) -> Result<ArenaVec<'a, Statement<'a>>> {
        let mut statements = self.ast.vec_with_capacity(nodes.len());
        let mut carried: Vec<&Comment> = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            let mut comments = std::mem::take(&mut carried);
            comments.extend(statement_comments(node));
            if index + 1 == nodes.len() {
                comments.extend(node.trailing_comments.iter());
            } else {
                carried.extend(node.trailing_comments.iter());
            }
            statements.push(self.statement_with(node, &comments)?);
        }
        Ok(statements)
    }

    fn statement(&mut self, node: &Node) -> Result<Statement<'a>> {
        let mut comments = statement_comments(node);
        comments.extend(node.trailing_comments.iter());
        self.statement_with(node, &comments)
    }

    fn statement_with(&mut self, node: &Node, comments: &[&Comment]) -> Result<Statement<'a>> {
        let span = match self.layout.place(comments) {
            Some(anchor) => Span::new(anchor, anchor),
            None => SPAN,
        };
        let ast = self.ast;
        let statement = match &node.kind {
            NodeKind::ExpressionStatement { expression } => {
                let expression = self.expression(expression)?;
                ast.statement_expression(span, expression)
            }
            NodeKind::BlockStatement { body } => {
                let body = self.statements(body)?;
                ast.statement_block(span, body)
            }
            NodeKind::EmptyStatement => ast.statement_empty(span),
            NodeKind::DebuggerStatement => ast.statement_debugger(span),
            NodeKind::ReturnStatement { argument } => {
                let argument = self.optional(argument.as_deref())?;
                ast.statement_return(span, argument)
            }
            NodeKind::ThrowStatement { argument } => {
                let argument = self.expression(argument)?;
                ast.statement_throw(span, argument)
            }
            NodeKind::BreakStatement { label } => {
                let label = label
                    .as_ref()
                    .map(|name| ast.label_identifier(SPAN, ast.atom(name)));
                ast.statement_break(span, label)
            }
            NodeKind::ContinueStatement { label } => {
                let label = label
                    .as_ref()
                    .map(|name| ast.label_identifier(SPAN, ast.atom(name)));
                ast.statement_continue(span, label)
            }
            NodeKind::LabeledStatement { label, body } => {
                let label = ast.label_identifier(SPAN, ast.atom(label));
                let body = self.statement(body)?;
                ast.statement_labeled(span, label, body)
            }
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                let test = self.expression(test)?;
                let consequent = self.statement(consequent)?;
                let alternate = match alternate {
                    Some(alternate) => Some(self.statement(alternate)?),
                    None => None,
                };
                ast.statement_if(span, test, consequent, alternate)
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let init = match init.as_deref() {
                    Some(init) => Some(match &init.kind {
                        NodeKind::VariableDeclaration { .. } => {
                            ForStatementInit::VariableDeclaration(self.variable_declaration(init)?)
                        }
                        _ => ForStatementInit::from(self.expression(init)?),
                    }),
                    None => None,
                };
                let test = self.optional(test.as_deref())?;
                let update = self.optional(update.as_deref())?;
                let body = self.statement(body)?;
                ast.statement_for(span, init, test, update, body)
            }
            NodeKind::ForInStatement { left, right, body } => {
                let left = self.for_left(left)?;
                let right = self.expression(right)?;
                let body = self.statement(body)?;
                ast.statement_for_in(span, left, right, body)
            }
            NodeKind::ForOfStatement { left, right, body } => {
                let left = self.for_left(left)?;
                let right = self.expression(right)?;
                let body = self.statement(body)?;
                ast.statement_for_of(span, false, left, right, body)
            }
            NodeKind::WhileStatement { test, body } => {
                let test = self.expression(test)?;
                let body = self.statement(body)?;
                ast.statement_while(span, test, body)
            }
            NodeKind::DoWhileStatement { body, test } => {
                let body = self.statement(body)?;
                let test = self.expression(test)?;
                ast.statement_do_while(span, body, test)
            }
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                let block = self.block(block)?;
                let handler = match handler.as_deref() {
                    Some(handler) => {
                        let NodeKind::CatchClause { param, body } = &handler.kind else {
                            return Err(mismatch("CatchClause", handler));
                        };
                        let param = match param.as_deref() {
                            Some(param) => {
                                Some(ast.catch_parameter(SPAN, self.binding_pattern(param)?))
                            }
                            None => None,
                        };
                        let body = self.block(body)?;
                        Some(ast.catch_clause(SPAN, param, body))
                    }
                    None => None,
                };
                let finalizer = match finalizer.as_deref() {
                    Some(finalizer) => Some(self.block(finalizer)?),
                    None => None,
                };
                ast.statement_try(span, block, handler, finalizer)
            }
            NodeKind::VariableDeclaration { .. } => {
                let mut declaration = self.variable_declaration(node)?;
                declaration.span = span;
                Statement::VariableDeclaration(declaration)
            }
            NodeKind::FunctionDeclaration {
                id,
                params,
                body,
                generator,
                is_async,
            } => {
                let id = id
                    .as_deref()
                    .map(|id| self.binding_identifier(id))
                    .transpose()?;
                let params = self.params(params)?;
                let body = self.function_body(body)?;
                let function = ast.function(
                    span,
                    FunctionType::FunctionDeclaration,
                    id,
                    *generator,
                    *is_async,
                    false,
                    None::<TSTypeParameterDeclaration>,
                    None::<TSThisParameter>,
                    params,
                    None::<TSTypeAnnotation>,
                    Some(body),
                );
                Statement::FunctionDeclaration(ast.alloc(function))
            }
            _ => return Err(mismatch("a statement", node)),
        };
        Ok(statement)
    }

    fn block(&mut self, node: &Node) -> Result<oxc_ast::ast::BlockStatement<'a>> {
        let NodeKind::BlockStatement { body } = &node.kind else {
            return Err(mismatch("BlockStatement", node));
        };
        let body = self.statements(body)?;
        Ok(self.ast.block_statement(SPAN, body))
    }

    fn variable_declaration(
        &mut self,
        node: &Node,
    ) -> Result<oxc_allocator::Box<'a, VariableDeclaration<'a>>> {
        let NodeKind::VariableDeclaration { kind, declarations } = &node.kind else {
            return Err(mismatch("VariableDeclaration", node));
        };
        let kind = match kind {
            DeclarationKind::Var => VariableDeclarationKind::Var,
            DeclarationKind::Let => VariableDeclarationKind::Let,
            DeclarationKind::Const => VariableDeclarationKind::Const,
        };
        let mut declarators = self.ast.vec_with_capacity(declarations.len());
        for declarator in declarations {
            let NodeKind::VariableDeclarator { id, init } = &declarator.kind else {
                return Err(mismatch("VariableDeclarator", declarator));
            };
            let id = self.binding_pattern(id)?;
            let init = self.optional(init.as_deref())?;
            declarators.push(self.ast.variable_declarator(SPAN, kind, id, init, false));
        }
        Ok(self.ast.alloc_variable_declaration(SPAN, kind, declarators, false))
    }

    fn binding_identifier(&mut self, node: &Node) -> Result<oxc_ast::ast::BindingIdentifier<'a>> {
        let name = node
            .identifier_name()
            .ok_or_else(|| mismatch("Identifier", node))?;
        Ok(self.ast.binding_identifier(SPAN, self.ast.atom(name)))
    }

    fn binding_pattern(&mut self, node: &Node) -> Result<BindingPattern<'a>> {
        let id = self.binding_identifier(node)?;
        Ok(self.ast.binding_pattern(
            BindingPatternKind::BindingIdentifier(self.ast.alloc(id)),
            None::<TSTypeAnnotation>,
            false,
        ))
    }

    fn params(&mut self, params: &[Node]) -> Result<FormalParameters<'a>> {
        let mut items = self.ast.vec_with_capacity(params.len());
        for param in params {
            let pattern = self.binding_pattern(param)?;
            items.push(self.ast.formal_parameter(
                SPAN,
                self.ast.vec(),
                pattern,
                None,
                false,
                false,
            ));
        }
        Ok(self.ast.formal_parameters(
            SPAN,
            FormalParameterKind::FormalParameter,
            items,
            None::<BindingRestElement>,
        ))
    }

    fn function_body(&mut self, node: &Node) -> Result<FunctionBody<'a>> {
        let NodeKind::BlockStatement { body } = &node.kind else {
            return Err(mismatch("a function body block", node));
        };
        let statements = self.statements(body)?;
        Ok(self.ast.function_body(SPAN, self.ast.vec(), statements))
    }

    fn optional(&mut self, node: Option<&Node>) -> Result<Option<Expression<'a>>> {
        node.map(|node| self.expression(node)).transpose()
    }

    fn expressions(&mut self, nodes: &[Node]) -> Result<ArenaVec<'a, Expression<'a>>> {
        let mut expressions = self.ast.vec_with_capacity(nodes.len());
        for node in nodes {
            expressions.push(self.expression(node)?);
        }
        Ok(expressions)
    }

    fn arguments(&mut self, nodes: &[Node]) -> Result<ArenaVec<'a, Argument<'a>>> {
        let mut arguments = self.ast.vec_with_capacity(nodes.len());
        for node in nodes {
            arguments.push(Argument::from(self.expression(node)?));
        }
        Ok(arguments)
    }

    pub(super) fn expression(&mut self, node: &Node) -> Result<Expression<'a>> {
        let ast = self.ast;
        let expression = match &node.kind {
            NodeKind::Identifier { name } => ast.expression_identifier(SPAN, ast.atom(name)),
            NodeKind::NullLiteral => ast.expression_null_literal(SPAN),
            NodeKind::BooleanLiteral { value } => ast.expression_boolean_literal(SPAN, *value),
            NodeKind::NumericLiteral { value } => {
                if *value < 0.0 || (*value == 0.0 && value.is_sign_negative()) {
                    // Negative numbers only exist as unary minus in source
                    let magnitude =
                        ast.expression_numeric_literal(SPAN, -*value, None, NumberBase::Decimal);
                    ast.expression_unary(SPAN, UnaryOperator::UnaryNegation, magnitude)
                } else {
                    let raw = node.extra.raw.as_deref().map(|raw| ast.atom(raw));
                    ast.expression_numeric_literal(SPAN, *value, raw, NumberBase::Decimal)
                }
            }
            NodeKind::StringLiteral { value } => {
                ast.expression_string_literal(SPAN, ast.atom(value), None)
            }
            NodeKind::ThisExpression => ast.expression_this(SPAN),
            NodeKind::ArrayExpression { elements } => {
                let mut items = ast.vec_with_capacity(elements.len());
                for element in elements {
                    items.push(ArrayExpressionElement::from(self.expression(element)?));
                }
                ast.expression_array(SPAN, items)
            }
            NodeKind::ObjectExpression { properties } => {
                let mut items = ast.vec_with_capacity(properties.len());
                for property in properties {
                    items.push(self.property(property)?);
                }
                ast.expression_object(SPAN, items)
            }
            NodeKind::FunctionExpression {
                id,
                params,
                body,
                generator,
                is_async,
            } => {
                let id = id
                    .as_deref()
                    .map(|id| self.binding_identifier(id))
                    .transpose()?;
                let params = self.params(params)?;
                let body = self.function_body(body)?;
                ast.expression_function(
                    SPAN,
                    FunctionType::FunctionExpression,
                    id,
                    *generator,
                    *is_async,
                    false,
                    None::<TSTypeParameterDeclaration>,
                    None::<TSThisParameter>,
                    params,
                    None::<TSTypeAnnotation>,
                    Some(body),
                )
            }
            NodeKind::ArrowFunctionExpression {
                params,
                body,
                is_async,
            } => {
                let params = self.params(params)?;
                let (concise, body) = match &body.kind {
                    NodeKind::BlockStatement { .. } => (false, self.function_body(body)?),
                    _ => {
                        let expression = self.expression(body)?;
                        let statement = ast.statement_expression(SPAN, expression);
                        (true, ast.function_body(SPAN, ast.vec(), ast.vec1(statement)))
                    }
                };
                ast.expression_arrow_function(
                    SPAN,
                    concise,
                    *is_async,
                    None::<TSTypeParameterDeclaration>,
                    params,
                    None::<TSTypeAnnotation>,
                    body,
                )
            }
            NodeKind::UnaryExpression { operator, argument } => {
                let argument = self.expression(argument)?;
                ast.expression_unary(SPAN, *operator, argument)
            }
            NodeKind::UpdateExpression {
                operator,
                prefix,
                argument,
            } => {
                let target = match self.target(argument)? {
                    Target::Identifier(id) => SimpleAssignmentTarget::AssignmentTargetIdentifier(id),
                    Target::Static(member) => SimpleAssignmentTarget::StaticMemberExpression(member),
                    Target::Computed(member) => {
                        SimpleAssignmentTarget::ComputedMemberExpression(member)
                    }
                };
                ast.expression_update(SPAN, *operator, *prefix, target)
            }
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            } => {
                let left = self.expression(left)?;
                let right = self.expression(right)?;
                ast.expression_binary(SPAN, left, *operator, right)
            }
            NodeKind::LogicalExpression {
                operator,
                left,
                right,
            } => {
                let left = self.expression(left)?;
                let right = self.expression(right)?;
                ast.expression_logical(SPAN, left, *operator, right)
            }
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                let target = match self.target(left)? {
                    Target::Identifier(id) => AssignmentTarget::AssignmentTargetIdentifier(id),
                    Target::Static(member) => AssignmentTarget::StaticMemberExpression(member),
                    Target::Computed(member) => AssignmentTarget::ComputedMemberExpression(member),
                };
                let right = self.expression(right)?;
                ast.expression_assignment(SPAN, *operator, target, right)
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                let test = self.expression(test)?;
                let consequent = self.expression(consequent)?;
                let alternate = self.expression(alternate)?;
                ast.expression_conditional(SPAN, test, consequent, alternate)
            }
            NodeKind::CallExpression { callee, arguments } => {
                let callee = self.expression(callee)?;
                let arguments = self.arguments(arguments)?;
                ast.expression_call(
                    SPAN,
                    callee,
                    None::<TSTypeParameterInstantiation>,
                    arguments,
                    false,
                )
            }
            NodeKind::NewExpression { callee, arguments } => {
                let callee = self.expression(callee)?;
                let arguments = self.arguments(arguments)?;
                ast.expression_new(SPAN, callee, None::<TSTypeParameterInstantiation>, arguments)
            }
            NodeKind::MemberExpression { .. } => match self.target(node)? {
                Target::Static(member) => Expression::StaticMemberExpression(member),
                Target::Computed(member) => Expression::ComputedMemberExpression(member),
                Target::Identifier(_) => return Err(mismatch("MemberExpression", node)),
            },
            NodeKind::SequenceExpression { expressions } => {
                let expressions = self.expressions(expressions)?;
                ast.expression_sequence(SPAN, expressions)
            }
            _ => return Err(mismatch("an expression", node)),
        };
        Ok(expression)
    }

    fn property(&mut self, node: &Node) -> Result<ObjectPropertyKind<'a>> {
        let NodeKind::Property {
            key,
            value,
            computed,
            shorthand,
        } = &node.kind
        else {
            return Err(mismatch("Property", node));
        };
        let ast = self.ast;
        let property_key = match (&key.kind, computed) {
            (NodeKind::Identifier { name }, false) => {
                PropertyKey::StaticIdentifier(ast.alloc(ast.identifier_name(SPAN, ast.atom(name))))
            }
            _ => PropertyKey::from(self.expression(key)?),
        };
        let value = self.expression(value)?;
        let shorthand = *shorthand
            && !*computed
            && key.identifier_name().is_some()
            && key.identifier_name() == value_name(&value);
        Ok(ObjectPropertyKind::ObjectProperty(ast.alloc(ast.object_property(
            SPAN,
            PropertyKind::Init,
            property_key,
            value,
            false,
            shorthand,
            *computed,
        ))))
    }

    fn target(&mut self, node: &Node) -> Result<Target<'a>> {
        let ast = self.ast;
        match &node.kind {
            NodeKind::Identifier { name } => Ok(Target::Identifier(
                ast.alloc_identifier_reference(SPAN, ast.atom(name)),
            )),
            NodeKind::MemberExpression {
                object,
                property,
                computed: false,
            } => {
                let name = property
                    .identifier_name()
                    .ok_or_else(|| mismatch("Identifier", property))?;
                let object = self.expression(object)?;
                let property = ast.identifier_name(SPAN, ast.atom(name));
                Ok(Target::Static(
                    ast.alloc_static_member_expression(SPAN, object, property, false),
                ))
            }
            NodeKind::MemberExpression {
                object,
                property,
                computed: true,
            } => {
                let object = self.expression(object)?;
                let property = self.expression(property)?;
                Ok(Target::Computed(
                    ast.alloc_computed_member_expression(SPAN, object, property, false),
                ))
            }
            _ => Err(Error::unsupported(format!(
                "{} cannot be assigned to",
                node.node_type()
            ))),
        }
    }

    fn for_left(&mut self, node: &Node) -> Result<ForStatementLeft<'a>> {
        if let NodeKind::VariableDeclaration { .. } = node.kind {
            return Ok(ForStatementLeft::VariableDeclaration(self.variable_declaration(node)?));
        }
        Ok(match self.target(node)? {
            Target::Identifier(id) => ForStatementLeft::AssignmentTargetIdentifier(id),
            Target::Static(member) => ForStatementLeft::StaticMemberExpression(member),
            Target::Computed(member) => ForStatementLeft::ComputedMemberExpression(member),
        })
    }
}

/// Leading comments of a statement, including those still on its expression
fn statement_comments(node: &Node) -> Vec<&Comment> {
    let mut comments: Vec<&Comment> = node.leading_comments.iter().collect();
    if let NodeKind::ExpressionStatement { expression } = &node.kind {
        comments.extend(expression.leading_comments.iter());
        comments.extend(expression.trailing_comments.iter());
    }
    comments
}

fn value_name<'e>(value: &'e Expression<'_>) -> Option<&'e str> {
    match value {
        Expression::Identifier(id) => Some(id.name.as_str()),
        _ => None,
    }
}
