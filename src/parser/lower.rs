//! Conversion from the oxc syntax tree into [`Node`]s

use oxc_ast::ast::{
    Argument, ArrayExpressionElement, AssignmentTarget, BindingPattern, BindingPatternKind,
    Directive, Expression, ForStatementInit, ForStatementLeft, FormalParameters, Function, FunctionBody,
    ObjectPropertyKind, Program, PropertyKey, PropertyKind, SimpleAssignmentTarget, Statement,
    VariableDeclaration, VariableDeclarationKind,
};
use oxc_span::{GetSpan, Span};

use crate::ast::{DeclarationKind, Node, NodeKind};
use crate::error::{Error, Result};

/// Lowers one parsed program; holds the source for literal text
pub(super) struct Lowerer<'s> {
    source: &'s str,
}

fn spanned(kind: NodeKind, span: Span) -> Node {
    let mut node = Node::new(kind);
    node.span = Some(span);
    node
}

fn unsupported(what: &str, span: Span) -> Error {
    Error::unsupported(format!("{} at offset {} is not supported", what, span.start))
}

impl<'s> Lowerer<'s> {
    pub(super) fn new(source: &'s str) -> Self {
        Self { source }
    }

    pub(super) fn program(&self, program: &Program<'_>) -> Result<Node> {
        let mut body = Vec::with_capacity(program.directives.len() + program.body.len());
        for directive in &program.directives {
            body.push(self.directive(directive));
        }
        for statement in &program.body {
            body.push(self.statement(statement)?);
        }
        Ok(spanned(NodeKind::Program { body }, program.span))
    }

    /// Directive prologues stay plain string statements
    fn directive(&self, directive: &Directive<'_>) -> Node {
        let literal_span = directive.expression.span;
        let mut literal = spanned(
            NodeKind::StringLiteral {
                value: directive.expression.value.to_string(),
            },
            literal_span,
        );
        literal.extra.raw = Some(literal_span.source_text(self.source).to_string());
        spanned(
            NodeKind::ExpressionStatement {
                expression: Box::new(literal),
            },
            directive.span,
        )
    }

    fn statements(&self, statements: &[Statement<'_>]) -> Result<Vec<Node>> {
        statements.iter().map(|s| self.statement(s)).collect()
    }

    fn boxed_statement(&self, statement: &Statement<'_>) -> Result<Box<Node>> {
        self.statement(statement).map(Box::new)
    }

    fn statement(&self, statement: &Statement<'_>) -> Result<Node> {
        let span = statement.span();
        let kind = match statement {
            Statement::ExpressionStatement(stmt) => NodeKind::ExpressionStatement {
                expression: self.boxed(&stmt.expression)?,
            },
            Statement::BlockStatement(block) => NodeKind::BlockStatement {
                body: self.statements(&block.body)?,
            },
            Statement::EmptyStatement(_) => NodeKind::EmptyStatement,
            Statement::DebuggerStatement(_) => NodeKind::DebuggerStatement,
            Statement::ReturnStatement(stmt) => NodeKind::ReturnStatement {
                argument: self.optional(stmt.argument.as_ref())?,
            },
            Statement::ThrowStatement(stmt) => NodeKind::ThrowStatement {
                argument: self.boxed(&stmt.argument)?,
            },
            Statement::BreakStatement(stmt) => NodeKind::BreakStatement {
                label: stmt.label.as_ref().map(|label| label.name.to_string()),
            },
            Statement::ContinueStatement(stmt) => NodeKind::ContinueStatement {
                label: stmt.label.as_ref().map(|label| label.name.to_string()),
            },
            Statement::LabeledStatement(stmt) => NodeKind::LabeledStatement {
                label: stmt.label.name.to_string(),
                body: self.boxed_statement(&stmt.body)?,
            },
            Statement::IfStatement(stmt) => NodeKind::IfStatement {
                test: self.boxed(&stmt.test)?,
                consequent: self.boxed_statement(&stmt.consequent)?,
                alternate: match &stmt.alternate {
                    Some(alternate) => Some(self.boxed_statement(alternate)?),
                    None => None,
                },
            },
            Statement::ForStatement(stmt) => NodeKind::ForStatement {
                init: match &stmt.init {
                    Some(ForStatementInit::VariableDeclaration(declaration)) => {
                        Some(Box::new(self.variable_declaration(declaration)?))
                    }
                    Some(init) => match init.as_expression() {
                        Some(expression) => Some(self.boxed(expression)?),
                        None => return Err(unsupported("for initializer", span)),
                    },
                    None => None,
                },
                test: self.optional(stmt.test.as_ref())?,
                update: self.optional(stmt.update.as_ref())?,
                body: self.boxed_statement(&stmt.body)?,
            },
            Statement::ForInStatement(stmt) => NodeKind::ForInStatement {
                left: Box::new(self.for_left(&stmt.left)?),
                right: self.boxed(&stmt.right)?,
                body: self.boxed_statement(&stmt.body)?,
            },
            Statement::ForOfStatement(stmt) => {
                if stmt.r#await {
                    return Err(unsupported("for await", span));
                }
                NodeKind::ForOfStatement {
                    left: Box::new(self.for_left(&stmt.left)?),
                    right: self.boxed(&stmt.right)?,
                    body: self.boxed_statement(&stmt.body)?,
                }
            }
            Statement::WhileStatement(stmt) => NodeKind::WhileStatement {
                test: self.boxed(&stmt.test)?,
                body: self.boxed_statement(&stmt.body)?,
            },
            Statement::DoWhileStatement(stmt) => NodeKind::DoWhileStatement {
                body: self.boxed_statement(&stmt.body)?,
                test: self.boxed(&stmt.test)?,
            },
            Statement::TryStatement(stmt) => NodeKind::TryStatement {
                block: Box::new(self.block(stmt.block.span, &stmt.block.body)?),
                handler: match &stmt.handler {
                    Some(handler) => {
                        let param = match &handler.param {
                            Some(param) => Some(Box::new(self.binding(&param.pattern)?)),
                            None => None,
                        };
                        Some(Box::new(spanned(
                            NodeKind::CatchClause {
                                param,
                                body: Box::new(self.block(handler.body.span, &handler.body.body)?),
                            },
                            handler.span,
                        )))
                    }
                    None => None,
                },
                finalizer: match &stmt.finalizer {
                    Some(finalizer) => {
                        Some(Box::new(self.block(finalizer.span, &finalizer.body)?))
                    }
                    None => None,
                },
            },
            Statement::VariableDeclaration(declaration) => {
                return self.variable_declaration(declaration)
            }
            Statement::FunctionDeclaration(function) => return self.function(function, true),
            Statement::SwitchStatement(_) => return Err(unsupported("switch statement", span)),
            Statement::WithStatement(_) => return Err(unsupported("with statement", span)),
            Statement::ClassDeclaration(_) => return Err(unsupported("class declaration", span)),
            _ => return Err(unsupported("statement", span)),
        };
        Ok(spanned(kind, span))
    }

    fn block(&self, span: Span, body: &[Statement<'_>]) -> Result<Node> {
        Ok(spanned(
            NodeKind::BlockStatement {
                body: self.statements(body)?,
            },
            span,
        ))
    }

    fn variable_declaration(&self, declaration: &VariableDeclaration<'_>) -> Result<Node> {
        let kind = match declaration.kind {
            VariableDeclarationKind::Var => DeclarationKind::Var,
            VariableDeclarationKind::Let => DeclarationKind::Let,
            VariableDeclarationKind::Const => DeclarationKind::Const,
            _ => return Err(unsupported("`using` declaration", declaration.span)),
        };
        let declarations = declaration
            .declarations
            .iter()
            .map(|declarator| {
                Ok(spanned(
                    NodeKind::VariableDeclarator {
                        id: Box::new(self.binding(&declarator.id)?),
                        init: self.optional(declarator.init.as_ref())?,
                    },
                    declarator.span,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(spanned(
            NodeKind::VariableDeclaration { kind, declarations },
            declaration.span,
        ))
    }

    /// Only plain identifiers bind names here
    fn binding(&self, pattern: &BindingPattern<'_>) -> Result<Node> {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(id) => Ok(spanned(
                NodeKind::Identifier {
                    name: id.name.to_string(),
                },
                id.span,
            )),
            _ => Err(unsupported("destructuring pattern", pattern.span())),
        }
    }

    fn params(&self, params: &FormalParameters<'_>) -> Result<Vec<Node>> {
        if let Some(rest) = &params.rest {
            return Err(unsupported("rest parameter", rest.span));
        }
        params
            .items
            .iter()
            .map(|param| self.binding(&param.pattern))
            .collect()
    }

    fn function_body(&self, body: Option<&FunctionBody<'_>>, span: Span) -> Result<Node> {
        let Some(body) = body else {
            return Err(unsupported("function without a body", span));
        };
        let mut statements = Vec::with_capacity(body.directives.len() + body.statements.len());
        for directive in &body.directives {
            statements.push(self.directive(directive));
        }
        statements.extend(self.statements(&body.statements)?);
        Ok(spanned(NodeKind::BlockStatement { body: statements }, body.span))
    }

    fn function(&self, function: &Function<'_>, declaration: bool) -> Result<Node> {
        let id = function.id.as_ref().map(|id| {
            Box::new(spanned(
                NodeKind::Identifier {
                    name: id.name.to_string(),
                },
                id.span,
            ))
        });
        let params = self.params(&function.params)?;
        let body = Box::new(self.function_body(function.body.as_deref(), function.span)?);
        let kind = if declaration {
            NodeKind::FunctionDeclaration {
                id,
                params,
                body,
                generator: function.generator,
                is_async: function.r#async,
            }
        } else {
            NodeKind::FunctionExpression {
                id,
                params,
                body,
                generator: function.generator,
                is_async: function.r#async,
            }
        };
        Ok(spanned(kind, function.span))
    }

    fn boxed(&self, expression: &Expression<'_>) -> Result<Box<Node>> {
        self.expression(expression).map(Box::new)
    }

    fn optional(&self, expression: Option<&Expression<'_>>) -> Result<Option<Box<Node>>> {
        expression.map(|e| self.boxed(e)).transpose()
    }

    fn expression(&self, expression: &Expression<'_>) -> Result<Node> {
        let span = expression.span();
        let kind = match expression {
            Expression::ParenthesizedExpression(paren) => {
                let mut inner = self.expression(&paren.expression)?;
                inner.extra.parenthesized = true;
                return Ok(inner);
            }
            Expression::Identifier(id) => NodeKind::Identifier {
                name: id.name.to_string(),
            },
            Expression::NullLiteral(_) => NodeKind::NullLiteral,
            Expression::BooleanLiteral(lit) => NodeKind::BooleanLiteral { value: lit.value },
            Expression::NumericLiteral(lit) => {
                let mut node = spanned(NodeKind::NumericLiteral { value: lit.value }, span);
                node.extra.raw = lit.raw.as_ref().map(|raw| raw.to_string());
                return Ok(node);
            }
            Expression::StringLiteral(lit) => {
                let mut node = spanned(
                    NodeKind::StringLiteral {
                        value: lit.value.to_string(),
                    },
                    span,
                );
                node.extra.raw = Some(span.source_text(self.source).to_string());
                return Ok(node);
            }
            Expression::ThisExpression(_) => NodeKind::ThisExpression,
            Expression::ArrayExpression(array) => NodeKind::ArrayExpression {
                elements: array
                    .elements
                    .iter()
                    .map(|element| self.array_element(element))
                    .collect::<Result<_>>()?,
            },
            Expression::ObjectExpression(object) => NodeKind::ObjectExpression {
                properties: object
                    .properties
                    .iter()
                    .map(|property| self.property(property))
                    .collect::<Result<_>>()?,
            },
            Expression::FunctionExpression(function) => return self.function(function, false),
            Expression::ArrowFunctionExpression(arrow) => {
                let body = if arrow.expression {
                    match arrow.body.statements.first() {
                        Some(Statement::ExpressionStatement(stmt)) => self.expression(&stmt.expression)?,
                        _ => return Err(Error::internal("concise arrow body without an expression")),
                    }
                } else {
                    self.function_body(Some(&arrow.body), arrow.span)?
                };
                NodeKind::ArrowFunctionExpression {
                    params: self.params(&arrow.params)?,
                    body: Box::new(body),
                    is_async: arrow.r#async,
                }
            }
            Expression::UnaryExpression(unary) => NodeKind::UnaryExpression {
                operator: unary.operator,
                argument: self.boxed(&unary.argument)?,
            },
            Expression::UpdateExpression(update) => NodeKind::UpdateExpression {
                operator: update.operator,
                prefix: update.prefix,
                argument: Box::new(self.simple_target(&update.argument)?),
            },
            Expression::BinaryExpression(binary) => NodeKind::BinaryExpression {
                operator: binary.operator,
                left: self.boxed(&binary.left)?,
                right: self.boxed(&binary.right)?,
            },
            Expression::LogicalExpression(logical) => NodeKind::LogicalExpression {
                operator: logical.operator,
                left: self.boxed(&logical.left)?,
                right: self.boxed(&logical.right)?,
            },
            Expression::AssignmentExpression(assignment) => NodeKind::AssignmentExpression {
                operator: assignment.operator,
                left: Box::new(self.assignment_target(&assignment.left)?),
                right: self.boxed(&assignment.right)?,
            },
            Expression::ConditionalExpression(conditional) => NodeKind::ConditionalExpression {
                test: self.boxed(&conditional.test)?,
                consequent: self.boxed(&conditional.consequent)?,
                alternate: self.boxed(&conditional.alternate)?,
            },
            Expression::CallExpression(call) => {
                if call.optional {
                    return Err(unsupported("optional call", span));
                }
                NodeKind::CallExpression {
                    callee: self.boxed(&call.callee)?,
                    arguments: self.arguments(&call.arguments)?,
                }
            }
            Expression::NewExpression(new) => NodeKind::NewExpression {
                callee: self.boxed(&new.callee)?,
                arguments: self.arguments(&new.arguments)?,
            },
            Expression::StaticMemberExpression(member) => NodeKind::MemberExpression {
                object: self.boxed(&member.object)?,
                property: Box::new(spanned(
                    NodeKind::Identifier {
                        name: member.property.name.to_string(),
                    },
                    member.property.span,
                )),
                computed: false,
            },
            Expression::ComputedMemberExpression(member) => NodeKind::MemberExpression {
                object: self.boxed(&member.object)?,
                property: self.boxed(&member.expression)?,
                computed: true,
            },
            Expression::SequenceExpression(sequence) => NodeKind::SequenceExpression {
                expressions: sequence
                    .expressions
                    .iter()
                    .map(|e| self.expression(e))
                    .collect::<Result<_>>()?,
            },
            Expression::TemplateLiteral(_) => return Err(unsupported("template literal", span)),
            Expression::RegExpLiteral(_) => return Err(unsupported("regular expression", span)),
            Expression::ClassExpression(_) => return Err(unsupported("class expression", span)),
            _ => return Err(unsupported("expression", span)),
        };
        Ok(spanned(kind, span))
    }

    fn array_element(&self, element: &ArrayExpressionElement<'_>) -> Result<Node> {
        match element.as_expression() {
            Some(expression) => self.expression(expression),
            None => Err(unsupported("spread or hole in array", element.span())),
        }
    }

    fn arguments(&self, arguments: &[Argument<'_>]) -> Result<Vec<Node>> {
        arguments
            .iter()
            .map(|argument| match argument.as_expression() {
                Some(expression) => self.expression(expression),
                None => Err(unsupported("spread argument", argument.span())),
            })
            .collect()
    }

    fn property(&self, property: &ObjectPropertyKind<'_>) -> Result<Node> {
        let ObjectPropertyKind::ObjectProperty(property) = property else {
            return Err(unsupported("object spread", property.span()));
        };
        if property.kind != PropertyKind::Init || property.method {
            return Err(unsupported("accessor or method property", property.span));
        }
        let key = match &property.key {
            PropertyKey::StaticIdentifier(id) => spanned(
                NodeKind::Identifier {
                    name: id.name.to_string(),
                },
                id.span,
            ),
            key => match key.as_expression() {
                Some(expression) => self.expression(expression)?,
                None => return Err(unsupported("private property key", key.span())),
            },
        };
        Ok(spanned(
            NodeKind::Property {
                key: Box::new(key),
                value: self.boxed(&property.value)?,
                computed: property.computed,
                shorthand: property.shorthand,
            },
            property.span,
        ))
    }

    fn simple_target(&self, target: &SimpleAssignmentTarget<'_>) -> Result<Node> {
        match target {
            SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => Ok(spanned(
                NodeKind::Identifier {
                    name: id.name.to_string(),
                },
                id.span,
            )),
            SimpleAssignmentTarget::StaticMemberExpression(member) => Ok(spanned(
                NodeKind::MemberExpression {
                    object: self.boxed(&member.object)?,
                    property: Box::new(spanned(
                        NodeKind::Identifier {
                            name: member.property.name.to_string(),
                        },
                        member.property.span,
                    )),
                    computed: false,
                },
                member.span,
            )),
            SimpleAssignmentTarget::ComputedMemberExpression(member) => Ok(spanned(
                NodeKind::MemberExpression {
                    object: self.boxed(&member.object)?,
                    property: self.boxed(&member.expression)?,
                    computed: true,
                },
                member.span,
            )),
            other => Err(unsupported("assignment target", other.span())),
        }
    }

    fn assignment_target(&self, target: &AssignmentTarget<'_>) -> Result<Node> {
        match target.as_simple_assignment_target() {
            Some(simple) => self.simple_target(simple),
            None => Err(unsupported("destructuring assignment", target.span())),
        }
    }

    fn for_left(&self, left: &ForStatementLeft<'_>) -> Result<Node> {
        match left {
            ForStatementLeft::VariableDeclaration(declaration) => {
                self.variable_declaration(declaration)
            }
            left => match left.as_assignment_target() {
                Some(target) => self.assignment_target(target),
                None => Err(unsupported("for-in/of target", left.span())),
            },
        }
    }
}
