//! Node constructors
//!
//! Each builder returns a detached node with a fresh identity.

use oxc_syntax::operator::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};

use super::node::{DeclarationKind, Node, NodeKind};

pub fn program(body: Vec<Node>) -> Node {
    Node::new(NodeKind::Program { body })
}

pub fn identifier(name: impl Into<String>) -> Node {
    Node::new(NodeKind::Identifier { name: name.into() })
}

pub fn null_literal() -> Node {
    Node::new(NodeKind::NullLiteral)
}

pub fn boolean_literal(value: bool) -> Node {
    Node::new(NodeKind::BooleanLiteral { value })
}

pub fn numeric_literal(value: f64) -> Node {
    Node::new(NodeKind::NumericLiteral { value })
}

pub fn string_literal(value: impl Into<String>) -> Node {
    Node::new(NodeKind::StringLiteral {
        value: value.into(),
    })
}

pub fn this_expression() -> Node {
    Node::new(NodeKind::ThisExpression)
}

/// `void 0`, the shortest expression evaluating to `undefined`
pub fn undefined_node() -> Node {
    unary_expression(UnaryOperator::Void, numeric_literal(0.0))
}

pub fn expression_statement(expression: Node) -> Node {
    Node::new(NodeKind::ExpressionStatement {
        expression: Box::new(expression),
    })
}

pub fn block_statement(body: Vec<Node>) -> Node {
    Node::new(NodeKind::BlockStatement { body })
}

pub fn empty_statement() -> Node {
    Node::new(NodeKind::EmptyStatement)
}

pub fn debugger_statement() -> Node {
    Node::new(NodeKind::DebuggerStatement)
}

pub fn return_statement(argument: Option<Node>) -> Node {
    Node::new(NodeKind::ReturnStatement {
        argument: argument.map(Box::new),
    })
}

pub fn throw_statement(argument: Node) -> Node {
    Node::new(NodeKind::ThrowStatement {
        argument: Box::new(argument),
    })
}

pub fn break_statement(label: Option<String>) -> Node {
    Node::new(NodeKind::BreakStatement { label })
}

pub fn continue_statement(label: Option<String>) -> Node {
    Node::new(NodeKind::ContinueStatement { label })
}

pub fn labeled_statement(label: impl Into<String>, body: Node) -> Node {
    Node::new(NodeKind::LabeledStatement {
        label: label.into(),
        body: Box::new(body),
    })
}

pub fn if_statement(test: Node, consequent: Node, alternate: Option<Node>) -> Node {
    Node::new(NodeKind::IfStatement {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
    })
}

pub fn for_statement(
    init: Option<Node>,
    test: Option<Node>,
    update: Option<Node>,
    body: Node,
) -> Node {
    Node::new(NodeKind::ForStatement {
        init: init.map(Box::new),
        test: test.map(Box::new),
        update: update.map(Box::new),
        body: Box::new(body),
    })
}

pub fn for_in_statement(left: Node, right: Node, body: Node) -> Node {
    Node::new(NodeKind::ForInStatement {
        left: Box::new(left),
        right: Box::new(right),
        body: Box::new(body),
    })
}

pub fn for_of_statement(left: Node, right: Node, body: Node) -> Node {
    Node::new(NodeKind::ForOfStatement {
        left: Box::new(left),
        right: Box::new(right),
        body: Box::new(body),
    })
}

pub fn while_statement(test: Node, body: Node) -> Node {
    Node::new(NodeKind::WhileStatement {
        test: Box::new(test),
        body: Box::new(body),
    })
}

pub fn do_while_statement(body: Node, test: Node) -> Node {
    Node::new(NodeKind::DoWhileStatement {
        body: Box::new(body),
        test: Box::new(test),
    })
}

pub fn try_statement(block: Node, handler: Option<Node>, finalizer: Option<Node>) -> Node {
    Node::new(NodeKind::TryStatement {
        block: Box::new(block),
        handler: handler.map(Box::new),
        finalizer: finalizer.map(Box::new),
    })
}

pub fn catch_clause(param: Option<Node>, body: Node) -> Node {
    Node::new(NodeKind::CatchClause {
        param: param.map(Box::new),
        body: Box::new(body),
    })
}

pub fn variable_declaration(kind: DeclarationKind, declarations: Vec<Node>) -> Node {
    Node::new(NodeKind::VariableDeclaration { kind, declarations })
}

pub fn variable_declarator(id: Node, init: Option<Node>) -> Node {
    Node::new(NodeKind::VariableDeclarator {
        id: Box::new(id),
        init: init.map(Box::new),
    })
}

pub fn function_declaration(id: Node, params: Vec<Node>, body: Node) -> Node {
    Node::new(NodeKind::FunctionDeclaration {
        id: Some(Box::new(id)),
        params,
        body: Box::new(body),
        generator: false,
        is_async: false,
    })
}

pub fn function_expression(id: Option<Node>, params: Vec<Node>, body: Node) -> Node {
    Node::new(NodeKind::FunctionExpression {
        id: id.map(Box::new),
        params,
        body: Box::new(body),
        generator: false,
        is_async: false,
    })
}

pub fn arrow_function_expression(params: Vec<Node>, body: Node) -> Node {
    Node::new(NodeKind::ArrowFunctionExpression {
        params,
        body: Box::new(body),
        is_async: false,
    })
}

pub fn array_expression(elements: Vec<Node>) -> Node {
    Node::new(NodeKind::ArrayExpression { elements })
}

pub fn object_expression(properties: Vec<Node>) -> Node {
    Node::new(NodeKind::ObjectExpression { properties })
}

pub fn property(key: Node, value: Node, computed: bool) -> Node {
    Node::new(NodeKind::Property {
        key: Box::new(key),
        value: Box::new(value),
        computed,
        shorthand: false,
    })
}

pub fn unary_expression(operator: UnaryOperator, argument: Node) -> Node {
    Node::new(NodeKind::UnaryExpression {
        operator,
        argument: Box::new(argument),
    })
}

pub fn update_expression(operator: UpdateOperator, prefix: bool, argument: Node) -> Node {
    Node::new(NodeKind::UpdateExpression {
        operator,
        prefix,
        argument: Box::new(argument),
    })
}

pub fn binary_expression(operator: BinaryOperator, left: Node, right: Node) -> Node {
    Node::new(NodeKind::BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn logical_expression(operator: LogicalOperator, left: Node, right: Node) -> Node {
    Node::new(NodeKind::LogicalExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn assignment_expression(operator: AssignmentOperator, left: Node, right: Node) -> Node {
    Node::new(NodeKind::AssignmentExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `left = right`
pub fn assign(left: Node, right: Node) -> Node {
    assignment_expression(AssignmentOperator::Assign, left, right)
}

pub fn conditional_expression(test: Node, consequent: Node, alternate: Node) -> Node {
    Node::new(NodeKind::ConditionalExpression {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    })
}

pub fn call_expression(callee: Node, arguments: Vec<Node>) -> Node {
    Node::new(NodeKind::CallExpression {
        callee: Box::new(callee),
        arguments,
    })
}

pub fn new_expression(callee: Node, arguments: Vec<Node>) -> Node {
    Node::new(NodeKind::NewExpression {
        callee: Box::new(callee),
        arguments,
    })
}

pub fn member_expression(object: Node, property: Node, computed: bool) -> Node {
    Node::new(NodeKind::MemberExpression {
        object: Box::new(object),
        property: Box::new(property),
        computed,
    })
}

pub fn sequence_expression(expressions: Vec<Node>) -> Node {
    Node::new(NodeKind::SequenceExpression { expressions })
}
