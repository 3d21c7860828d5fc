//! Syntax node model
//!
//! Every syntactic kind is a variant of [`NodeKind`] carrying only its own
//! fields. The shared parts (identity, comments, span, bookkeeping) live on
//! [`Node`]. Children are addressed by field key through [`Slot`]s so that a
//! path can point at any position without borrowing the tree.

use oxc_span::Span;
use oxc_syntax::operator::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::serde_helpers::serialize_operator;

/// Process-unique node identity
pub type NodeId = usize;

static NEXT_NODE_ID: AtomicUsize = AtomicUsize::new(1);

/// Allocate a fresh node identity
pub fn next_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Comment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommentKind {
    /// Single line comment //
    Line,
    /// Block comment /* */
    Block,
}

/// A comment attached to a node, without its delimiters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Comment {
    pub kind: CommentKind,
    pub value: String,
}

impl Comment {
    pub fn line(value: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Line,
            value: value.into(),
        }
    }

    pub fn block(value: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Block,
            value: value.into(),
        }
    }
}

/// Internal bookkeeping carried by a node.
///
/// None of it affects what the node means; [`crate::ast::helpers::remove_properties`]
/// clears all of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeExtra {
    /// Literal text as written in the source
    pub raw: Option<String>,
    /// The expression was wrapped in parentheses in the source
    pub parenthesized: bool,
    /// Declaration synthesized by a scope push; later pushes merge into it
    pub generated: bool,
    /// Function synthesized to embed statements in an expression position
    pub shadow: bool,
}

impl NodeExtra {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Variable declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }

    /// `var` declarations hoist to the nearest function boundary
    pub fn is_hoisted(&self) -> bool {
        matches!(self, DeclarationKind::Var)
    }
}

/// A syntax tree node
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    #[serde(skip)]
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(rename = "leadingComments", skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<Comment>,
    #[serde(rename = "trailingComments", skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<Comment>,
    #[serde(skip)]
    pub span: Option<Span>,
    #[serde(skip)]
    pub extra: NodeExtra,
}

/// Equality is structural: identity, spans and bookkeeping are ignored.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.leading_comments == other.leading_comments
            && self.trailing_comments == other.trailing_comments
    }
}

/// Node payload, one variant per syntactic kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
    },

    // Statements
    ExpressionStatement {
        expression: Box<Node>,
    },
    BlockStatement {
        body: Vec<Node>,
    },
    EmptyStatement,
    DebuggerStatement,
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    ThrowStatement {
        argument: Box<Node>,
    },
    BreakStatement {
        label: Option<String>,
    },
    ContinueStatement {
        label: Option<String>,
    },
    LabeledStatement {
        label: String,
        body: Box<Node>,
    },
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    ForStatement {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForInStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    ForOfStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhileStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    TryStatement {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        param: Option<Box<Node>>,
        body: Box<Node>,
    },
    VariableDeclaration {
        kind: DeclarationKind,
        declarations: Vec<Node>,
    },
    VariableDeclarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },
    FunctionDeclaration {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
        generator: bool,
        #[serde(rename = "async")]
        is_async: bool,
    },

    // Expressions
    FunctionExpression {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
        generator: bool,
        #[serde(rename = "async")]
        is_async: bool,
    },
    ArrowFunctionExpression {
        params: Vec<Node>,
        /// A block statement, or a bare expression for concise bodies
        body: Box<Node>,
        #[serde(rename = "async")]
        is_async: bool,
    },
    Identifier {
        name: String,
    },
    NullLiteral,
    BooleanLiteral {
        value: bool,
    },
    NumericLiteral {
        value: f64,
    },
    StringLiteral {
        value: String,
    },
    ThisExpression,
    ArrayExpression {
        elements: Vec<Node>,
    },
    ObjectExpression {
        properties: Vec<Node>,
    },
    Property {
        key: Box<Node>,
        value: Box<Node>,
        computed: bool,
        shorthand: bool,
    },
    UnaryExpression {
        #[serde(serialize_with = "serialize_operator")]
        operator: UnaryOperator,
        argument: Box<Node>,
    },
    UpdateExpression {
        #[serde(serialize_with = "serialize_operator")]
        operator: UpdateOperator,
        prefix: bool,
        argument: Box<Node>,
    },
    BinaryExpression {
        #[serde(serialize_with = "serialize_operator")]
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        #[serde(serialize_with = "serialize_operator")]
        operator: LogicalOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    AssignmentExpression {
        #[serde(serialize_with = "serialize_operator")]
        operator: AssignmentOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    NewExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    SequenceExpression {
        expressions: Vec<Node>,
    },
}

/// Discriminant of a [`NodeKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Program,
    ExpressionStatement,
    BlockStatement,
    EmptyStatement,
    DebuggerStatement,
    ReturnStatement,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    LabeledStatement,
    IfStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    WhileStatement,
    DoWhileStatement,
    TryStatement,
    CatchClause,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunctionExpression,
    Identifier,
    NullLiteral,
    BooleanLiteral,
    NumericLiteral,
    StringLiteral,
    ThisExpression,
    ArrayExpression,
    ObjectExpression,
    Property,
    UnaryExpression,
    UpdateExpression,
    BinaryExpression,
    LogicalExpression,
    AssignmentExpression,
    ConditionalExpression,
    CallExpression,
    NewExpression,
    MemberExpression,
    SequenceExpression,
}

/// Groups of node types that share behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Statement,
    Expression,
    Function,
    Loop,
    For,
    Declaration,
    /// Nodes that may own a lexical scope frame
    Scopable,
}

impl NodeType {
    pub const ALL: [NodeType; 42] = [
        NodeType::Program,
        NodeType::ExpressionStatement,
        NodeType::BlockStatement,
        NodeType::EmptyStatement,
        NodeType::DebuggerStatement,
        NodeType::ReturnStatement,
        NodeType::ThrowStatement,
        NodeType::BreakStatement,
        NodeType::ContinueStatement,
        NodeType::LabeledStatement,
        NodeType::IfStatement,
        NodeType::ForStatement,
        NodeType::ForInStatement,
        NodeType::ForOfStatement,
        NodeType::WhileStatement,
        NodeType::DoWhileStatement,
        NodeType::TryStatement,
        NodeType::CatchClause,
        NodeType::VariableDeclaration,
        NodeType::VariableDeclarator,
        NodeType::FunctionDeclaration,
        NodeType::FunctionExpression,
        NodeType::ArrowFunctionExpression,
        NodeType::Identifier,
        NodeType::NullLiteral,
        NodeType::BooleanLiteral,
        NodeType::NumericLiteral,
        NodeType::StringLiteral,
        NodeType::ThisExpression,
        NodeType::ArrayExpression,
        NodeType::ObjectExpression,
        NodeType::Property,
        NodeType::UnaryExpression,
        NodeType::UpdateExpression,
        NodeType::BinaryExpression,
        NodeType::LogicalExpression,
        NodeType::AssignmentExpression,
        NodeType::ConditionalExpression,
        NodeType::CallExpression,
        NodeType::NewExpression,
        NodeType::MemberExpression,
        NodeType::SequenceExpression,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Program => "Program",
            NodeType::ExpressionStatement => "ExpressionStatement",
            NodeType::BlockStatement => "BlockStatement",
            NodeType::EmptyStatement => "EmptyStatement",
            NodeType::DebuggerStatement => "DebuggerStatement",
            NodeType::ReturnStatement => "ReturnStatement",
            NodeType::ThrowStatement => "ThrowStatement",
            NodeType::BreakStatement => "BreakStatement",
            NodeType::ContinueStatement => "ContinueStatement",
            NodeType::LabeledStatement => "LabeledStatement",
            NodeType::IfStatement => "IfStatement",
            NodeType::ForStatement => "ForStatement",
            NodeType::ForInStatement => "ForInStatement",
            NodeType::ForOfStatement => "ForOfStatement",
            NodeType::WhileStatement => "WhileStatement",
            NodeType::DoWhileStatement => "DoWhileStatement",
            NodeType::TryStatement => "TryStatement",
            NodeType::CatchClause => "CatchClause",
            NodeType::VariableDeclaration => "VariableDeclaration",
            NodeType::VariableDeclarator => "VariableDeclarator",
            NodeType::FunctionDeclaration => "FunctionDeclaration",
            NodeType::FunctionExpression => "FunctionExpression",
            NodeType::ArrowFunctionExpression => "ArrowFunctionExpression",
            NodeType::Identifier => "Identifier",
            NodeType::NullLiteral => "NullLiteral",
            NodeType::BooleanLiteral => "BooleanLiteral",
            NodeType::NumericLiteral => "NumericLiteral",
            NodeType::StringLiteral => "StringLiteral",
            NodeType::ThisExpression => "ThisExpression",
            NodeType::ArrayExpression => "ArrayExpression",
            NodeType::ObjectExpression => "ObjectExpression",
            NodeType::Property => "Property",
            NodeType::UnaryExpression => "UnaryExpression",
            NodeType::UpdateExpression => "UpdateExpression",
            NodeType::BinaryExpression => "BinaryExpression",
            NodeType::LogicalExpression => "LogicalExpression",
            NodeType::AssignmentExpression => "AssignmentExpression",
            NodeType::ConditionalExpression => "ConditionalExpression",
            NodeType::CallExpression => "CallExpression",
            NodeType::NewExpression => "NewExpression",
            NodeType::MemberExpression => "MemberExpression",
            NodeType::SequenceExpression => "SequenceExpression",
        }
    }

    pub fn is(&self, category: Category) -> bool {
        match category {
            Category::Statement => self.is_statement(),
            Category::Expression => self.is_expression(),
            Category::Function => self.is_function(),
            Category::Loop => self.is_loop(),
            Category::For => matches!(
                self,
                NodeType::ForStatement | NodeType::ForInStatement | NodeType::ForOfStatement
            ),
            Category::Declaration => matches!(
                self,
                NodeType::VariableDeclaration | NodeType::FunctionDeclaration
            ),
            Category::Scopable => matches!(
                self,
                NodeType::Program
                    | NodeType::BlockStatement
                    | NodeType::CatchClause
                    | NodeType::ForStatement
                    | NodeType::ForInStatement
                    | NodeType::ForOfStatement
            ) || self.is_function(),
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeType::ExpressionStatement
                | NodeType::BlockStatement
                | NodeType::EmptyStatement
                | NodeType::DebuggerStatement
                | NodeType::ReturnStatement
                | NodeType::ThrowStatement
                | NodeType::BreakStatement
                | NodeType::ContinueStatement
                | NodeType::LabeledStatement
                | NodeType::IfStatement
                | NodeType::ForStatement
                | NodeType::ForInStatement
                | NodeType::ForOfStatement
                | NodeType::WhileStatement
                | NodeType::DoWhileStatement
                | NodeType::TryStatement
                | NodeType::VariableDeclaration
                | NodeType::FunctionDeclaration
        )
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeType::FunctionExpression
                | NodeType::ArrowFunctionExpression
                | NodeType::Identifier
                | NodeType::NullLiteral
                | NodeType::BooleanLiteral
                | NodeType::NumericLiteral
                | NodeType::StringLiteral
                | NodeType::ThisExpression
                | NodeType::ArrayExpression
                | NodeType::ObjectExpression
                | NodeType::UnaryExpression
                | NodeType::UpdateExpression
                | NodeType::BinaryExpression
                | NodeType::LogicalExpression
                | NodeType::AssignmentExpression
                | NodeType::ConditionalExpression
                | NodeType::CallExpression
                | NodeType::NewExpression
                | NodeType::MemberExpression
                | NodeType::SequenceExpression
        )
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            NodeType::FunctionDeclaration
                | NodeType::FunctionExpression
                | NodeType::ArrowFunctionExpression
        )
    }

    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            NodeType::ForStatement
                | NodeType::ForInStatement
                | NodeType::ForOfStatement
                | NodeType::WhileStatement
                | NodeType::DoWhileStatement
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view of one child field
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    /// Required single child
    Single(&'a Node),
    /// Single child that may be absent
    Optional(Option<&'a Node>),
    /// Ordered sequence of children
    List(&'a [Node]),
}

/// Mutable view of one child field
#[derive(Debug)]
pub enum SlotMut<'a> {
    Single(&'a mut Box<Node>),
    Optional(&'a mut Option<Box<Node>>),
    List(&'a mut Vec<Node>),
}

/// What a sequence field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Statements,
    Expressions,
    Declarators,
    Properties,
    Params,
}

/// Syntactic role of a single-child field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    Statement,
    Expression,
    Other,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Program { .. } => NodeType::Program,
            NodeKind::ExpressionStatement { .. } => NodeType::ExpressionStatement,
            NodeKind::BlockStatement { .. } => NodeType::BlockStatement,
            NodeKind::EmptyStatement => NodeType::EmptyStatement,
            NodeKind::DebuggerStatement => NodeType::DebuggerStatement,
            NodeKind::ReturnStatement { .. } => NodeType::ReturnStatement,
            NodeKind::ThrowStatement { .. } => NodeType::ThrowStatement,
            NodeKind::BreakStatement { .. } => NodeType::BreakStatement,
            NodeKind::ContinueStatement { .. } => NodeType::ContinueStatement,
            NodeKind::LabeledStatement { .. } => NodeType::LabeledStatement,
            NodeKind::IfStatement { .. } => NodeType::IfStatement,
            NodeKind::ForStatement { .. } => NodeType::ForStatement,
            NodeKind::ForInStatement { .. } => NodeType::ForInStatement,
            NodeKind::ForOfStatement { .. } => NodeType::ForOfStatement,
            NodeKind::WhileStatement { .. } => NodeType::WhileStatement,
            NodeKind::DoWhileStatement { .. } => NodeType::DoWhileStatement,
            NodeKind::TryStatement { .. } => NodeType::TryStatement,
            NodeKind::CatchClause { .. } => NodeType::CatchClause,
            NodeKind::VariableDeclaration { .. } => NodeType::VariableDeclaration,
            NodeKind::VariableDeclarator { .. } => NodeType::VariableDeclarator,
            NodeKind::FunctionDeclaration { .. } => NodeType::FunctionDeclaration,
            NodeKind::FunctionExpression { .. } => NodeType::FunctionExpression,
            NodeKind::ArrowFunctionExpression { .. } => NodeType::ArrowFunctionExpression,
            NodeKind::Identifier { .. } => NodeType::Identifier,
            NodeKind::NullLiteral => NodeType::NullLiteral,
            NodeKind::BooleanLiteral { .. } => NodeType::BooleanLiteral,
            NodeKind::NumericLiteral { .. } => NodeType::NumericLiteral,
            NodeKind::StringLiteral { .. } => NodeType::StringLiteral,
            NodeKind::ThisExpression => NodeType::ThisExpression,
            NodeKind::ArrayExpression { .. } => NodeType::ArrayExpression,
            NodeKind::ObjectExpression { .. } => NodeType::ObjectExpression,
            NodeKind::Property { .. } => NodeType::Property,
            NodeKind::UnaryExpression { .. } => NodeType::UnaryExpression,
            NodeKind::UpdateExpression { .. } => NodeType::UpdateExpression,
            NodeKind::BinaryExpression { .. } => NodeType::BinaryExpression,
            NodeKind::LogicalExpression { .. } => NodeType::LogicalExpression,
            NodeKind::AssignmentExpression { .. } => NodeType::AssignmentExpression,
            NodeKind::ConditionalExpression { .. } => NodeType::ConditionalExpression,
            NodeKind::CallExpression { .. } => NodeType::CallExpression,
            NodeKind::NewExpression { .. } => NodeType::NewExpression,
            NodeKind::MemberExpression { .. } => NodeType::MemberExpression,
            NodeKind::SequenceExpression { .. } => NodeType::SequenceExpression,
        }
    }

    /// Child fields in traversal order
    pub fn slots(&self) -> Vec<(&'static str, Slot<'_>)> {
        use Slot::{List, Optional, Single};
        match self {
            NodeKind::Program { body } | NodeKind::BlockStatement { body } => {
                vec![("body", List(body))]
            }
            NodeKind::ExpressionStatement { expression } => {
                vec![("expression", Single(expression))]
            }
            NodeKind::EmptyStatement
            | NodeKind::DebuggerStatement
            | NodeKind::BreakStatement { .. }
            | NodeKind::ContinueStatement { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::NullLiteral
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::ThisExpression => Vec::new(),
            NodeKind::ReturnStatement { argument } => {
                vec![("argument", Optional(argument.as_deref()))]
            }
            NodeKind::ThrowStatement { argument } => vec![("argument", Single(argument))],
            NodeKind::LabeledStatement { body, .. } => vec![("body", Single(body))],
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => vec![
                ("test", Single(test)),
                ("consequent", Single(consequent)),
                ("alternate", Optional(alternate.as_deref())),
            ],
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => vec![
                ("init", Optional(init.as_deref())),
                ("test", Optional(test.as_deref())),
                ("update", Optional(update.as_deref())),
                ("body", Single(body)),
            ],
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement { left, right, body } => vec![
                ("left", Single(left)),
                ("right", Single(right)),
                ("body", Single(body)),
            ],
            NodeKind::WhileStatement { test, body } => {
                vec![("test", Single(test)), ("body", Single(body))]
            }
            NodeKind::DoWhileStatement { body, test } => {
                vec![("body", Single(body)), ("test", Single(test))]
            }
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => vec![
                ("block", Single(block)),
                ("handler", Optional(handler.as_deref())),
                ("finalizer", Optional(finalizer.as_deref())),
            ],
            NodeKind::CatchClause { param, body } => vec![
                ("param", Optional(param.as_deref())),
                ("body", Single(body)),
            ],
            NodeKind::VariableDeclaration { declarations, .. } => {
                vec![("declarations", List(declarations))]
            }
            NodeKind::VariableDeclarator { id, init } => vec![
                ("id", Single(id)),
                ("init", Optional(init.as_deref())),
            ],
            NodeKind::FunctionDeclaration {
                id, params, body, ..
            }
            | NodeKind::FunctionExpression {
                id, params, body, ..
            } => vec![
                ("id", Optional(id.as_deref())),
                ("params", List(params)),
                ("body", Single(body)),
            ],
            NodeKind::ArrowFunctionExpression { params, body, .. } => {
                vec![("params", List(params)), ("body", Single(body))]
            }
            NodeKind::ArrayExpression { elements } => vec![("elements", List(elements))],
            NodeKind::ObjectExpression { properties } => {
                vec![("properties", List(properties))]
            }
            NodeKind::Property { key, value, .. } => {
                vec![("key", Single(key)), ("value", Single(value))]
            }
            NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => {
                vec![("argument", Single(argument))]
            }
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. } => {
                vec![("left", Single(left)), ("right", Single(right))]
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => vec![
                ("test", Single(test)),
                ("consequent", Single(consequent)),
                ("alternate", Single(alternate)),
            ],
            NodeKind::CallExpression { callee, arguments }
            | NodeKind::NewExpression { callee, arguments } => {
                vec![("callee", Single(callee)), ("arguments", List(arguments))]
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => vec![("object", Single(object)), ("property", Single(property))],
            NodeKind::SequenceExpression { expressions } => {
                vec![("expressions", List(expressions))]
            }
        }
    }

    /// Mutable child fields, same keys and order as [`NodeKind::slots`]
    pub fn slots_mut(&mut self) -> Vec<(&'static str, SlotMut<'_>)> {
        use SlotMut::{List, Optional, Single};
        match self {
            NodeKind::Program { body } | NodeKind::BlockStatement { body } => {
                vec![("body", List(body))]
            }
            NodeKind::ExpressionStatement { expression } => {
                vec![("expression", Single(expression))]
            }
            NodeKind::EmptyStatement
            | NodeKind::DebuggerStatement
            | NodeKind::BreakStatement { .. }
            | NodeKind::ContinueStatement { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::NullLiteral
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::ThisExpression => Vec::new(),
            NodeKind::ReturnStatement { argument } => vec![("argument", Optional(argument))],
            NodeKind::ThrowStatement { argument } => vec![("argument", Single(argument))],
            NodeKind::LabeledStatement { body, .. } => vec![("body", Single(body))],
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => vec![
                ("test", Single(test)),
                ("consequent", Single(consequent)),
                ("alternate", Optional(alternate)),
            ],
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => vec![
                ("init", Optional(init)),
                ("test", Optional(test)),
                ("update", Optional(update)),
                ("body", Single(body)),
            ],
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement { left, right, body } => vec![
                ("left", Single(left)),
                ("right", Single(right)),
                ("body", Single(body)),
            ],
            NodeKind::WhileStatement { test, body } => {
                vec![("test", Single(test)), ("body", Single(body))]
            }
            NodeKind::DoWhileStatement { body, test } => {
                vec![("body", Single(body)), ("test", Single(test))]
            }
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => vec![
                ("block", Single(block)),
                ("handler", Optional(handler)),
                ("finalizer", Optional(finalizer)),
            ],
            NodeKind::CatchClause { param, body } => {
                vec![("param", Optional(param)), ("body", Single(body))]
            }
            NodeKind::VariableDeclaration { declarations, .. } => {
                vec![("declarations", List(declarations))]
            }
            NodeKind::VariableDeclarator { id, init } => {
                vec![("id", Single(id)), ("init", Optional(init))]
            }
            NodeKind::FunctionDeclaration {
                id, params, body, ..
            }
            | NodeKind::FunctionExpression {
                id, params, body, ..
            } => vec![
                ("id", Optional(id)),
                ("params", List(params)),
                ("body", Single(body)),
            ],
            NodeKind::ArrowFunctionExpression { params, body, .. } => {
                vec![("params", List(params)), ("body", Single(body))]
            }
            NodeKind::ArrayExpression { elements } => vec![("elements", List(elements))],
            NodeKind::ObjectExpression { properties } => {
                vec![("properties", List(properties))]
            }
            NodeKind::Property { key, value, .. } => {
                vec![("key", Single(key)), ("value", Single(value))]
            }
            NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => {
                vec![("argument", Single(argument))]
            }
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. } => {
                vec![("left", Single(left)), ("right", Single(right))]
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => vec![
                ("test", Single(test)),
                ("consequent", Single(consequent)),
                ("alternate", Single(alternate)),
            ],
            NodeKind::CallExpression { callee, arguments }
            | NodeKind::NewExpression { callee, arguments } => {
                vec![("callee", Single(callee)), ("arguments", List(arguments))]
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => vec![("object", Single(object)), ("property", Single(property))],
            NodeKind::SequenceExpression { expressions } => {
                vec![("expressions", List(expressions))]
            }
        }
    }
}

impl Node {
    /// Create a node with a fresh identity and no comments or bookkeeping
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: next_node_id(),
            kind,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
            span: None,
            extra: NodeExtra::default(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn is_statement(&self) -> bool {
        self.node_type().is_statement()
    }

    pub fn is_expression(&self) -> bool {
        self.node_type().is_expression()
    }

    pub fn is_program(&self) -> bool {
        self.node_type() == NodeType::Program
    }

    pub fn is_function(&self) -> bool {
        self.node_type().is_function()
    }

    /// Name of an identifier node
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn slot(&self, key: &str) -> Option<Slot<'_>> {
        self.kind
            .slots()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, slot)| slot)
    }

    pub fn slot_mut(&mut self, key: &str) -> Option<SlotMut<'_>> {
        self.kind
            .slots_mut()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, slot)| slot)
    }

    /// Child at `key` (and `index` for list fields)
    pub fn child(&self, key: &str, index: Option<usize>) -> Option<&Node> {
        match (self.slot(key)?, index) {
            (Slot::Single(node), None) => Some(node),
            (Slot::Optional(node), None) => node,
            (Slot::List(nodes), Some(i)) => nodes.get(i),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, key: &str, index: Option<usize>) -> Option<&mut Node> {
        match (self.slot_mut(key)?, index) {
            (SlotMut::Single(node), None) => Some(&mut **node),
            (SlotMut::Optional(node), None) => node.as_deref_mut(),
            (SlotMut::List(nodes), Some(i)) => nodes.get_mut(i),
            _ => None,
        }
    }

    /// What the list field `key` holds, if it is a list
    pub fn list_kind(&self, key: &str) -> Option<ListKind> {
        match (self.node_type(), key) {
            (NodeType::Program | NodeType::BlockStatement, "body") => Some(ListKind::Statements),
            (NodeType::VariableDeclaration, "declarations") => Some(ListKind::Declarators),
            (NodeType::ObjectExpression, "properties") => Some(ListKind::Properties),
            (t, "params") if t.is_function() => Some(ListKind::Params),
            (NodeType::ArrayExpression, "elements")
            | (NodeType::CallExpression | NodeType::NewExpression, "arguments")
            | (NodeType::SequenceExpression, "expressions") => Some(ListKind::Expressions),
            _ => None,
        }
    }

    /// Syntactic role of the single-child field `key`
    pub fn slot_role(&self, key: &str) -> SlotRole {
        match (self.node_type(), key) {
            (NodeType::IfStatement, "consequent" | "alternate")
            | (NodeType::LabeledStatement, "body") => SlotRole::Statement,
            (t, "body") if t.is_loop() => SlotRole::Statement,
            (NodeType::ArrowFunctionExpression, "body") => match &self.kind {
                NodeKind::ArrowFunctionExpression { body, .. }
                    if body.node_type() == NodeType::BlockStatement =>
                {
                    SlotRole::Other
                }
                _ => SlotRole::Expression,
            },
            (NodeType::ForStatement, "init") | (NodeType::ForInStatement | NodeType::ForOfStatement, "left") => {
                SlotRole::Other
            }
            (NodeType::MemberExpression, "property") => match &self.kind {
                NodeKind::MemberExpression { computed: true, .. } => SlotRole::Expression,
                _ => SlotRole::Other,
            },
            (NodeType::Property, "key") => match &self.kind {
                NodeKind::Property { computed: true, .. } => SlotRole::Expression,
                _ => SlotRole::Other,
            },
            (
                NodeType::ExpressionStatement
                | NodeType::ReturnStatement
                | NodeType::ThrowStatement
                | NodeType::IfStatement
                | NodeType::ForStatement
                | NodeType::ForInStatement
                | NodeType::ForOfStatement
                | NodeType::WhileStatement
                | NodeType::DoWhileStatement
                | NodeType::VariableDeclarator
                | NodeType::Property
                | NodeType::UnaryExpression
                | NodeType::UpdateExpression
                | NodeType::BinaryExpression
                | NodeType::LogicalExpression
                | NodeType::AssignmentExpression
                | NodeType::ConditionalExpression
                | NodeType::CallExpression
                | NodeType::NewExpression
                | NodeType::MemberExpression,
                "expression" | "argument" | "test" | "update" | "right" | "left" | "init"
                | "consequent" | "alternate" | "callee" | "object" | "value",
            ) => SlotRole::Expression,
            _ => SlotRole::Other,
        }
    }

    /// Call `f` on every direct child
    pub fn for_each_child<'a>(&'a self, mut f: impl FnMut(&'a Node)) {
        for (_, slot) in self.kind.slots() {
            match slot {
                Slot::Single(node) => f(node),
                Slot::Optional(Some(node)) => f(node),
                Slot::Optional(None) => {}
                Slot::List(nodes) => nodes.iter().for_each(&mut f),
            }
        }
    }

    /// Call `f` on every direct child, mutably
    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut Node)) {
        for (_, slot) in self.kind.slots_mut() {
            match slot {
                SlotMut::Single(node) => f(node),
                SlotMut::Optional(Some(node)) => f(node),
                SlotMut::Optional(None) => {}
                SlotMut::List(nodes) => nodes.iter_mut().for_each(&mut f),
            }
        }
    }

    /// Pre-order walk; returning `false` from `f` skips the node's children
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node) -> bool) {
        if f(self) {
            self.for_each_child(|child| child.walk(f));
        }
    }

    /// Whether `id` names this node or one of its descendants
    pub fn contains(&self, id: NodeId) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            if node.id == id {
                found = true;
            }
            !found
        });
        found
    }

    /// The node with identity `id` in this subtree
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.kind
            .slots()
            .into_iter()
            .find_map(|(_, slot)| match slot {
                Slot::Single(child) => child.find(id),
                Slot::Optional(child) => child.and_then(|c| c.find(id)),
                Slot::List(nodes) => nodes.iter().find_map(|c| c.find(id)),
            })
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.kind
            .slots_mut()
            .into_iter()
            .find_map(|(_, slot)| match slot {
                SlotMut::Single(child) => child.find_mut(id),
                SlotMut::Optional(child) => child.as_deref_mut().and_then(|c| c.find_mut(id)),
                SlotMut::List(nodes) => nodes.iter_mut().find_map(|c| c.find_mut(id)),
            })
    }

    /// Give this subtree fresh identities
    pub fn renumber(&mut self) {
        self.id = next_node_id();
        self.for_each_child_mut(|child| child.renumber());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    #[test]
    fn test_slots_follow_field_order() {
        let node = if_statement(
            identifier("a"),
            expression_statement(identifier("b")),
            None,
        );
        let keys: Vec<&str> = node.kind.slots().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["test", "consequent", "alternate"]);
        assert!(matches!(node.slot("alternate"), Some(Slot::Optional(None))));
        assert!(node.slot("body").is_none());
    }

    #[test]
    fn test_structural_equality_ignores_identity() {
        let a = identifier("x");
        let mut b = identifier("x");
        b.extra.parenthesized = true;
        assert_ne!(a.id, b.id);
        assert_eq!(a, b);
        assert_ne!(a, identifier("y"));
    }

    #[test]
    fn test_categories() {
        assert!(NodeType::WhileStatement.is(Category::Loop));
        assert!(NodeType::ArrowFunctionExpression.is(Category::Function));
        assert!(NodeType::ArrowFunctionExpression.is_expression());
        assert!(!NodeType::CatchClause.is_statement());
        assert!(!NodeType::CatchClause.is_expression());
        assert!(NodeType::CatchClause.is(Category::Scopable));
        assert_eq!(NodeType::ALL.len(), 42);
    }

    #[test]
    fn test_renumber_issues_fresh_ids() {
        let mut node = call_expression(identifier("f"), vec![identifier("x")]);
        let before = node.id;
        node.renumber();
        assert_ne!(before, node.id);
        assert!(node.contains(node.id));
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let node = expression_statement(identifier("x"));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "ExpressionStatement");
        assert_eq!(json["expression"]["name"], "x");
    }
}
