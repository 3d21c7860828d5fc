//! jsrewrite-rs: node replacement for JavaScript syntax trees
//!
//! This library parses JavaScript into an owned syntax tree, lets callers walk
//! it through [`NodePath`]s, and replaces nodes in place while keeping the
//! tree well-formed: expressions and statements are converted at the
//! boundary, `var` declarations are hoisted out of synthesized wrappers, and
//! scope bindings follow every edit.

pub mod ast;
pub mod cli;
pub mod codegen;
pub mod error;
pub mod parser;
pub mod scope;
pub mod serde_helpers;
pub mod traverse;

pub use ast::{Ast, Node, NodeKind, NodeType};
pub use error::{Error, Result};

// Re-export commonly used types
pub use scope::{Binding, BindingKind, ScopeTree};
pub use traverse::{traverse, NodePath, Replacement, Visitor};
