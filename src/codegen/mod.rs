//! Printing [`Node`] trees as JavaScript source
//!
//! The tree is raised into an oxc arena AST and printed by `oxc_codegen`.
//! Comments go through a synthetic source text (see `comment_layout`).

mod comment_layout;
mod raise;

use oxc_allocator::Allocator;
use oxc_ast::ast::SourceType;
use oxc_ast::AstBuilder;
use oxc_codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc_span::Span;

use crate::ast::{Node, NodeKind};
use crate::error::{Error, Result};

/// Print a `Program`, a statement or an expression
pub fn generate(node: &Node) -> Result<String> {
    let allocator = Allocator::default();
    let ast = AstBuilder::new(&allocator);
    let mut raiser = raise::Raiser::new(ast);

    let body = match &node.kind {
        NodeKind::Program { body } => raiser.statements(body)?,
        _ if node.is_statement() => raiser.statements(std::slice::from_ref(node))?,
        _ if node.is_expression() => {
            let expression = raiser.expression(node)?;
            let mut body = ast.vec();
            body.push(ast.statement_expression(oxc_span::SPAN, expression));
            body
        }
        _ => {
            return Err(Error::Codegen {
                message: format!("{} cannot be printed on its own", node.node_type()),
            })
        }
    };

    let (source, comments) = raiser.into_layout().finish();
    let source_text: &str = allocator.alloc_str(&source);
    let mut comment_vec = ast.vec_with_capacity(comments.len());
    for comment in comments {
        comment_vec.push(comment);
    }

    let program = ast.program(
        Span::new(0, source.len() as u32),
        SourceType::default().with_script(true),
        source_text,
        comment_vec,
        None,
        ast.vec(),
        body,
    );

    let code = Codegen::new()
        .with_source_text(source_text)
        .with_options(CodegenOptions {
            comments: CommentOptions::default(),
            ..Default::default()
        })
        .build(&program)
        .code;
    log::trace!("generated {} bytes", code.len());
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Comment;
    use crate::parser::parse;

    fn roundtrip(source: &str) -> String {
        generate(&parse(source).unwrap()).unwrap()
    }

    #[test]
    fn test_prints_statements_one_per_line() {
        assert_eq!(roundtrip("a; b;"), "a;\nb;\n");
    }

    #[test]
    fn test_prints_built_expression() {
        let node = call_expression(identifier("f"), vec![numeric_literal(1.0)]);
        assert_eq!(generate(&node).unwrap(), "f(1);\n");
    }

    #[test]
    fn test_iife_is_parenthesized() {
        let call = call_expression(
            function_expression(None, vec![], block_statement(vec![])),
            vec![],
        );
        let printed = generate(&program(vec![expression_statement(call)])).unwrap();
        assert!(printed.starts_with("(function"));
    }

    #[test]
    fn test_sequence_argument_is_parenthesized() {
        let node = call_expression(
            identifier("f"),
            vec![sequence_expression(vec![identifier("a"), identifier("b")])],
        );
        assert_eq!(generate(&node).unwrap(), "f((a, b));\n");
    }

    #[test]
    fn test_negative_number() {
        let node = expression_statement(numeric_literal(-2.0));
        assert_eq!(generate(&node).unwrap(), "-2;\n");
    }

    #[test]
    fn test_leading_comment_is_printed() {
        let mut statement = expression_statement(identifier("a"));
        statement.leading_comments.push(Comment::line(" note"));
        let printed = generate(&program(vec![statement])).unwrap();
        assert!(printed.contains("// note"));
        assert!(printed.contains("a;"));
    }

    #[test]
    fn test_function_declaration_keeps_var() {
        let printed = roundtrip("function f(a) { var b = a; return b; }");
        assert!(printed.contains("function f(a)"));
        assert!(printed.contains("var b = a;"));
        assert!(printed.contains("return b;"));
    }

    #[test]
    fn test_program_node_required_for_bare_declarator() {
        let declarator = variable_declarator(identifier("a"), None);
        assert!(matches!(generate(&declarator), Err(Error::Codegen { .. })));
    }
}
