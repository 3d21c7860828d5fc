use jsrewrite_rs::ast::builders::*;
use jsrewrite_rs::ast::Category;
use jsrewrite_rs::{traverse, Ast, NodePath, NodeType, Result, Visitor};

fn double_numbers(path: &mut NodePath, ast: &mut Ast, count: &mut usize) -> Result<()> {
    let value = match path.node(ast).map(|node| &node.kind) {
        Some(jsrewrite_rs::NodeKind::NumericLiteral { value }) => *value,
        _ => return Ok(()),
    };
    *count += 1;
    path.replace_with(ast, numeric_literal(value * 2.0))
}

fn debugger_to_source(path: &mut NodePath, ast: &mut Ast, _count: &mut usize) -> Result<()> {
    path.replace_with_source_string(ast, "log(\"here\")")
}

fn skip_functions(path: &mut NodePath, _ast: &mut Ast, _count: &mut usize) -> Result<()> {
    path.skip();
    Ok(())
}

#[test]
fn test_visitor_replaces_every_match() {
    let mut ast = Ast::parse("f(1, 2); x = 3;").unwrap();
    let visitor = Visitor::new().on(NodeType::NumericLiteral, double_numbers);
    let mut count = 0;
    let root = ast.root();
    traverse(&mut ast, &root, &visitor, &mut count).unwrap();
    assert_eq!(count, 3);
    assert_eq!(ast.print().unwrap(), "f(2, 4);\nx = 6;\n");
}

#[test]
fn test_skipped_functions_are_left_alone() {
    let mut ast = Ast::parse("a = 1; (function () { return 2; });").unwrap();
    let visitor = Visitor::new()
        .on(NodeType::NumericLiteral, double_numbers)
        .on_category(Category::Function, skip_functions);
    let mut count = 0;
    let root = ast.root();
    root.traverse(&mut ast, &visitor, &mut count).unwrap();
    assert_eq!(count, 1);
    let printed = ast.print().unwrap();
    assert!(printed.starts_with("a = 2;"));
    assert!(printed.contains("return 2;"));
}

#[test]
fn test_statement_handler_with_source_string() {
    let mut ast = Ast::parse("a; debugger; b;").unwrap();
    let visitor = Visitor::new().on(NodeType::DebuggerStatement, debugger_to_source);
    let mut count = 0;
    let root = ast.root();
    traverse(&mut ast, &root, &visitor, &mut count).unwrap();
    assert_eq!(ast.print().unwrap(), "a;\nlog(\"here\");\nb;\n");
}

#[test]
fn test_traverse_from_inner_path() {
    let mut ast = Ast::parse("f(1); g(2);").unwrap();
    let visitor = Visitor::new().on(NodeType::NumericLiteral, double_numbers);
    let mut count = 0;
    let second = ast.path("body.1").unwrap();
    traverse(&mut ast, &second, &visitor, &mut count).unwrap();
    assert_eq!(count, 1);
    assert_eq!(ast.print().unwrap(), "f(1);\ng(4);\n");
}

#[test]
fn test_empty_visitor() {
    let visitor: Visitor<usize> = Visitor::new();
    assert!(visitor.is_empty());
    assert!(visitor.handlers(NodeType::Identifier).is_empty());
}
