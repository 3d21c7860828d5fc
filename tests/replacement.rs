use jsrewrite_rs::ast::builders::*;
use jsrewrite_rs::{Ast, Error, Node, NodeKind, NodeType};

fn statements(source: &str) -> Vec<Node> {
    match jsrewrite_rs::parser::parse(source).unwrap().kind {
        NodeKind::Program { body } => body,
        other => panic!("expected a program, got {:?}", other),
    }
}

#[test]
fn test_replace_statement_with_expression_wraps_it() {
    let mut ast = Ast::parse("a;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    path.replace_with(&mut ast, identifier("x")).unwrap();
    assert_eq!(ast.print().unwrap(), "x;\n");
    assert_eq!(path.node_type(), Some(NodeType::ExpressionStatement));
}

#[test]
fn test_replace_expression_in_place() {
    let mut ast = Ast::parse("foo(a);").unwrap();
    let mut path = ast.path("body.0.expression.arguments.0").unwrap();
    path.replace_with(&mut ast, numeric_literal(1.0)).unwrap();
    assert_eq!(ast.print().unwrap(), "foo(1);\n");
}

#[test]
fn test_replace_with_nothing_is_rejected() {
    let mut ast = Ast::parse("a;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    let result = path.replace_with(&mut ast, None::<Node>);
    assert!(matches!(result, Err(Error::InvalidOperation { .. })));
    assert_eq!(ast.print().unwrap(), "a;\n");
}

#[test]
fn test_list_requires_multi_form_opt_in() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    let nodes = vec![
        expression_statement(identifier("x")),
        expression_statement(identifier("y")),
    ];

    let result = path.replace_with(&mut ast, nodes.clone());
    assert!(matches!(result, Err(Error::InvalidOperation { .. })));
    assert_eq!(ast.print().unwrap(), "a;\nb;\n");

    path.replace_with_opts(&mut ast, nodes, true).unwrap();
    assert_eq!(ast.print().unwrap(), "x;\ny;\nb;\n");
}

#[test]
fn test_source_text_requires_multi_form_opt_in() {
    let mut ast = Ast::parse("a;").unwrap();
    let mut path = ast.path("body.0.expression").unwrap();
    assert!(matches!(
        path.replace_with(&mut ast, "b"),
        Err(Error::InvalidOperation { .. })
    ));
    path.replace_with_opts(&mut ast, "b", true).unwrap();
    assert_eq!(ast.print().unwrap(), "b;\n");
}

#[test]
fn test_program_replacement_is_unwrapped() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.1").unwrap();
    let replacement = program(vec![
        expression_statement(identifier("x")),
        expression_statement(identifier("y")),
    ]);
    path.replace_with(&mut ast, replacement).unwrap();
    assert_eq!(ast.print().unwrap(), "a;\nx;\ny;\n");
}

#[test]
fn test_replace_removed_path_fails() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    path.remove(&mut ast).unwrap();
    assert!(path.is_removed());
    assert!(matches!(
        path.replace_with(&mut ast, identifier("x")),
        Err(Error::InvalidOperation { .. })
    ));
    assert_eq!(ast.print().unwrap(), "b;\n");
}

#[test]
fn test_block_scoped_redeclaration_is_rejected() {
    let mut ast = Ast::parse("let a; b;").unwrap();
    let mut path = ast.path("body.1").unwrap();
    let replacement = statements("let a;").remove(0);
    let result = path.replace_with(&mut ast, replacement);
    assert_eq!(
        result,
        Err(Error::DuplicateDeclaration {
            name: "a".to_string()
        })
    );
    assert_eq!(ast.print().unwrap(), "let a;\nb;\n");
}

#[test]
fn test_replacing_declaration_with_itself_is_allowed() {
    let mut ast = Ast::parse("let a = 1;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    let same = path.node(&ast).unwrap().clone();
    path.replace_with(&mut ast, same).unwrap();
    assert_eq!(ast.print().unwrap(), "let a = 1;\n");
}

#[test]
fn test_edited_copy_of_current_node_is_written() {
    let mut ast = Ast::parse("f(x);").unwrap();
    let mut path = ast.path("body.0.expression.arguments.0").unwrap();
    let mut edited = path.node(&ast).unwrap().clone();
    if let NodeKind::Identifier { name } = &mut edited.kind {
        *name = "z".to_string();
    }
    path.replace_with(&mut ast, edited.clone()).unwrap();
    assert_eq!(path.node(&ast), Some(&edited));
    assert_eq!(ast.print().unwrap(), "f(z);\n");
}

#[test]
fn test_copies_of_one_node_can_be_inserted_together() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.1").unwrap();
    let copy = path.node(&ast).unwrap().clone();
    path.replace_with_multiple(&mut ast, vec![copy.clone(), copy])
        .unwrap();
    assert_eq!(ast.print().unwrap(), "a;\nb;\nb;\n");

    let mut second = ast.path("body.2").unwrap();
    second
        .replace_with(&mut ast, expression_statement(identifier("c")))
        .unwrap();
    assert_eq!(ast.print().unwrap(), "a;\nb;\nc;\n");
}

#[test]
fn test_replacement_inherits_comments() {
    let mut ast = Ast::parse("// keep\na;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    path.replace_with(&mut ast, expression_statement(identifier("x")))
        .unwrap();
    let printed = ast.print().unwrap();
    assert!(printed.contains("// keep"));
    assert!(printed.contains("x;"));
    assert!(!printed.contains("a;"));
}

#[test]
fn test_replace_with_multiple_splices_into_list() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    path.replace_with_multiple(
        &mut ast,
        vec![
            expression_statement(identifier("x")),
            expression_statement(identifier("y")),
        ],
    )
    .unwrap();
    assert_eq!(ast.print().unwrap(), "x;\ny;\nb;\n");
    assert!(path.is_removed());
}

#[test]
fn test_replace_with_multiple_wraps_bare_expressions() {
    let mut ast = Ast::parse("a;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    path.replace_with_multiple(&mut ast, vec![identifier("x"), identifier("y")])
        .unwrap();
    assert_eq!(ast.print().unwrap(), "x;\ny;\n");
}

#[test]
fn test_replace_with_multiple_in_statement_slot_makes_block() {
    let mut ast = Ast::parse("if (c) a;").unwrap();
    let mut path = ast.path("body.0.consequent").unwrap();
    path.replace_with_multiple(
        &mut ast,
        vec![
            expression_statement(identifier("x")),
            expression_statement(identifier("y")),
        ],
    )
    .unwrap();
    let printed = ast.print().unwrap();
    assert!(printed.starts_with("if (c) {"));
    assert!(printed.contains("x;"));
    assert!(printed.contains("y;"));
}

#[test]
fn test_replace_with_multiple_on_statement_expression_replaces_statement() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.0.expression").unwrap();
    path.replace_with_multiple(
        &mut ast,
        vec![
            expression_statement(identifier("x")),
            expression_statement(identifier("y")),
        ],
    )
    .unwrap();
    assert_eq!(ast.print().unwrap(), "x;\ny;\nb;\n");
    assert!(path.is_removed());
}

#[test]
fn test_replace_with_multiple_verifies_nodes() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    let result = path.replace_with_multiple(
        &mut ast,
        vec![
            expression_statement(identifier("x")),
            variable_declarator(identifier("y"), None),
        ],
    );
    assert!(matches!(
        result,
        Err(Error::Verification { index: Some(1), .. })
    ));
    assert_eq!(ast.print().unwrap(), "a;\nb;\n");
}

#[test]
fn test_replace_inline_splices_list() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    path.replace_inline(
        &mut ast,
        vec![
            expression_statement(identifier("x")),
            expression_statement(identifier("y")),
        ],
    )
    .unwrap();
    assert_eq!(ast.print().unwrap(), "x;\ny;\nb;\n");
}

#[test]
fn test_replace_inline_single_node() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.1.expression").unwrap();
    path.replace_inline(&mut ast, identifier("z")).unwrap();
    assert_eq!(ast.print().unwrap(), "a;\nz;\n");
}
