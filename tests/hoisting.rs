use jsrewrite_rs::{Ast, BindingKind, Error, Node, NodeKind};

fn statements(source: &str) -> Vec<Node> {
    match jsrewrite_rs::parser::parse(source).unwrap().kind {
        NodeKind::Program { body } => body,
        other => panic!("expected a program, got {:?}", other),
    }
}

#[test]
fn test_var_is_hoisted_to_program() {
    let mut ast = Ast::parse("x = y;").unwrap();
    let mut path = ast.path("body.0.expression.right").unwrap();
    path.replace_expression_with_statements(&mut ast, statements("var a = 1; a;"))
        .unwrap();

    let printed = ast.print().unwrap();
    assert!(printed.starts_with("var a;\n"));
    assert!(printed.contains("a = 1;"));
    assert!(printed.contains("return a;"));
    assert!(!printed.contains("var a = 1"));

    let root = ast.root().scope();
    assert_eq!(
        ast.scopes.get_binding(root, "a").map(|b| b.kind),
        Some(BindingKind::Var)
    );
}

#[test]
fn test_declarator_without_initializer_leaves_nothing() {
    let mut ast = Ast::parse("x = y;").unwrap();
    let mut path = ast.path("body.0.expression.right").unwrap();
    path.replace_expression_with_statements(&mut ast, statements("var a, b = 2; if (c) { b; }"))
        .unwrap();

    let printed = ast.print().unwrap();
    assert!(printed.starts_with("var a, b;\n"));
    assert!(printed.contains("b = 2;"));
    assert!(printed.contains("return b;"));
}

#[test]
fn test_var_is_hoisted_to_enclosing_function() {
    let mut ast = Ast::parse("function f() { x = y; }").unwrap();
    let mut path = ast.path("body.0.body.body.0.expression.right").unwrap();
    path.replace_expression_with_statements(&mut ast, statements("var a = 1; a;"))
        .unwrap();

    let printed = ast.print().unwrap();
    assert!(printed.starts_with("function f() {"));
    assert!(printed.contains("var a;"));
    assert!(printed.contains("return a;"));

    let root = ast.root().scope();
    assert!(ast.scopes.get_binding(root, "a").is_none());
}

#[test]
fn test_nested_function_declarations_stay_put() {
    let mut ast = Ast::parse("x = y;").unwrap();
    let mut path = ast.path("body.0.expression.right").unwrap();
    path.replace_expression_with_statements(
        &mut ast,
        statements("var g = function () { var inner = 1; return inner; }; g();"),
    )
    .unwrap();

    let printed = ast.print().unwrap();
    assert!(printed.starts_with("var g;\n"));
    assert!(printed.contains("var inner = 1;"));
    assert!(printed.contains("return g();"));
}

#[test]
fn test_for_in_declaration_becomes_identifier() {
    let mut ast = Ast::parse("x = y;").unwrap();
    let mut path = ast.path("body.0.expression.right").unwrap();
    path.replace_expression_with_statements(&mut ast, statements("for (var k in o) { k; }"))
        .unwrap();

    let printed = ast.print().unwrap();
    assert!(printed.starts_with("var k;\n"));
    assert!(printed.contains("for (k in o)"));
    assert!(!printed.contains("var k in"));
    assert!(printed.contains("_ret = k;"));
    assert!(printed.contains("return _ret;"));
}

#[test]
fn test_for_of_declaration_becomes_identifier() {
    let mut ast = Ast::parse("x = y;").unwrap();
    let mut path = ast.path("body.0.expression.right").unwrap();
    path.replace_expression_with_statements(&mut ast, statements("for (var v of list) { v; }"))
        .unwrap();

    let printed = ast.print().unwrap();
    assert!(printed.starts_with("var v;\n"));
    assert!(printed.contains("for (v of list)"));
    assert!(!printed.contains("var v of"));
    assert_eq!(path.node_type(), Some(jsrewrite_rs::NodeType::CallExpression));
}

#[test]
fn test_for_in_inside_function_hoists_to_function() {
    let mut ast = Ast::parse("function f(o) { return g(y); }").unwrap();
    let mut path = ast.path("body.0.body.body.0.argument.arguments.0").unwrap();
    path.replace_expression_with_statements(&mut ast, statements("for (var k in o) { k; }"))
        .unwrap();

    let printed = ast.print().unwrap();
    assert!(printed.starts_with("function f(o) {"));
    assert!(printed.contains("var k;"));
    assert!(printed.contains("for (k in o)"));
}

#[test]
fn test_for_init_declaration_becomes_assignment() {
    let mut ast = Ast::parse("x = y;").unwrap();
    let mut path = ast.path("body.0.expression.right").unwrap();
    path.replace_expression_with_statements(
        &mut ast,
        statements("for (var i = 0; i < n; i++) { i; }"),
    )
    .unwrap();

    let printed = ast.print().unwrap();
    assert!(printed.starts_with("var i;\n"));
    assert!(printed.contains("for (i = 0; i < n; i++)"));
}

#[test]
fn test_collision_with_let_is_rejected() {
    let mut ast = Ast::parse("let a; x = y;").unwrap();
    let mut path = ast.path("body.1.expression.right").unwrap();
    let result = path.replace_expression_with_statements(&mut ast, statements("var a = 1; a;"));
    assert_eq!(
        result,
        Err(Error::DuplicateDeclaration {
            name: "a".to_string()
        })
    );
    assert_eq!(ast.print().unwrap(), "let a;\nx = y;\n");
}

#[test]
fn test_existing_var_is_not_declared_twice() {
    let mut ast = Ast::parse("var a; x = y;").unwrap();
    let mut path = ast.path("body.1.expression.right").unwrap();
    path.replace_expression_with_statements(&mut ast, statements("var a = 1; a;"))
        .unwrap();

    let printed = ast.print().unwrap();
    assert_eq!(printed.matches("var a").count(), 1);
    assert!(printed.contains("a = 1;"));
}
