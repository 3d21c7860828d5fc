use jsrewrite_rs::{Ast, Error, NodeType};

#[test]
fn test_replace_argument_with_source() {
    let mut ast = Ast::parse("foo(a);").unwrap();
    let mut path = ast.path("body.0.expression.arguments.0").unwrap();
    path.replace_with_source_string(&mut ast, "b + c").unwrap();
    assert_eq!(ast.print().unwrap(), "foo(b + c);\n");
    assert_eq!(path.node_type(), Some(NodeType::BinaryExpression));
}

#[test]
fn test_source_in_statement_position_becomes_statement() {
    let mut ast = Ast::parse("a; b;").unwrap();
    let mut path = ast.path("body.1").unwrap();
    path.replace_with_source_string(&mut ast, "g(1)").unwrap();
    assert_eq!(ast.print().unwrap(), "a;\ng(1);\n");
}

#[test]
fn test_object_literal_source_is_an_expression() {
    let mut ast = Ast::parse("x = y;").unwrap();
    let mut path = ast.path("body.0.expression.right").unwrap();
    path.replace_with_source_string(&mut ast, "{ a: 1 }").unwrap();
    assert_eq!(path.node_type(), Some(NodeType::ObjectExpression));
    assert!(ast.print().unwrap().starts_with("x = {"));
}

#[test]
fn test_parenthesized_flag_is_not_carried_over() {
    let mut ast = Ast::parse("x = y;").unwrap();
    let mut path = ast.path("body.0.expression.right").unwrap();
    path.replace_with_source_string(&mut ast, "z").unwrap();
    let node = path.node(&ast).unwrap();
    assert!(!node.extra.parenthesized);
    assert_eq!(node.identifier_name(), Some("z"));
}

#[test]
fn test_invalid_source_reports_code_frame() {
    let mut ast = Ast::parse("foo(a);").unwrap();
    let mut path = ast.path("body.0.expression.arguments.0").unwrap();
    let err = path.replace_with_source_string(&mut ast, "a +").unwrap_err();
    match err {
        Error::Parse { message, line, .. } => {
            assert!(message.contains("make sure this is an expression"));
            assert!(message.contains("(a +)"));
            assert_eq!(line, 1);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
    assert_eq!(ast.print().unwrap(), "foo(a);\n");
}

#[test]
fn test_statement_source_is_rejected() {
    let mut ast = Ast::parse("foo(a);").unwrap();
    let mut path = ast.path("body.0.expression.arguments.0").unwrap();
    assert!(path.replace_with_source_string(&mut ast, "var x = 1").is_err());
    assert_eq!(ast.print().unwrap(), "foo(a);\n");
}
