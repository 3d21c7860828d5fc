use jsrewrite_rs::ast::builders::*;
use jsrewrite_rs::{Ast, BindingKind, Error};

#[test]
fn test_program_bindings_are_collected() {
    let mut ast = Ast::parse("var a; let b; const c = 1; function d(e) { var f; }").unwrap();
    let root = ast.root().scope();
    let kind = |name: &str| ast.scopes.get_binding(root, name).map(|b| b.kind);
    assert_eq!(kind("a"), Some(BindingKind::Var));
    assert_eq!(kind("b"), Some(BindingKind::Let));
    assert_eq!(kind("c"), Some(BindingKind::Const));
    assert_eq!(kind("d"), Some(BindingKind::Hoisted));
    assert_eq!(kind("e"), None);
    assert_eq!(kind("f"), None);
}

#[test]
fn test_function_scope_sees_params_and_outer_names() {
    let mut ast = Ast::parse("var outer; function d(e) { var f; g; }").unwrap();
    let path = ast.path("body.1.body.body.1").unwrap();
    let scope = path.scope();
    assert_eq!(
        ast.scopes.get_binding(scope, "e").map(|b| b.kind),
        Some(BindingKind::Param)
    );
    assert!(ast.scopes.has_own_binding(scope, "f"));
    assert!(ast.scopes.has_binding(scope, "outer"));
    assert!(!ast.scopes.has_own_binding(scope, "outer"));
}

#[test]
fn test_generate_uid_skips_names_in_use() {
    let mut ast = Ast::parse("_temp; _temp2;").unwrap();
    let root = ast.root().scope();
    let uid = ast.scopes.generate_uid(root, &ast.program, "temp");
    assert_eq!(uid, "_temp3");
    let next = ast.scopes.generate_uid(root, &ast.program, "temp");
    assert_eq!(next, "_temp4");
}

#[test]
fn test_generate_uid_sanitizes_base() {
    let mut ast = Ast::parse("a;").unwrap();
    let root = ast.root().scope();
    assert_eq!(ast.scopes.generate_uid(root, &ast.program, "__ref12"), "_ref");
}

#[test]
fn test_replacement_updates_bindings() {
    let mut ast = Ast::parse("let a; b;").unwrap();
    let mut path = ast.path("body.0").unwrap();
    path.replace_with(&mut ast, expression_statement(identifier("x")))
        .unwrap();
    let root = ast.root().scope();
    assert!(ast.scopes.get_binding(root, "a").is_none());

    let mut path = ast.path("body.1").unwrap();
    let declaration = jsrewrite_rs::parser::parse("let a = 2;").unwrap();
    path.replace_with(&mut ast, declaration).unwrap();
    assert_eq!(
        ast.scopes.get_binding(root, "a").map(|b| b.kind),
        Some(BindingKind::Let)
    );
    assert_eq!(ast.print().unwrap(), "x;\nlet a = 2;\n");
}

#[test]
fn test_declared_uid_is_pushed_to_top() {
    let mut ast = Ast::parse("a;").unwrap();
    let root = ast.root().scope();
    let uid = ast
        .scopes
        .generate_declared_uid(root, &mut ast.program, "ref")
        .unwrap();
    assert_eq!(uid.identifier_name(), Some("_ref"));
    assert_eq!(ast.print().unwrap(), "var _ref;\na;\n");
    assert_eq!(
        ast.scopes.get_binding(root, "_ref").map(|b| b.kind),
        Some(BindingKind::Generated)
    );
}

#[test]
fn test_let_then_var_conflict() {
    let mut ast = Ast::parse("let a; b;").unwrap();
    let root = ast.root().scope();
    let result = ast.scopes.check_binding(root, "a", BindingKind::Var, None);
    assert!(matches!(result, Err(Error::DuplicateDeclaration { .. })));
    assert!(ast
        .scopes
        .check_binding(root, "b", BindingKind::Let, None)
        .is_ok());
}
