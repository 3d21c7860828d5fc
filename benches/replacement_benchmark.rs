use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsrewrite_rs::{Ast, Node, NodeKind};

const SOURCE: &str = "function f(a, b) { var c = a + b; if (c > 10) { return c; } return g(c); } x = f(1, 2);";

fn statements(source: &str) -> Vec<Node> {
    match jsrewrite_rs::parser::parse(source) {
        Ok(Node {
            kind: NodeKind::Program { body },
            ..
        }) => body,
        _ => Vec::new(),
    }
}

fn replacement_benchmark(c: &mut Criterion) {
    c.bench_function("parse_and_print", |b| {
        b.iter(|| {
            let ast = Ast::parse(black_box(SOURCE)).unwrap();
            black_box(ast.print().unwrap());
        });
    });

    c.bench_function("replace_with_source_string", |b| {
        b.iter(|| {
            let mut ast = Ast::parse(SOURCE).unwrap();
            let mut path = ast.path("body.1.expression.right").unwrap();
            path.replace_with_source_string(&mut ast, black_box("h(1) + 2"))
                .unwrap();
            black_box(ast.print().unwrap());
        });
    });

    let body = statements("var t = 0; for (var i = 0; i < n; i++) { t += i; } t;");
    c.bench_function("replace_expression_with_statements", |b| {
        b.iter(|| {
            let mut ast = Ast::parse(SOURCE).unwrap();
            let mut path = ast.path("body.1.expression.right").unwrap();
            path.replace_expression_with_statements(&mut ast, black_box(body.clone()))
                .unwrap();
            black_box(ast.print().unwrap());
        });
    });
}

criterion_group!(benches, replacement_benchmark);
criterion_main!(benches);
