use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use sprig_parser::lexer::scan;
use sprig_parser::parser::Parser;

fn program(source: &str) {
    let (tokens, errors) = scan(source);
    assert!(errors.is_empty());
    let _ast = Parser::new(tokens).parse_program().unwrap();
}

fn long_expr(c: &mut Criterion) {
    let mut group = c.benchmark_group("long-expr");

    let mut source = "print 1".to_string();
    for _i in 0..1000 {
        source.push_str(" + 1");
    }
    source.push(';');
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long-expr", |b| b.iter(|| program(&source)));
}

fn stress_precedence(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress-precedence");

    let mut source = "print 1".to_string();
    for _i in 0..200 {
        source.push_str(" == 2 < 3 + 5 * 5 or !false");
    }
    source.push(';');
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("stress-precedence", |b| b.iter(|| program(&source)));
}

fn many_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("many-functions");

    let mut source = String::new();
    for i in 0..200 {
        source.push_str(&format!(
            "function f{i}(a, b) {{ let c = a * b; if (c > {i}) return c; else return f{i}(b, a - 1); }}\n",
            i = i
        ));
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("many-functions", |b| b.iter(|| program(&source)));
}

criterion_group!(benches, long_expr, stress_precedence, many_functions);
criterion_main!(benches);
