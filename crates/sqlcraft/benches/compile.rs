use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlcraft::prelude::*;

/// A query with `n` projected columns and `n` equality filters:
/// SELECT col0, col1, ... FROM t WHERE col0 = ? AND col1 = ? ...
fn build_select(n: usize) -> Query {
    let columns: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let mut q = Query::table("t").select(columns);
    for i in 0..n {
        q = q.eq(&format!("col{i}"), i as i64);
    }
    q
}

fn bench_compile_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/select");
    let compiler = Compiler::new(&Postgres);

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(compiler.select(q)));
        });
    }

    group.finish();
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/build_and_compile");
    let compiler = Compiler::new(&Postgres);

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let q = build_select(n);
                black_box(compiler.select(&q))
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/in_list");
    let compiler = Compiler::new(&MySql);

    for n in [5, 20, 100, 500] {
        let q = Query::table("t").in_list("id", 0..n as i64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(compiler.select(q)));
        });
    }

    group.finish();
}

fn bench_dialects(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/dialect");
    let q = build_select(10).order_by_desc("col0").limit(10).offset(20);

    for dialect in sqlcraft::dialect::all() {
        let compiler = Compiler::new(dialect);
        group.bench_with_input(BenchmarkId::from_parameter(dialect.name()), &q, |b, q| {
            b.iter(|| black_box(compiler.select(q)));
        });
    }

    group.finish();
}

fn bench_numbered_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/numbered_sql");
    let compiler = Compiler::new(&Postgres);

    for n in [1, 10, 100] {
        let compiled = compiler.select(&build_select(n)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &compiled, |b, compiled| {
            b.iter(|| black_box(compiled.to_numbered_sql()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compile_select,
    bench_build_and_compile,
    bench_in_list,
    bench_dialects,
    bench_numbered_sql
);
criterion_main!(benches);
