//! Performance benchmarks for cellsmith

use cellsmith::test_utils::TestDir;
use cellsmith::{
    CallDescriptor, Operation, RewriteConfig, resolve_alias, rewrite_call, rewrite_files,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

// A typical model-loading cell
const CELL_SOURCE: &str = r#"import biolqm, ginsim as gs, pandas as pd
lrg = gs.load("model.zginml")
lqm = gs.to_biolqm(lrg)
fps = biolqm.fixpoints(lqm)
df = pd.DataFrame(fps)
m = biolqm.load("other.sbml")
"#;

fn long_cell(lines: usize) -> String {
    let mut source = String::from("import numpy as np, \\\n    ginsim as gs\n");
    for i in 0..lines {
        source.push_str(&format!("x{} = gs.load(\"m{}.zginml\")\n", i, i));
    }
    source
}

fn bench_resolve_alias(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_alias");
    let long = long_cell(500);

    group.bench_function("short_cell", |b| {
        b.iter(|| resolve_alias(black_box(CELL_SOURCE), black_box("pandas")))
    });

    group.bench_function("missing_module", |b| {
        b.iter(|| resolve_alias(black_box(CELL_SOURCE), black_box("maboss")))
    });

    group.bench_function("long_cell_500_lines", |b| {
        b.iter(|| resolve_alias(black_box(&long), black_box("ginsim")))
    });

    group.finish();
}

fn bench_rewrite_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite_call");
    let long = long_cell(500);

    group.bench_function("short_cell", |b| {
        b.iter(|| rewrite_call(black_box(CELL_SOURCE), "load", "open", &["fmt=\"auto\""], false))
    });

    group.bench_function("short_cell_commented", |b| {
        b.iter(|| rewrite_call(black_box(CELL_SOURCE), "load", "open", &["fmt=\"auto\""], true))
    });

    let rewriter = CallDescriptor::new("load", "open").compile();
    group.bench_function("long_cell_precompiled", |b| {
        b.iter(|| rewriter.rewrite(black_box(&long)))
    });

    group.finish();
}

fn bench_rewrite_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite_files");

    let dir = TestDir::new();
    let paths: Vec<_> = (0..100)
        .map(|i| dir.add_notebook(&format!("nb_{}.ipynb", i), &[CELL_SOURCE, "print(lrg)"]))
        .collect();

    let mut config = RewriteConfig::new(Operation::Call(CallDescriptor::new("load", "open")));
    group.bench_function("100_notebooks_parallel", |b| {
        b.iter(|| rewrite_files(black_box(&paths), &config))
    });

    config.parallel_workers = 1;
    group.bench_function("100_notebooks_sequential", |b| {
        b.iter(|| rewrite_files(black_box(&paths), &config))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_alias,
    bench_rewrite_call,
    bench_rewrite_files
);
criterion_main!(benches);
