use commentdoc_engine::{CommentConfig, assemble_all, link_all};
use criterion::{Criterion, criterion_group, criterion_main};
mod common;

fn bench_linking(c: &mut Criterion) {
    let mut group = c.benchmark_group("linking");
    group.sample_size(10);

    let inputs = common::generate_inputs(20, 100);
    let config = CommentConfig::default();
    let trees: Vec<_> = assemble_all(&inputs, &config)
        .into_iter()
        .map(|(tree, _)| tree)
        .collect();

    group.bench_function("assemble_all", |b| {
        b.iter(|| {
            let assembled = assemble_all(std::hint::black_box(&inputs), &config);
            std::hint::black_box(assembled);
        });
    });

    group.bench_function("register_and_resolve", |b| {
        b.iter(|| {
            let mut trees = trees.clone();
            let report = link_all(std::hint::black_box(&mut trees));
            std::hint::black_box(report);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_linking);
criterion_main!(benches);
