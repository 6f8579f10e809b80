use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vizij_test_fixtures::animators;

fn advanced_build(c: &mut Criterion) {
    let builder = animators::advanced(8).expect("advanced fixture");
    c.bench_function("advanced_build", |b| {
        b.iter(|| black_box(builder.clone().build().expect("valid graph")))
    });
}

fn wide_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_build");
    for states in [4usize, 16, 64] {
        let builder = animators::wide(4, 8, states).expect("wide fixture");
        group.bench_with_input(BenchmarkId::from_parameter(states), &builder, |b, builder| {
            b.iter(|| black_box(builder.clone().build().expect("valid graph")))
        });
    }
    group.finish();
}

fn ir_serialize(c: &mut Criterion) {
    let graph = animators::advanced(8)
        .and_then(|b| Ok(b.build()?))
        .expect("advanced graph");
    c.bench_function("ir_to_json", |b| {
        b.iter(|| black_box(graph.to_json_pretty().expect("serializable")))
    });
}

criterion_group!(benches, advanced_build, wide_build, ir_serialize);
criterion_main!(benches);
