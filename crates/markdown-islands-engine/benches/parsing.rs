use criterion::{Criterion, criterion_group, criterion_main};
use markdown_islands_engine::{LineParser, RawStash, TagPolicy, run};
mod common;

fn bench_build_and_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.sample_size(10);

    let content = common::generate_island_content(100);
    let policy = TagPolicy::default();
    group.bench_function("build_and_classify", |b| {
        b.iter(|| {
            let mut stash = RawStash::new();
            let tree = run(
                std::hint::black_box(&content),
                &mut stash,
                &policy,
                &mut LineParser,
            )
            .unwrap();
            std::hint::black_box(tree);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build_and_classify);
criterion_main!(benches);
