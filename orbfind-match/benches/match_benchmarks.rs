use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orbfind_core::Descriptor;
use orbfind_match::{match_descriptors, match_mutual, select_top};

/// Deterministic pseudo-random 256-bit descriptors
fn create_descriptors(count: usize, seed: u64) -> Vec<Descriptor> {
    let mut state = seed | 1;
    (0..count)
        .map(|_| {
            let bytes = (0..32)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (state >> 56) as u8
                })
                .collect();
            Descriptor::from_bytes(bytes)
        })
        .collect()
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");

    for &count in &[100, 500, 2000] {
        let query = create_descriptors(count, 7);
        let train = create_descriptors(count, 11);
        group.bench_with_input(BenchmarkId::new("one_directional", count), &count, |b, _| {
            b.iter(|| black_box(match_descriptors(black_box(&query), black_box(&train)).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("mutual", count), &count, |b, _| {
            b.iter(|| black_box(match_mutual(black_box(&query), black_box(&train)).unwrap()))
        });
    }

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let query = create_descriptors(2000, 3);
    let train = create_descriptors(2000, 5);
    let matches = match_descriptors(&query, &train).unwrap();

    c.bench_function("select_top_20", |b| {
        b.iter(|| black_box(select_top(black_box(matches.clone()), 20)))
    });
}

criterion_group!(benches, bench_matching, bench_selection);
criterion_main!(benches);
