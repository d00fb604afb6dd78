use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn synthetic_buffers(size: usize) -> (Vec<u8>, Vec<u8>) {
    let reference: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    let mut target = reference.clone();
    // Perturb roughly one byte in sixty four so most blocks still match.
    for (i, byte) in target.iter_mut().enumerate() {
        if i % 64 == 0 {
            *byte = byte.wrapping_add(1);
        }
    }
    (reference, target)
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    for size in [1 << 12, 1 << 16, 1 << 20] {
        let (reference, target) = synthetic_buffers(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| blockdiff::diff(black_box(&reference), black_box(&target), 0));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_diff);
criterion_main!(benches);
