use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tsbench::{encode_key, encode_value, Generator};

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.bench_function("encode_key", |b| {
        let mut seq = 0i64;
        b.iter(|| {
            seq += 1;
            black_box(encode_key(black_box(3), black_box(1_700_000_000_000_000 + seq), seq))
        })
    });
    group.bench_function("encode_value", |b| {
        b.iter(|| encode_value(black_box(123_456_789)))
    });
    group.finish();
}

fn bench_make_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_batch");
    for size in [100usize, 1000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut generator = Generator::new(16, 0, 42);
            b.iter(|| generator.make_batch(size))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec, bench_make_batch);
criterion_main!(benches);
