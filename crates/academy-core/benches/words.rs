use criterion::{black_box, criterion_group, criterion_main, Criterion};

use academy_core::words::{amount_in_words, number_to_words};

fn bench_number_to_words(c: &mut Criterion) {
    let mut group = c.benchmark_group("number_to_words");

    group.bench_function("n=1234", |b| b.iter(|| number_to_words(black_box(1234))));

    group.bench_function("n=12345678", |b| {
        b.iter(|| number_to_words(black_box(12_345_678)))
    });

    group.bench_function("n=u64::MAX", |b| {
        b.iter(|| number_to_words(black_box(u64::MAX)))
    });

    group.bench_function("amount 125000.75", |b| {
        b.iter(|| amount_in_words(black_box(125_000.75)))
    });

    group.finish();
}

criterion_group!(benches, bench_number_to_words);
criterion_main!(benches);
