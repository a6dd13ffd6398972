use std::io::Cursor;

use canonical::{tokenize, WordReader};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for size in [64, 512, 4096, 32768].iter() {
        let text = "word's, ".repeat(*size / 8);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("eager_bytes_{size}"), |b| {
            b.iter(|| tokenize(black_box(&text)))
        });
        group.bench_function(format!("reader_bytes_{size}"), |b| {
            b.iter(|| {
                let reader = WordReader::new(Cursor::new(black_box(text.as_bytes())));
                reader.count()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
