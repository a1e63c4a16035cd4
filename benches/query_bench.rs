use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use corpusq::{resolve, ColumnHints, FilterSpec, QueryRegistry, RawTable};
use std::hint::black_box;

const TYPES: [&str; 3] = ["కథ", "కవిత", "నవల"];
const MAGAZINES: [&str; 4] = ["Bharati", "Andhra Patrika", "Chandamama", "Yuva"];

// Generate test data
fn generate_raw(rows: usize) -> RawTable {
    RawTable::from_records((0..rows).map(|i| {
        vec![
            ("Title", format!("Work {}", i % (rows / 2 + 1))),
            ("Writer", format!("Author {}", i % 97)),
            ("Category", TYPES[i % TYPES.len()].to_string()),
            ("Journal", MAGAZINES[i % MAGAZINES.len()].to_string()),
            ("Publisher", format!("House {}", i % 13)),
            (
                "Published date",
                format!("{}-{:02}-01", 1920 + i % 90, i % 12 + 1),
            ),
            ("STATUS", if i % 5 == 0 { "False" } else { "True" }.to_string()),
        ]
    }))
}

// Benchmark schema resolution
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let hints = ColumnHints::default();

    for size in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        let raw = generate_raw(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| resolve(black_box(raw), &hints).unwrap());
        });
    }

    group.finish();
}

// Benchmark filter application followed by query evaluation
fn bench_filter_and_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_and_query");
    let registry = QueryRegistry::new();
    let spec = FilterSpec::default()
        .year_range(1950, 1990)
        .types(["కథ", "కవిత"])
        .status(true);

    for size in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        let dataset = resolve(&generate_raw(size), &ColumnHints::default())
            .unwrap()
            .dataset;

        for key in ["top_authors", "title_summary", "publications_per_decade"] {
            group.bench_with_input(BenchmarkId::new(key, size), &dataset, |b, dataset| {
                b.iter(|| {
                    let view = spec.apply(black_box(dataset));
                    registry.evaluate(key, &view).unwrap()
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_filter_and_query);
criterion_main!(benches);
