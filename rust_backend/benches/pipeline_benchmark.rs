use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use dvf_clean::core::domain::RawRecord;
use dvf_clean::preprocessing::CleaningPipeline;
use dvf_clean::transformations::{aggregate_transactions, AggregationRules};

/// Synthetic municipality: two lots per sale, every seventh row an exchange
fn synthetic_records(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| RawRecord {
            id_mutation: Some(format!("2023-{}", i / 2)),
            nature_mutation: Some(if i % 7 == 0 { "Échange" } else { "Vente" }.to_string()),
            type_local: Some(if i % 3 == 0 { "Maison" } else { "Appartement" }.to_string()),
            valeur_fonciere: Some(150_000.0 + (i % 50) as f64 * 5_000.0),
            surface_reelle_bati: Some(20.0 + (i % 40) as f64),
            nombre_pieces_principales: Some((i % 5) as i64 + 1),
            ..RawRecord::default()
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleaning_pipeline");
    let pipeline = CleaningPipeline::new();

    for size in [1_000usize, 10_000, 100_000] {
        let records = synthetic_records(size);
        group.bench_with_input(BenchmarkId::new("process_records", size), &records, |b, input| {
            b.iter(|| black_box(pipeline.process_records(black_box(input))))
        });
    }

    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let rules = AggregationRules::default();
    let records = synthetic_records(10_000);

    group.bench_function("aggregate_transactions", |b| {
        b.iter(|| black_box(aggregate_transactions(black_box(&records), &rules)))
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_aggregation);
criterion_main!(benches);
