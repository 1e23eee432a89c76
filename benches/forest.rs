//! Random forest fitting benchmark
//!
//! Measures how forest size and table size drive fit time, on a synthetic
//! table shaped like the condensed song table (tempo, danceability, energy).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempo_run::model::{FeatureRow, ForestParams, RandomForest};

fn synthetic_table(rows: usize) -> (Vec<FeatureRow>, Vec<f64>) {
    let x: Vec<FeatureRow> = (0..rows)
        .map(|i| {
            [
                70.0 + (i * 37 % 130) as f64,
                (i * 13 % 100) as f64 / 100.0,
                (i * 29 % 100) as f64 / 100.0,
            ]
        })
        .collect();
    let y = x.iter().map(|row| 1.5 + row[0] / 60.0 + row[2] * 0.3).collect();
    (x, y)
}

fn bench_forest_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit");
    group.sample_size(10);

    for rows in [200usize, 1_000] {
        let (x, y) = synthetic_table(rows);

        for n_estimators in [10usize, 100] {
            let params = ForestParams { n_estimators, ..Default::default() };
            group.bench_function(BenchmarkId::new(format!("{}_trees", n_estimators), rows), |b| {
                b.iter(|| black_box(RandomForest::fit(&x, &y, params)));
            });
        }
    }

    group.finish();
}

fn bench_forest_predict(c: &mut Criterion) {
    let (x, y) = synthetic_table(1_000);
    let forest = RandomForest::fit(&x, &y, ForestParams::default());

    c.bench_function("forest_predict_1000_rows", |b| {
        b.iter(|| black_box(forest.predict(&x)));
    });
}

criterion_group!(benches, bench_forest_fit, bench_forest_predict);
criterion_main!(benches);
