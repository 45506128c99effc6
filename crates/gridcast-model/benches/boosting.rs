//! Benchmarks for fitting the boosted regressor.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gridcast_model::{BoosterConfig, GradientBoostedRegressor, Regressor};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn training_set(rows: usize, features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(42);
    let x = Array2::from_shape_fn((rows, features), |_| rng.gen_range(-20.0..30.0));
    let y = x.rows().into_iter().map(|r| 24.0 + 0.5 * r.sum()).collect();
    (x, y)
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("booster_fit");
    group.sample_size(10);

    for rows in [200, 800] {
        let (x, y) = training_set(rows, 16);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| {
                let config = BoosterConfig {
                    n_estimators: 50,
                    ..Default::default()
                };
                let mut model = GradientBoostedRegressor::new(config).unwrap();
                model.fit(black_box(&x), black_box(&y)).unwrap();
                model
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fit);
criterion_main!(benches);
