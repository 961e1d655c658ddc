use benchmarks::metrics::Metrics;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn price_vectors(n: usize) -> (Vec<f64>, Vec<f64>) {
    let y_true: Vec<f64> = (0..n).map(|i| 200_000.0 + (i % 500) as f64 * 1_500.0).collect();
    let y_pred: Vec<f64> = y_true
        .iter()
        .enumerate()
        .map(|(i, y)| y * if i % 2 == 0 { 1.05 } else { 0.97 })
        .collect();
    (y_true, y_pred)
}

fn bench_each_metric(c: &mut Criterion) {
    let metrics: [(&str, fn(&[f64], &[f64]) -> f64); 5] = [
        ("mse", Metrics::mse),
        ("rmse", Metrics::rmse),
        ("mae", Metrics::mae),
        ("r_squared", Metrics::r_squared),
        ("mape", Metrics::mape),
    ];

    for (name, metric) in metrics {
        let mut group = c.benchmark_group(name);
        for size in [1_000, 10_000, 100_000].iter() {
            let (y_true, y_pred) = price_vectors(*size);
            group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
                b.iter(|| black_box(metric(black_box(&y_true), black_box(&y_pred))));
            });
        }
        group.finish();
    }
}

fn bench_calculate_all(c: &mut Criterion) {
    for size in [1_000, 10_000, 100_000].iter() {
        let (y_true, y_pred) = price_vectors(*size);
        c.bench_with_input(BenchmarkId::new("calculate_all", size), size, |b, _| {
            b.iter(|| {
                let metrics = Metrics::calculate_all(black_box(&y_true), black_box(&y_pred));
                black_box(metrics);
            });
        });
    }
}

criterion_group!(benches, bench_each_metric, bench_calculate_all);
criterion_main!(benches);
