//! Holdout evaluation of the pricing model
//!
//! Fits on the first part of a sales set, prices the remainder and reports:
//! - Build time and chosen alpha
//! - MSE, RMSE, MAE, R² and MAPE on the holdout
//! - Per-estimate latency

use anyhow::{Context, Result};
use benchmarks::{time_fn, LatencyStats, Metrics, SyntheticSales, Timer};
use clap::Parser;
use kc_house_price::{CrossValidation, ModelConfig, PredictionService, SalesData};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "evaluate")]
#[command(about = "Holdout evaluation of the King County pricing model", long_about = None)]
struct Args {
    /// Sales export to evaluate on; synthetic sales are generated when omitted
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of synthetic sales
    #[arg(long, default_value_t = 5000)]
    records: usize,

    /// Seed of the synthetic sales
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Share of the sales used for training
    #[arg(long, default_value_t = 0.8)]
    train_ratio: f64,

    /// Use k-fold cross-validation instead of leave-one-out
    #[arg(long)]
    k_fold: Option<usize>,

    /// Write the results as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let sales = match &args.csv {
        Some(path) => SalesData::from_csv(path)
            .with_context(|| format!("Failed to load sales from {}", path.display()))?,
        None => SyntheticSales::new(args.seed).generate(args.records),
    };
    let (train, test) = sales.split(args.train_ratio);
    info!(train = train.len(), test = test.len(), "split sales");

    let config = ModelConfig {
        cross_validation: args
            .k_fold
            .map(CrossValidation::KFold)
            .unwrap_or_default(),
        ..Default::default()
    };
    let cross_validation = config.cross_validation;
    let service = PredictionService::new(config);

    let (model, build_time) = time_fn(|| service.build(train.records()));
    let model = model.context("Failed to build the pricing model")?;
    info!(
        alpha = model.regressor().alpha(),
        build_ms = build_time.as_secs_f64() * 1000.0,
        "model built"
    );

    let mut timer = Timer::new();
    let mut latencies = Vec::with_capacity(test.len());
    let mut estimates = Vec::with_capacity(test.len());
    for record in test.records() {
        timer.start();
        let estimate = service.predict_record(record)?;
        latencies.push(timer.stop().as_secs_f64() * 1e6);
        estimates.push(estimate);
    }

    let metrics = Metrics::calculate_all(&test.prices(), &estimates);
    let latency = LatencyStats::from_micros(latencies);

    println!("Cross-validation: {}", cross_validation);
    println!("Chosen alpha:     {}", model.regressor().alpha());
    println!("Build time:       {:.2} ms", build_time.as_secs_f64() * 1000.0);
    println!("Holdout sales:    {}", test.len());
    println!("RMSE:             {:.0}", metrics.rmse);
    println!("MAE:              {:.0}", metrics.mae);
    println!("R²:               {:.4}", metrics.r_squared);
    println!("MAPE:             {:.2}%", metrics.mape * 100.0);
    if let Some(latency) = &latency {
        println!(
            "Latency:          mean {:.1} µs, p95 {:.1} µs, p99 {:.1} µs",
            latency.mean_us, latency.p95_us, latency.p99_us
        );
    }

    if let Some(path) = &args.output {
        let report = json!({
            "train_records": train.len(),
            "test_records": test.len(),
            "cross_validation": cross_validation.to_string(),
            "alpha": model.regressor().alpha(),
            "cv_scores": model.regressor().cv_scores(),
            "build_ms": build_time.as_secs_f64() * 1000.0,
            "total_predict_ms": timer.total_ms(),
            "metrics": metrics.to_json(),
            "latency_mean_us": latency.as_ref().map(|l| l.mean_us),
            "latency_p99_us": latency.as_ref().map(|l| l.p99_us),
        });
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("results saved to {}", path.display());
    }

    Ok(())
}
