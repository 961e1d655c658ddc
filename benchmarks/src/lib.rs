//! Benchmark utilities for kc-house-price.
//!
//! - Deterministic synthetic King County sales
//! - Holdout metrics on sale prices (MSE, RMSE, MAE, R², MAPE)
//! - Timing helpers for the evaluation binary

pub mod data;
pub mod metrics;
pub mod utils;

pub use data::SyntheticSales;
pub use metrics::{Metrics, RegressionMetrics};
pub use utils::{time_fn, LatencyStats, Timer};
