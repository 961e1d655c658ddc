use serde_json::{json, Value};

/// Regression metrics for comparing estimated and actual sale prices.
pub struct Metrics;

impl Metrics {
    /// Mean Squared Error.
    ///
    /// MSE = mean((y_true - y_pred)^2)
    ///
    /// Returns 0 for empty input.
    pub fn mse(y_true: &[f64], y_pred: &[f64]) -> f64 {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "Arrays must have the same length"
        );
        if y_true.is_empty() {
            return 0.0;
        }

        let sum_sq: f64 = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        sum_sq / y_true.len() as f64
    }

    /// Root Mean Squared Error, in dollars.
    pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> f64 {
        Self::mse(y_true, y_pred).sqrt()
    }

    /// Mean Absolute Error, in dollars.
    pub fn mae(y_true: &[f64], y_pred: &[f64]) -> f64 {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "Arrays must have the same length"
        );
        if y_true.is_empty() {
            return 0.0;
        }

        let sum_abs: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
        sum_abs / y_true.len() as f64
    }

    /// Coefficient of determination.
    ///
    /// R² = 1 - SS_res / SS_tot
    ///
    /// Can be negative when the estimates are worse than predicting the mean price.
    pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> f64 {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "Arrays must have the same length"
        );
        if y_true.is_empty() {
            return 0.0;
        }

        let mean_true = y_true.iter().sum::<f64>() / y_true.len() as f64;
        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        let ss_tot: f64 = y_true.iter().map(|t| (t - mean_true).powi(2)).sum();

        if ss_tot == 0.0 {
            return if ss_res == 0.0 { 1.0 } else { 0.0 };
        }
        1.0 - ss_res / ss_tot
    }

    /// Mean Absolute Percentage Error, as a fraction.
    ///
    /// Rows whose true price is zero are skipped.
    pub fn mape(y_true: &[f64], y_pred: &[f64]) -> f64 {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "Arrays must have the same length"
        );
        let (sum, count) = y_true
            .iter()
            .zip(y_pred)
            .filter(|(t, _)| **t != 0.0)
            .fold((0.0, 0usize), |(sum, count), (t, p)| {
                (sum + ((t - p) / t).abs(), count + 1)
            });
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    pub fn calculate_all(y_true: &[f64], y_pred: &[f64]) -> RegressionMetrics {
        RegressionMetrics {
            mse: Self::mse(y_true, y_pred),
            rmse: Self::rmse(y_true, y_pred),
            mae: Self::mae(y_true, y_pred),
            r_squared: Self::r_squared(y_true, y_pred),
            mape: Self::mape(y_true, y_pred),
        }
    }
}

/// All holdout metrics of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
    pub mape: f64,
}

impl RegressionMetrics {
    pub fn to_json(&self) -> Value {
        json!({
            "mse": self.mse,
            "rmse": self.rmse,
            "mae": self.mae,
            "r_squared": self.r_squared,
            "mape": self.mape,
        })
    }
}
