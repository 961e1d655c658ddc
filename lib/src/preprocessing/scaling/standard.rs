//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the population standard
//! deviation (ddof = 0).
//!
//! A constant column is rejected at fit time with a configuration error naming it.
//!
//! # Example
//! ```
//! use kc_house_price::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//! use ndarray::array;
//!
//! let data = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
//! let fitted = StandardScaler::new().fit(&data)?;
//! let scaled = fitted.transform(&data)?;
//! assert!(scaled[[1, 0]].abs() < 1e-12);
//! # Ok::<(), kc_house_price::PricingError>(())
//! ```

use crate::error::{PricingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Relative tolerance below which a column's std counts as zero.
const ZERO_VARIANCE_TOLERANCE: f64 = 1e-12;

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If True, center the data before scaling.
    pub with_mean: bool,
    /// If True, scale the data to unit variance.
    pub with_std: bool,
    /// Optional column names, used only in error messages.
    #[serde(default)]
    pub feature_names: Vec<String>,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
            feature_names: Vec::new(),
        }
    }
}

impl StandardScalerConfig {
    fn column_name(&self, index: usize) -> String {
        self.feature_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("column {}", index))
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Mean of each feature (zeros if with_mean=false).
    pub mean: Vec<f64>,
    /// Standard deviation of each feature (ones if with_std=false).
    pub std: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    /// Name the columns so a degenerate column is reported by name.
    pub fn with_feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.feature_names = names.into_iter().map(Into::into).collect();
        self
    }
}

impl Transformer for StandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        let (rows, cols) = data.dim();

        if rows == 0 {
            return Err(PricingError::Precondition(
                "cannot fit StandardScaler on empty data".to_string(),
            ));
        }
        if let Some(((_, j), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(PricingError::Schema(format!(
                "{} contains a non-finite value",
                self.config.column_name(j)
            )));
        }

        let column_mean = data.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(cols));
        let column_std = data.std_axis(Axis(0), 0.0);
        for (j, (&s, &m)) in column_std.iter().zip(column_mean.iter()).enumerate() {
            if s <= ZERO_VARIANCE_TOLERANCE * m.abs().max(1.0) {
                return Err(PricingError::Configuration(format!(
                    "{} is constant across all {} training records",
                    self.config.column_name(j),
                    rows
                )));
            }
        }

        let mean = if self.config.with_mean {
            column_mean
        } else {
            Array1::zeros(cols)
        };
        let std = if self.config.with_std {
            column_std
        } else {
            Array1::ones(cols)
        };

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            std,
            n_features: cols,
        })
    }

    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStandardScaler {
    config: StandardScalerConfig,
    mean: Array1<f64>,
    std: Array1<f64>,
    n_features: usize,
}

impl FittedStandardScaler {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Get the standard deviation values for each feature.
    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }

    /// Standardizes a single row with the fitted statistics.
    pub fn transform_row(&self, row: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_width(row.len())?;
        Ok((row - &self.mean) / &self.std)
    }

    fn check_width(&self, cols: usize) -> Result<()> {
        if cols != self.n_features {
            return Err(PricingError::Schema(format!(
                "expected {} features, got {}",
                self.n_features, cols
            )));
        }
        Ok(())
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        self.check_width(data.ncols())?;
        Ok((data - &self.mean) / &self.std)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input> {
        self.check_width(data.ncols())?;
        Ok(data * &self.std + &self.mean)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            config: self.config.clone(),
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if params.mean.len() != params.n_features || params.std.len() != params.n_features {
            return Err(PricingError::Serialization(format!(
                "scaler parameters disagree: {} features, {} means, {} stds",
                params.n_features,
                params.mean.len(),
                params.std.len()
            )));
        }
        if params.std.iter().any(|&s| !(s.is_finite() && s > 0.0)) {
            return Err(PricingError::Serialization(
                "scaler standard deviations must be positive".to_string(),
            ));
        }

        Ok(Self {
            config: params.config,
            mean: Array1::from(params.mean),
            std: Array1::from(params.std),
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}
