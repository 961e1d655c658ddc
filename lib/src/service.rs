//! The prediction service: owns the current [`TrainedModel`] and turns raw inputs into
//! prices.
//!
//! # Lifecycle
//!
//! ```text
//!   Uninitialized --build()/install()--> Ready --build()/install()--> Ready (new model)
//! ```
//!
//! A build fits a complete new model without holding any lock and then publishes it
//! with a single pointer swap. Predictions clone the current `Arc` under a short read
//! lock and compute without synchronization, so a prediction racing a rebuild sees
//! either the old model or the new one, never a mixture. A failed build leaves the
//! previous model in place.

use crate::config::{ModelConfig, TrainingDataConfig, MAX_PRICE_PRECISION};
use crate::dataset::{SaleRecord, SalesData};
use crate::error::{ErrorKind, PricingError, Result};
use crate::features::RawFeatures;
use crate::trained::TrainedModel;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether the service can answer predictions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Ready,
}

/// Clamps a price at zero and rounds it half away from zero to `precision` decimals.
///
/// `precision` is capped at [`MAX_PRICE_PRECISION`].
pub fn finalize_price(value: f64, precision: u32) -> f64 {
    let floored = value.max(0.0);
    let scale = 10f64.powi(precision.min(MAX_PRICE_PRECISION) as i32);
    (floored * scale).round() / scale
}

/// Thread-safe owner of the served model.
#[derive(Debug, Default)]
pub struct PredictionService {
    config: ModelConfig,
    model: RwLock<Option<Arc<TrainedModel>>>,
}

impl PredictionService {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            model: RwLock::new(None),
        }
    }

    /// A ready service serving `model`.
    ///
    /// # Errors
    /// [`PricingError::Configuration`] if `config` is invalid.
    pub fn with_model(config: ModelConfig, model: TrainedModel) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            model: RwLock::new(Some(Arc::new(model))),
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn state(&self) -> ServiceState {
        if self.model.read().is_some() {
            ServiceState::Ready
        } else {
            ServiceState::Uninitialized
        }
    }

    pub fn can_predict(&self) -> bool {
        self.state() == ServiceState::Ready
    }

    /// Fits a new model on `records` and makes it the served one.
    ///
    /// # Errors
    /// Any fitting error; the previously served model (if any) stays in place.
    pub fn build(&self, records: &[SaleRecord]) -> Result<Arc<TrainedModel>> {
        let model = TrainedModel::fit(records, &self.config)?;
        Ok(self.publish(model))
    }

    /// Loads the configured sales export and builds from it.
    pub fn build_from_source(&self, source: &TrainingDataConfig) -> Result<Arc<TrainedModel>> {
        let data = SalesData::from_config(source)?;
        self.build(data.records())
    }

    /// Serves an already trained model, e.g. one loaded from disk.
    ///
    /// # Errors
    /// [`PricingError::Configuration`] if the service's config is invalid; the
    /// previously served model stays in place.
    pub fn install(&self, model: TrainedModel) -> Result<Arc<TrainedModel>> {
        self.config.validate()?;
        Ok(self.publish(model))
    }

    fn publish(&self, model: TrainedModel) -> Arc<TrainedModel> {
        let model = Arc::new(model);
        let previous = self.model.write().replace(Arc::clone(&model));
        info!(
            replaced = previous.is_some(),
            records = model.n_training_records(),
            "pricing model is ready"
        );
        model
    }

    /// Snapshot of the served model.
    ///
    /// # Errors
    /// [`PricingError::Precondition`] before the first build.
    pub fn model(&self) -> Result<Arc<TrainedModel>> {
        self.model.read().clone().ok_or_else(|| {
            PricingError::Precondition("the pricing model has not been built".to_string())
        })
    }

    /// Estimated sale price for raw inputs.
    ///
    /// Returns `max(0, model output + training mean)` rounded to the configured
    /// precision.
    ///
    /// # Errors
    /// - [`PricingError::Precondition`] before the first build.
    /// - [`PricingError::Schema`] / [`PricingError::Lookup`] for bad inputs, including
    ///   values large enough to overflow the estimate.
    pub fn predict(&self, raw: &RawFeatures) -> Result<f64> {
        let model = self.model()?;
        let centered = model.centered_estimate(raw).map_err(|e| {
            if matches!(e.kind(), ErrorKind::Schema | ErrorKind::Lookup) {
                warn!(error = %e, "rejected prediction input");
            }
            e
        })?;
        let estimate = centered + model.mean_response();
        if !estimate.is_finite() {
            let err = PricingError::Schema(format!(
                "inputs produce a non-finite estimate ({})",
                estimate
            ));
            warn!(error = %err, "rejected prediction input");
            return Err(err);
        }
        if estimate < 0.0 {
            debug!(estimate, "negative estimate clamped to zero");
        }
        Ok(finalize_price(estimate, self.config.price_precision))
    }

    /// Estimated price for a sale record, as if it were entered by hand.
    pub fn predict_record(&self, record: &SaleRecord) -> Result<f64> {
        self.predict(&RawFeatures::from_record(record))
    }

    pub fn coefficients(&self) -> Result<Vec<f64>> {
        Ok(self.model()?.regressor().coefficients().to_vec())
    }

    pub fn mean_response(&self) -> Result<f64> {
        Ok(self.model()?.mean_response())
    }
}
