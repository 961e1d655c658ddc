//! The immutable artifact produced by a training run.

use crate::config::ModelConfig;
use crate::dataset::SaleRecord;
use crate::error::{PricingError, Result};
use crate::features::{FeatureBuilder, FeatureSchema, RawFeatures};
use crate::model::{InferenceModel, RidgeModel, RidgeParams, RidgeRegression};
use crate::preprocessing::{
    FittedStandardScaler, FittedTransformer, StandardScaler, StandardScalerParams, Transformer,
};
use crate::serialization::SerializableParams;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Bumped whenever [`TrainedModelParams`] changes shape.
const FORMAT_VERSION: u32 = 1;

/// Fitted scaler, fitted ridge coefficients, training response mean and the column
/// schema, captured together by one training run.
///
/// A `TrainedModel` is never mutated; re-training produces a new one.
#[derive(Clone, Debug)]
pub struct TrainedModel {
    schema: FeatureSchema,
    scaler: FittedStandardScaler,
    regressor: RidgeModel,
    mean_response: f64,
    n_training_records: usize,
}

/// Plain-data form of a [`TrainedModel`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainedModelParams {
    pub format_version: u32,
    pub schema: FeatureSchema,
    pub scaler: StandardScalerParams,
    pub regressor: RidgeParams,
    pub mean_response: f64,
    pub n_training_records: usize,
}

impl TrainedModel {
    /// Fits the King County pipeline on `records`.
    pub fn fit(records: &[SaleRecord], config: &ModelConfig) -> Result<Self> {
        Self::fit_with_schema(records, config, FeatureSchema::king_county())
    }

    /// Fits on `records` using an explicit column schema.
    ///
    /// # Errors
    /// - [`PricingError::Precondition`] for an empty (or single-record) training set.
    /// - [`PricingError::Configuration`] for an invalid `config` or a constant column.
    /// - [`PricingError::Lookup`] for a record whose ZIP code is unknown.
    pub fn fit_with_schema(
        records: &[SaleRecord],
        config: &ModelConfig,
        schema: FeatureSchema,
    ) -> Result<Self> {
        config.validate()?;

        let (x, y) = FeatureBuilder::new(&schema).build_training_matrix(records)?;
        let scaler = StandardScaler::new()
            .with_feature_names(schema.names())
            .fit(&x)?;
        let z = scaler.transform(&x)?;

        let mean_response = y.mean().ok_or_else(|| {
            PricingError::Precondition("cannot build a model from zero training records".into())
        })?;
        let centered = y.mapv(|price| price - mean_response);

        let regressor = RidgeRegression::new(config.alphas.clone(), config.cross_validation)
            .fit(&z, &centered)?;

        info!(
            records = records.len(),
            alpha = regressor.alpha(),
            mean_response,
            "trained pricing model"
        );

        Ok(Self {
            schema,
            scaler,
            regressor,
            mean_response,
            n_training_records: records.len(),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }

    pub fn regressor(&self) -> &RidgeModel {
        &self.regressor
    }

    /// Mean sale price of the training records.
    pub fn mean_response(&self) -> f64 {
        self.mean_response
    }

    pub fn n_training_records(&self) -> usize {
        self.n_training_records
    }

    /// Standardized feature row for raw inputs, in schema order.
    pub fn standardized_row(&self, raw: &RawFeatures) -> Result<Array1<f64>> {
        let row = FeatureBuilder::new(&self.schema).build_inference_vector(raw)?;
        self.scaler.transform_row(&row)
    }

    /// Model output in centered units; the caller adds [`mean_response`](Self::mean_response).
    pub fn centered_estimate(&self, raw: &RawFeatures) -> Result<f64> {
        let z = self.standardized_row(raw)?;
        self.regressor.predict_row(&z)
    }

    pub fn to_params(&self) -> TrainedModelParams {
        TrainedModelParams {
            format_version: FORMAT_VERSION,
            schema: self.schema.clone(),
            scaler: self.scaler.extract_params(),
            regressor: self.regressor.extract_params(),
            mean_response: self.mean_response,
            n_training_records: self.n_training_records,
        }
    }

    /// Rebuilds a model, checking that its parts agree with each other.
    pub fn from_params(params: TrainedModelParams) -> Result<Self> {
        if params.format_version != FORMAT_VERSION {
            return Err(PricingError::Serialization(format!(
                "unsupported model format version {} (expected {})",
                params.format_version, FORMAT_VERSION
            )));
        }
        let scaler = FittedStandardScaler::from_params(params.scaler)?;
        let regressor = RidgeModel::from_params(params.regressor)?;
        let width = params.schema.len();
        if scaler.n_features_in() != width || regressor.n_features() != width {
            return Err(PricingError::Serialization(format!(
                "schema has {} columns but scaler has {} and regressor {}",
                width,
                scaler.n_features_in(),
                regressor.n_features()
            )));
        }
        if !params.mean_response.is_finite() {
            return Err(PricingError::Serialization(
                "mean response must be finite".to_string(),
            ));
        }

        Ok(Self {
            schema: params.schema,
            scaler,
            regressor,
            mean_response: params.mean_response,
            n_training_records: params.n_training_records,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_params().to_bytes()?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_params(TrainedModelParams::from_bytes(bytes)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bytes()?).map_err(|e| {
            PricingError::Serialization(format!("cannot write {}: {}", path.display(), e))
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            PricingError::Serialization(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }
}
