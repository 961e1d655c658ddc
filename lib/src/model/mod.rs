//! Regression models.
//!
//! Models encode their lifecycle in a type parameter ([`Unfitted`] / [`Fitted`]):
//! fitting consumes hyper-parameters and produces a value on which the
//! [`InferenceModel`] methods exist.

pub mod linalg;
pub mod ridge;
pub mod state;

pub use ridge::{CrossValidation, RidgeModel, RidgeParams, RidgeRegression, DEFAULT_ALPHAS};
pub use state::{Fitted, Unfitted};

use crate::error::{PricingError, Result};
use crate::serialization::SerializableParams;

/// Prediction and persistence for a fitted model.
pub trait InferenceModel {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    /// Plain-data form used for persistence.
    type ParamsRepr: SerializableParams;

    fn predict(&self, input: &Self::InputSingle) -> Result<Self::OutputSingle>;
    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch>;

    fn extract_params(&self) -> Self::ParamsRepr;
    fn from_params(params: Self::ParamsRepr) -> Result<Self>
    where
        Self: Sized;

    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| PricingError::Serialization(e.to_string()))?;
        std::fs::write(path.as_ref(), bytes).map_err(|e| {
            PricingError::Serialization(format!("cannot write {}: {}", path.as_ref().display(), e))
        })
    }

    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            PricingError::Serialization(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        let params = Self::ParamsRepr::from_bytes(&bytes)
            .map_err(|e| PricingError::Serialization(e.to_string()))?;
        Self::from_params(params)
    }
}
