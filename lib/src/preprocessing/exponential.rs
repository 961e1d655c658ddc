//! Declarative exponential re-expression of selected features.
//!
//! Each declared feature value `v` is replaced by `exp(factor * v)`. The factor table
//! is fixed for the lifetime of the system; nothing here is learned from data, so the
//! same table applies identically at training and inference.

use crate::features::{ColumnTransform, Feature};
use serde::{Deserialize, Serialize};

/// Fixed `{feature -> exponent factor}` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureTransformer {
    factors: Vec<(Feature, f64)>,
}

impl FeatureTransformer {
    /// Builds a table; a feature declared twice keeps its last factor.
    pub fn new<I>(factors: I) -> Self
    where
        I: IntoIterator<Item = (Feature, f64)>,
    {
        let mut table: Vec<(Feature, f64)> = Vec::new();
        for (feature, factor) in factors {
            match table.iter_mut().find(|(f, _)| *f == feature) {
                Some(slot) => slot.1 = factor,
                None => table.push((feature, factor)),
            }
        }
        Self { factors: table }
    }

    /// An empty table: every feature passes through unchanged.
    pub fn identity() -> Self {
        Self {
            factors: Vec::new(),
        }
    }

    /// Factors fitted offline against King County sales.
    pub fn king_county() -> Self {
        Self::new([
            (Feature::SaleDay, 3.193552e-4),
            (Feature::Bathrooms, 3.724330e-1),
            (Feature::SqftLot, 1.209000e-6),
            (Feature::Condition, 3.372000e-2),
            (Feature::Grade, 3.140530e-1),
        ])
    }

    pub fn factor_for(&self, feature: Feature) -> Option<f64> {
        self.factors
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|&(_, factor)| factor)
    }

    pub fn transform_for(&self, feature: Feature) -> ColumnTransform {
        match self.factor_for(feature) {
            Some(factor) => ColumnTransform::Exponential { factor },
            None => ColumnTransform::Identity,
        }
    }

    /// Re-expresses one raw value of `feature`.
    pub fn apply(&self, feature: Feature, value: f64) -> f64 {
        self.transform_for(feature).apply(value)
    }

    pub fn declared(&self) -> &[(Feature, f64)] {
        &self.factors
    }
}

impl Default for FeatureTransformer {
    fn default() -> Self {
        Self::king_county()
    }
}
