//! The named, ordered column layout shared by training and inference.

use crate::preprocessing::FeatureTransformer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A model input column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    SaleDay,
    Bathrooms,
    SqftLiving,
    SqftLot,
    Waterfront,
    View,
    Condition,
    Grade,
    Location,
}

impl Feature {
    /// Canonical column order of the King County model.
    pub const ALL: [Feature; 9] = [
        Feature::SaleDay,
        Feature::Bathrooms,
        Feature::SqftLiving,
        Feature::SqftLot,
        Feature::Waterfront,
        Feature::View,
        Feature::Condition,
        Feature::Grade,
        Feature::Location,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::SaleDay => "sale_day",
            Feature::Bathrooms => "bathrooms",
            Feature::SqftLiving => "sqft_living",
            Feature::SqftLot => "sqft_lot",
            Feature::Waterfront => "waterfront",
            Feature::View => "view",
            Feature::Condition => "condition",
            Feature::Grade => "grade",
            Feature::Location => "location",
        }
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Re-expression applied to a raw column value before scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColumnTransform {
    Identity,
    /// `v -> exp(factor * v)`
    Exponential { factor: f64 },
}

impl ColumnTransform {
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            ColumnTransform::Identity => value,
            ColumnTransform::Exponential { factor } => (factor * value).exp(),
        }
    }
}

/// One `(name, transform)` pair of the schema.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub feature: Feature,
    pub transform: ColumnTransform,
}

/// Ordered list of model columns.
///
/// Captured once when a model is built and stored inside the trained artifact; every
/// inference vector is assembled by walking this list, never by name lookup order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    /// Pairs each feature with the transform the transformer declares for it.
    pub fn new(features: &[Feature], transformer: &FeatureTransformer) -> Self {
        let columns = features
            .iter()
            .map(|&feature| FeatureColumn {
                feature,
                transform: transformer.transform_for(feature),
            })
            .collect();
        Self { columns }
    }

    /// All nine columns with the fixed King County exponents.
    pub fn king_county() -> Self {
        Self::new(&Feature::ALL, &FeatureTransformer::king_county())
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.feature.name()).collect()
    }

    pub fn position(&self, feature: Feature) -> Option<usize> {
        self.columns.iter().position(|c| c.feature == feature)
    }
}
