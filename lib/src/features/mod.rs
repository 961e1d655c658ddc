//! Feature engineering: the model's column schema, raw inference inputs and the
//! builder that turns either sale records or raw inputs into ordered feature rows.

mod builder;
mod raw;
mod schema;

pub use builder::FeatureBuilder;
pub use raw::{RawFeatures, RawValue};
pub use schema::{ColumnTransform, Feature, FeatureColumn, FeatureSchema};
