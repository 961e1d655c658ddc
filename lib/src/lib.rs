//! # kc-house-price
//!
//! Sale-price estimation for King County residential property, trained on historical
//! sales with a cross-validated ridge regression.
//!
//! ## Core Design Principles
//!
//! - **Explicit column schema**: the ordered `(feature, transform)` list is captured when
//!   a model is trained and carried inside it; inference walks that list, so training
//!   and prediction rows always line up.
//! - **Stateful Type Safety**: the regressor carries its training state in the type
//!   system (`Unfitted` vs `Fitted`); prediction methods exist only on fitted models.
//! - **Typed failures**: every error is a [`PricingError`] with a [`ErrorKind`]; unknown
//!   ZIP codes, missing inputs and untrained services are reported, never defaulted.
//! - **Build-then-swap**: [`PredictionService`] fits a new model off to the side and
//!   publishes it atomically; concurrent predictions never observe a half-built model.
//!
//! ## Pipeline
//!
//! ```text
//! SaleRecord* --FeatureBuilder--> X, y --StandardScaler--> Z --RidgeRegression(y - ȳ)--> TrainedModel
//! RawFeatures --FeatureBuilder--> x --scaler.transform--> z --predict--> + ȳ --> max(0, ·), rounded
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use kc_house_price::{ModelConfig, PredictionService, RawFeatures, SalesData};
//!
//! let sales = SalesData::from_csv("kc_house_data.csv")?;
//! let service = PredictionService::new(ModelConfig::default());
//! service.build(sales.records())?;
//!
//! let house = RawFeatures::new()
//!     .with("date", "2015-03-01")
//!     .with("bathrooms", 2.0)
//!     .with("sqft_living", 1800u32)
//!     .with("sqft_lot", 5000u32)
//!     .with("waterfront", 0u8)
//!     .with("view", 0u8)
//!     .with("condition", 3u8)
//!     .with("grade", 7u8)
//!     .with("zipcode", "98103");
//! println!("estimated price: {}", service.predict(&house)?);
//! # Ok::<(), kc_house_price::PricingError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `dates`: sale-date to sale-day encoding
//! - `location`: ZIP code ranking table
//! - `features`: column schema, raw inputs, feature row assembly
//! - `preprocessing`: exponential re-expression and standard scaling
//! - `model`: cross-validated ridge regression
//! - `trained`: the trained artifact and its persistence
//! - `service`: the model lifecycle and prediction surface
//! - `dataset`: CSV ingestion of historical sales
//! - `config`: training-data location and model-selection settings

/// Training-data location and model-selection settings.
pub mod config;

/// Historical sales ingestion.
pub mod dataset;

/// Sale-date encoding.
pub mod dates;

/// Error taxonomy.
pub mod error;

/// Model columns and feature row assembly.
pub mod features;

/// ZIP code location table.
pub mod location;

/// Regression models with compile-time state safety.
pub mod model;

/// Feature transforms and scaling.
pub mod preprocessing;

/// Parameter persistence.
pub mod serialization;

/// Prediction service and model lifecycle.
pub mod service;

/// Trained model artifact.
pub mod trained;

pub use config::{
    CrossValidation, ModelConfig, PricingConfig, TrainingDataConfig, MAX_PRICE_PRECISION,
};
pub use dataset::{SaleRecord, SalesData};
pub use dates::DateEncoder;
pub use error::{ErrorKind, PricingError, Result};
pub use features::{Feature, FeatureBuilder, FeatureSchema, RawFeatures, RawValue};
pub use location::{LocationEntry, LocationTable};
pub use service::{PredictionService, ServiceState};
pub use trained::TrainedModel;
