//! Data preprocessing for the pricing pipeline.
//!
//! Two stages sit between the raw feature rows and the regressor:
//!
//! - [`FeatureTransformer`]: a fixed, declarative table of exponential re-expressions.
//!   Nothing is learned; the same factors apply for the lifetime of the system.
//! - [`StandardScaler`]: learns per-column mean and standard deviation at fit time and
//!   reapplies them unchanged to every later row.
//!
//! Learned stages follow the type-state split of [`Transformer`] (unfitted, has
//! hyperparameters) and [`FittedTransformer`] (fitted, serializable).
//!
//! # Example
//!
//! ```
//! use kc_house_price::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//! use ndarray::array;
//!
//! let training = array![[1.0, 200.0], [2.0, 400.0], [4.0, 300.0]];
//! let fitted = StandardScaler::new().fit(&training)?;
//!
//! // Later, for inference:
//! let scaled = fitted.transform(&array![[2.0, 300.0]])?;
//! assert_eq!(scaled.ncols(), 2);
//! # Ok::<(), kc_house_price::PricingError>(())
//! ```

pub mod exponential;
pub mod scaling;
pub mod traits;

pub use exponential::FeatureTransformer;
pub use scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
pub use traits::{FittedTransformer, Transformer};
