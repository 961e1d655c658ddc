/// A marker type indicating that a model is **not yet trained**.
///
/// This phantom type is used in generic parameters (e.g., `RidgeRegression<Unfitted>`)
/// to enforce compile-time guarantees:
/// - `fit` is only available on an `Unfitted` regressor.
/// - Inference methods (`predict_row`, `predict_batch`) are **not available** until
///   fitting produced a `Fitted` model.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model carries its inference parameters (coefficients and the chosen
/// regularization strength) plus the cross-validation score of every candidate it was
/// selected from.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
