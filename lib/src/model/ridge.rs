//! Cross-validated ridge regression.
//!
//! The model has no intercept: it is meant to be fitted on standardized predictors and a
//! mean-centered response, and the caller adds the response mean back. Keeping that step
//! outside the model means a fitted [`RidgeModel`] only ever answers in centered units.
//!
//! For every candidate strength `α` the normal equations
//!
//! ```text
//! (XᵀX + αI) w = Xᵀy
//! ```
//!
//! are solved through a Cholesky factorisation, and `α` is chosen by cross-validated
//! mean squared error. Leave-one-out uses the closed form `eᵢ = rᵢ / (1 − hᵢᵢ)` where
//! `hᵢᵢ = xᵢᵀ(XᵀX + αI)⁻¹xᵢ`, so no refit per held-out row is needed.
//!
//! # Example
//!
//! ```
//! use kc_house_price::model::{CrossValidation, InferenceModel, RidgeRegression};
//! use ndarray::array;
//!
//! let x = array![[-1.0, 0.5], [0.0, -1.0], [1.0, 0.5]];
//! let y = array![-2.0, 0.1, 1.9];
//! let model = RidgeRegression::new(vec![0.1, 1.0, 10.0], CrossValidation::LeaveOneOut)
//!     .fit(&x, &y)?;
//! let centered = model.predict(&array![1.0, 0.5])?;
//! assert!(centered > 0.0);
//! # Ok::<(), kc_house_price::PricingError>(())
//! ```

use crate::error::{PricingError, Result};
use crate::model::linalg::{cholesky, cholesky_solve, solve_lower};
use crate::model::{Fitted, InferenceModel, Unfitted};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Candidate regularization strengths tried when none are configured.
pub const DEFAULT_ALPHAS: [f64; 3] = [0.1, 1.0, 10.0];

/// How candidate strengths are scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossValidation {
    /// Closed-form leave-one-out.
    #[default]
    LeaveOneOut,
    /// `k` contiguous folds in record order.
    KFold(usize),
}

impl fmt::Display for CrossValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossValidation::LeaveOneOut => f.write_str("leave-one-out"),
            CrossValidation::KFold(k) => write!(f, "{}-fold", k),
        }
    }
}

/// Serializable representation of a fitted ridge model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RidgeParams {
    pub coefficients: Vec<f64>,
    pub alpha: f64,
    /// `(alpha, cross-validated MSE)` for every candidate, in candidate order.
    pub cv_scores: Vec<(f64, f64)>,
}

/// Ridge regressor with its lifecycle encoded at the type level.
///
/// - `RidgeRegression<Unfitted>` holds the candidate grid and validation strategy.
/// - `RidgeRegression<Fitted>` (alias [`RidgeModel`]) holds coefficients, the chosen
///   strength and the score of every candidate.
#[derive(Clone, Debug)]
pub struct RidgeRegression<S> {
    alphas: Vec<f64>,
    cross_validation: CrossValidation,
    params: RidgeParams,
    _state: PhantomData<S>,
}

/// A fitted ridge model.
pub type RidgeModel = RidgeRegression<Fitted>;

impl Default for RidgeRegression<Unfitted> {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHAS.to_vec(), CrossValidation::LeaveOneOut)
    }
}

impl RidgeRegression<Unfitted> {
    pub fn new(alphas: Vec<f64>, cross_validation: CrossValidation) -> Self {
        Self {
            alphas,
            cross_validation,
            params: RidgeParams {
                coefficients: Vec::new(),
                alpha: 0.0,
                cv_scores: Vec::new(),
            },
            _state: PhantomData,
        }
    }

    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    pub fn cross_validation(&self) -> CrossValidation {
        self.cross_validation
    }

    /// Scores every candidate and refits with the best one.
    ///
    /// Ties keep the earliest candidate, so the result is a pure function of
    /// `(x, y, alphas, cross_validation)`.
    ///
    /// # Errors
    /// - [`PricingError::Precondition`] if there are fewer than two rows.
    /// - [`PricingError::Schema`] if `x` and `y` disagree in length.
    /// - [`PricingError::Configuration`] for an empty or non-positive candidate grid, an
    ///   unusable fold count, or a system that cannot be factorised.
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<RidgeModel> {
        let (n, _) = x.dim();
        if n < 2 {
            return Err(PricingError::Precondition(format!(
                "cross-validation needs at least 2 training records, got {}",
                n
            )));
        }
        if y.len() != n {
            return Err(PricingError::Schema(format!(
                "{} feature rows but {} responses",
                n,
                y.len()
            )));
        }
        validate_alphas(&self.alphas)?;
        if let CrossValidation::KFold(k) = self.cross_validation {
            if k < 2 || k > n {
                return Err(PricingError::Configuration(format!(
                    "{}-fold cross-validation is not possible with {} records",
                    k, n
                )));
            }
        }

        let xtx = x.t().dot(x);
        let xty = x.t().dot(y);

        let mut cv_scores = Vec::with_capacity(self.alphas.len());
        let mut best: Option<(f64, f64, Array1<f64>)> = None;
        for &alpha in &self.alphas {
            let l = factorise(&xtx, alpha)?;
            let w = cholesky_solve(&l, xty.view());
            let mse = match self.cross_validation {
                CrossValidation::LeaveOneOut => loo_mse(x, y, &l, &w),
                CrossValidation::KFold(k) => kfold_mse(x, y, alpha, k)?,
            };
            debug!(alpha, mse, strategy = %self.cross_validation, "scored ridge candidate");
            cv_scores.push((alpha, mse));

            let better = match &best {
                None => true,
                Some((_, best_mse, _)) => mse < *best_mse,
            };
            if better {
                best = Some((alpha, mse, w));
            }
        }

        let (alpha, mse, w) = best.ok_or_else(|| {
            PricingError::Configuration("no regularization candidates".to_string())
        })?;
        debug!(alpha, mse, "selected ridge strength");

        Ok(RidgeRegression {
            alphas: self.alphas.clone(),
            cross_validation: self.cross_validation,
            params: RidgeParams {
                coefficients: w.to_vec(),
                alpha,
                cv_scores,
            },
            _state: PhantomData,
        })
    }
}

impl RidgeRegression<Fitted> {
    pub fn coefficients(&self) -> &[f64] {
        &self.params.coefficients
    }

    /// The chosen regularization strength.
    pub fn alpha(&self) -> f64 {
        self.params.alpha
    }

    /// `(alpha, cross-validated MSE)` per candidate.
    pub fn cv_scores(&self) -> &[(f64, f64)] {
        &self.params.cv_scores
    }

    pub fn n_features(&self) -> usize {
        self.params.coefficients.len()
    }

    /// Centered prediction for one standardized row.
    pub fn predict_row(&self, row: &Array1<f64>) -> Result<f64> {
        self.predict(row)
    }

    fn check_width(&self, cols: usize) -> Result<()> {
        if cols != self.n_features() {
            return Err(PricingError::Schema(format!(
                "model expects {} features, got {}",
                self.n_features(),
                cols
            )));
        }
        Ok(())
    }
}

impl InferenceModel for RidgeRegression<Fitted> {
    type InputSingle = Array1<f64>;
    type OutputSingle = f64;
    type InputBatch = Array2<f64>;
    type OutputBatch = Array1<f64>;
    type ParamsRepr = RidgeParams;

    fn predict(&self, input: &Self::InputSingle) -> Result<Self::OutputSingle> {
        self.check_width(input.len())?;
        Ok(input
            .iter()
            .zip(&self.params.coefficients)
            .map(|(x, w)| x * w)
            .sum::<f64>())
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch> {
        self.check_width(input.ncols())?;
        let w = Array1::from(self.params.coefficients.clone());
        Ok(input.dot(&w))
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        self.params.clone()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self> {
        if params.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(PricingError::Serialization(
                "ridge coefficients must be finite".to_string(),
            ));
        }
        Ok(Self {
            alphas: params.cv_scores.iter().map(|&(a, _)| a).collect(),
            cross_validation: CrossValidation::default(),
            params,
            _state: PhantomData,
        })
    }
}

fn validate_alphas(alphas: &[f64]) -> Result<()> {
    if alphas.is_empty() {
        return Err(PricingError::Configuration(
            "at least one regularization candidate is required".to_string(),
        ));
    }
    if let Some(bad) = alphas.iter().find(|a| !(a.is_finite() && **a > 0.0)) {
        return Err(PricingError::Configuration(format!(
            "regularization strength must be finite and positive, got {}",
            bad
        )));
    }
    Ok(())
}

fn factorise(xtx: &Array2<f64>, alpha: f64) -> Result<Array2<f64>> {
    let mut a = xtx.clone();
    a.diag_mut().mapv_inplace(|d| d + alpha);
    cholesky(&a).ok_or_else(|| {
        PricingError::Configuration(format!(
            "ridge system with alpha {} is not positive definite",
            alpha
        ))
    })
}

fn loo_mse(x: &Array2<f64>, y: &Array1<f64>, l: &Array2<f64>, w: &Array1<f64>) -> f64 {
    let residuals = y - &x.dot(w);
    let total: f64 = x
        .axis_iter(Axis(0))
        .zip(residuals.iter())
        .map(|(row, &r)| {
            let z = solve_lower(l, row);
            let leverage = z.dot(&z);
            let e = r / (1.0 - leverage).max(f64::EPSILON);
            e * e
        })
        .sum();
    total / x.nrows() as f64
}

/// Contiguous folds; the first `n % k` folds get one extra row.
fn fold_bounds(n: usize, k: usize) -> Vec<(usize, usize)> {
    let base = n / k;
    let extra = n % k;
    let mut bounds = Vec::with_capacity(k);
    let mut start = 0;
    for fold in 0..k {
        let len = base + usize::from(fold < extra);
        bounds.push((start, start + len));
        start += len;
    }
    bounds
}

fn kfold_mse(x: &Array2<f64>, y: &Array1<f64>, alpha: f64, k: usize) -> Result<f64> {
    let n = x.nrows();
    let mut total = 0.0;
    for (start, end) in fold_bounds(n, k) {
        let train: Vec<usize> = (0..start).chain(end..n).collect();
        let x_train = x.select(Axis(0), &train);
        let y_train = y.select(Axis(0), &train);

        let l = factorise(&x_train.t().dot(&x_train), alpha)?;
        let w = cholesky_solve(&l, x_train.t().dot(&y_train).view());

        for i in start..end {
            let e = y[i] - x.row(i).dot(&w);
            total += e * e;
        }
    }
    Ok(total / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ndarray::array;

    fn sample() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [-1.5, 0.2],
            [-0.5, -1.0],
            [0.0, 0.4],
            [0.5, 1.1],
            [1.5, -0.7]
        ];
        let y = array![-3.1, -0.8, 0.3, 1.4, 2.2];
        (x, y)
    }

    /// Leave-one-out by brute force: refit without each row.
    fn brute_force_loo(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> f64 {
        let n = x.nrows();
        let mut total = 0.0;
        for i in 0..n {
            let keep: Vec<usize> = (0..n).filter(|&j| j != i).collect();
            let xt = x.select(Axis(0), &keep);
            let yt = y.select(Axis(0), &keep);
            let l = factorise(&xt.t().dot(&xt), alpha).unwrap();
            let w = cholesky_solve(&l, xt.t().dot(&yt).view());
            let e = y[i] - x.row(i).dot(&w);
            total += e * e;
        }
        total / n as f64
    }

    #[test]
    fn test_closed_form_loo_matches_refits() {
        let (x, y) = sample();
        let model = RidgeRegression::new(vec![0.1, 1.0, 10.0], CrossValidation::LeaveOneOut)
            .fit(&x, &y)
            .unwrap();
        for &(alpha, mse) in model.cv_scores() {
            let expected = brute_force_loo(&x, &y, alpha);
            assert!(
                (mse - expected).abs() < 1e-9 * expected.max(1.0),
                "alpha {}: {} vs {}",
                alpha,
                mse,
                expected
            );
        }
    }

    #[test]
    fn test_selects_minimum_score() {
        let (x, y) = sample();
        let model = RidgeRegression::default().fit(&x, &y).unwrap();
        let best = model
            .cv_scores()
            .iter()
            .cloned()
            .fold(f64::INFINITY, |acc, (_, s)| acc.min(s));
        let chosen = model
            .cv_scores()
            .iter()
            .find(|(a, _)| *a == model.alpha())
            .unwrap()
            .1;
        assert_eq!(chosen, best);
        assert_eq!(model.cv_scores().len(), 3);
    }

    #[test]
    fn test_ties_keep_earliest_candidate() {
        let (x, y) = sample();
        let model = RidgeRegression::new(vec![1.0, 1.0], CrossValidation::LeaveOneOut)
            .fit(&x, &y)
            .unwrap();
        assert_eq!(model.alpha(), 1.0);
        assert_eq!(model.cv_scores()[0].1, model.cv_scores()[1].1);
    }

    #[test]
    fn test_coefficients_solve_normal_equations() {
        let (x, y) = sample();
        let model = RidgeRegression::new(vec![0.5], CrossValidation::LeaveOneOut)
            .fit(&x, &y)
            .unwrap();
        let w = Array1::from(model.coefficients().to_vec());
        let lhs = x.t().dot(&x).dot(&w) + &(&w * 0.5);
        let rhs = x.t().dot(&y);
        for (a, b) in lhs.iter().zip(rhs.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_larger_alpha_shrinks_coefficients() {
        let (x, y) = sample();
        let norm = |alpha: f64| {
            let m = RidgeRegression::new(vec![alpha], CrossValidation::LeaveOneOut)
                .fit(&x, &y)
                .unwrap();
            m.coefficients().iter().map(|w| w * w).sum::<f64>()
        };
        assert!(norm(100.0) < norm(0.1));
    }

    #[test]
    fn test_kfold_scores() {
        let (x, y) = sample();
        let model = RidgeRegression::new(vec![0.1, 10.0], CrossValidation::KFold(5))
            .fit(&x, &y)
            .unwrap();
        // 5 folds over 5 rows is leave-one-out.
        for &(alpha, mse) in model.cv_scores() {
            assert!((mse - brute_force_loo(&x, &y, alpha)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fold_bounds() {
        assert_eq!(fold_bounds(7, 3), vec![(0, 3), (3, 5), (5, 7)]);
        assert_eq!(fold_bounds(4, 2), vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = sample();
        let a = RidgeRegression::default().fit(&x, &y).unwrap();
        let b = RidgeRegression::default().fit(&x, &y).unwrap();
        assert_eq!(a.extract_params(), b.extract_params());
    }

    #[test]
    fn test_invalid_configuration() {
        let (x, y) = sample();
        let err = RidgeRegression::new(vec![], CrossValidation::LeaveOneOut)
            .fit(&x, &y)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let err = RidgeRegression::new(vec![-1.0], CrossValidation::LeaveOneOut)
            .fit(&x, &y)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let err = RidgeRegression::new(vec![1.0], CrossValidation::KFold(9))
            .fit(&x, &y)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_too_few_rows_and_mismatched_response() {
        let err = RidgeRegression::default()
            .fit(&array![[1.0]], &array![1.0])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        let (x, _) = sample();
        let err = RidgeRegression::default().fit(&x, &array![1.0, 2.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_predict_row_and_batch_agree() {
        let (x, y) = sample();
        let model = RidgeRegression::default().fit(&x, &y).unwrap();
        let batch = model.predict_batch(&x).unwrap();
        for (i, row) in x.axis_iter(Axis(0)).enumerate() {
            let single = model.predict_row(&row.to_owned()).unwrap();
            assert!((single - batch[i]).abs() < 1e-12);
        }
        assert_eq!(
            model.predict(&array![1.0]).unwrap_err().kind(),
            ErrorKind::Schema
        );
    }

    #[test]
    fn test_params_roundtrip_and_file() {
        let (x, y) = sample();
        let model = RidgeRegression::default().fit(&x, &y).unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ridge.bin");
        model.save_to_file(&path).unwrap();
        let loaded = RidgeModel::load_from_file(&path).unwrap();

        assert_eq!(loaded.extract_params(), model.extract_params());
        assert_eq!(loaded.alpha(), model.alpha());
    }
}
