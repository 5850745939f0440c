//! L2-regularized linear regression.
//!
//! Both scoring heads solve the same small problem:
//!
//! ```text
//! minimize ||y - Xw||^2 + alpha * ||w||^2
//! ```
//!
//! Implementation choices:
//! - Features and target are centered before solving, and the intercept
//!   is reconstructed afterwards, so the penalty never shrinks the
//!   intercept.
//! - The regularized normal equations `(XᵀX + alpha I) w = Xᵀy` are
//!   solved by Cholesky; with `alpha > 0` the system is positive
//!   definite, so this is the fast path.
//! - If Cholesky fails (alpha = 0 on collinear data), we fall back to an
//!   SVD solve at progressively looser tolerances. TF-IDF blocks can
//!   produce nearly collinear columns, so the fallback earns its keep.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;

/// A fitted ridge head: frozen weights + intercept.
///
/// `predict` is a pure function of the frozen parameters; no randomness,
/// no mutation.
#[derive(Debug, Clone)]
pub struct RidgeModel {
    weights: DVector<f64>,
    intercept: f64,
}

impl RidgeModel {
    /// Predict for a single feature vector.
    ///
    /// The caller guarantees `x.len()` equals the fitted width; both heads
    /// share one fitted feature union, so the geometry cannot drift.
    pub fn predict(&self, x: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), self.weights.len());
        let dot: f64 = self
            .weights
            .iter()
            .zip(x.iter())
            .map(|(w, v)| w * v)
            .sum();
        dot + self.intercept
    }

    pub fn weights(&self) -> &[f64] {
        self.weights.as_slice()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Fit a ridge regression head.
pub fn fit_ridge(x: &DMatrix<f64>, y: &DVector<f64>, alpha: f64) -> Result<RidgeModel, AppError> {
    let n = x.nrows();
    let p = x.ncols();
    if n == 0 || p == 0 {
        return Err(AppError::data("Ridge fit needs a non-empty design matrix."));
    }
    if y.len() != n {
        return Err(AppError::data(format!(
            "Ridge fit dimension mismatch: {} rows vs {} targets.",
            n,
            y.len()
        )));
    }
    if !(alpha.is_finite() && alpha >= 0.0) {
        return Err(AppError::usage("Ridge alpha must be finite and >= 0."));
    }
    if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
        return Err(AppError::numeric("Non-finite value in ridge fit inputs."));
    }

    // Center columns and target; the intercept absorbs the means.
    let col_means = DVector::from_fn(p, |j, _| x.column(j).mean());
    let y_mean = y.mean();

    let mut xc = x.clone();
    for j in 0..p {
        let m = col_means[j];
        for i in 0..n {
            xc[(i, j)] -= m;
        }
    }
    let yc = y.map(|v| v - y_mean);

    let mut gram = xc.transpose() * &xc;
    for j in 0..p {
        gram[(j, j)] += alpha;
    }
    let rhs = xc.transpose() * &yc;

    let weights = solve_spd(gram, &rhs)
        .ok_or_else(|| AppError::numeric("Ridge system is too ill-conditioned to solve."))?;

    let intercept = y_mean - col_means.dot(&weights);
    if !intercept.is_finite() {
        return Err(AppError::numeric("Ridge fit produced a non-finite intercept."));
    }

    Ok(RidgeModel { weights, intercept })
}

/// Solve a symmetric positive (semi-)definite system.
fn solve_spd(a: DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    if let Some(chol) = a.clone().cholesky() {
        let w = chol.solve(b);
        if w.iter().all(|v| v.is_finite()) {
            return Some(w);
        }
    }

    // Fallback for semi-definite systems: SVD solve, loosening the
    // tolerance until a finite solution is accepted.
    let svd = a.svd(true, true);
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(w) = svd.solve(b, tol) {
            if w.iter().all(|v| v.is_finite()) {
                return Some(w);
            }
        }
    }

    None
}
