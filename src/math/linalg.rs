//! Per-sample metric solves for natural gradients.
//!
//! The natural gradient for sample `i` is the solution `g` of
//!
//! ```text
//! M_i g = ∇_i
//! ```
//!
//! where `M_i` is the `n_params × n_params` metric (Fisher information for the
//! log score, the CRPS-induced metric for CRPS). For the Exponential family the
//! system is 1×1, but the solve is written for any square metric so that the
//! scoring contract does not depend on `n_params`.

use nalgebra::{DMatrix, DVector};

/// Solve `metric · x = grad` using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_metric(metric: &DMatrix<f64>, grad: &DVector<f64>) -> Option<DVector<f64>> {
    if !metric.is_square() || metric.nrows() != grad.len() {
        return None;
    }

    let svd = metric.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(x) = svd.solve(grad, tol) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}
