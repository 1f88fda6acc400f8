//! Intercept-only natural-gradient calibration.
//!
//! Starting from the censoring-blind `Exponential::fit`, repeatedly apply
//!
//! ```text
//! θ ← θ - lr · mean_i(M_i⁻¹ ∇_i)
//! ```
//!
//! with every sample sharing the same `θ = ln(scale)`. This is the first step a
//! natural-gradient boosting loop takes before any learner is fitted, and for
//! the log score it converges to the censored maximum-likelihood scale
//! `Σ T / Σ E`.

use tracing::{debug, warn};

use crate::dist::Exponential;
use crate::domain::{CalibrateOptions, CalibrationResult, SurvivalData};
use crate::error::AppError;
use crate::scores::CensoredScore;

pub fn calibrate(data: &SurvivalData, opts: &CalibrateOptions) -> Result<CalibrationResult, AppError> {
    if data.is_empty() {
        return Err(AppError::no_data("No observations to calibrate on."));
    }
    if !(opts.learning_rate.is_finite() && opts.learning_rate > 0.0) {
        return Err(AppError::input("Learning rate must be finite and > 0."));
    }
    if !(opts.tol.is_finite() && opts.tol > 0.0) {
        return Err(AppError::input("Tolerance must be finite and > 0."));
    }

    let n = data.len();
    let initial_log_scale = Exponential::fit(data.time())?[0];
    let initial_total_score = total_score_at(data, opts, initial_log_scale)?;

    let mut theta = initial_log_scale;
    let mut iterations = 0usize;
    let mut converged = false;

    while iterations < opts.max_iters {
        let dist = Exponential::constant(theta, n)?;
        let grad = opts.score.grad(&dist, data, true)?;
        let step = opts.learning_rate * grad.column(0).mean();
        if !step.is_finite() {
            return Err(AppError::numeric(format!(
                "Non-finite natural gradient at ln(scale)={theta}."
            )));
        }

        theta -= step;
        iterations += 1;
        debug!(iteration = iterations, log_scale = theta, step, "calibration step");

        if step.abs() < opts.tol {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            score = opts.score.display_name(),
            iterations,
            log_scale = theta,
            "calibration did not converge"
        );
    }

    let total_score = total_score_at(data, opts, theta)?;

    Ok(CalibrationResult {
        score: opts.score,
        initial_log_scale,
        initial_total_score,
        log_scale: theta,
        total_score,
        iterations,
        converged,
    })
}

fn total_score_at(data: &SurvivalData, opts: &CalibrateOptions, theta: f64) -> Result<f64, AppError> {
    let dist = Exponential::constant(theta, data.len())?;
    opts.score.total_score(&dist, data, None)
}
