//! Scoring rules for right-censored observations.
//!
//! A scoring rule supplies the triplet a natural-gradient boosting loop needs:
//!
//! - `score`: per-sample loss (lower is better)
//! - `d_score`: derivative of the loss w.r.t. the natural parameters, `[N, n_params]`
//! - `metric`: per-sample Riemannian metric, `N` matrices of `n_params × n_params`
//!
//! `grad` and `total_score` are derived from the triplet.
//!
//! Rules are selected at configuration time through [`ScoreKind`], which
//! dispatches to [`LogScore`] or [`CrpScore`].

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::dist::Exponential;
use crate::domain::{ScoreKind, SurvivalData};
use crate::error::AppError;
use crate::math::solve_metric;

pub mod crps;
pub mod log;

pub use crps::CrpScore;
pub use log::LogScore;

pub trait CensoredScore {
    /// Per-sample score, length `N`.
    fn score(&self, dist: &Exponential, y: &SurvivalData) -> Result<DVector<f64>, AppError>;

    /// Per-sample derivative w.r.t. `ln(scale)`, shape `[N, 1]`.
    fn d_score(&self, dist: &Exponential, y: &SurvivalData) -> Result<DMatrix<f64>, AppError>;

    /// Per-sample `1 × 1` metric.
    fn metric(&self, dist: &Exponential) -> Vec<DMatrix<f64>>;

    /// Gradient of the score, optionally preconditioned by the metric.
    ///
    /// With `natural = true` each row solves `metric_i · g_i = d_score_i`.
    fn grad(
        &self,
        dist: &Exponential,
        y: &SurvivalData,
        natural: bool,
    ) -> Result<DMatrix<f64>, AppError> {
        let d = self.d_score(dist, y)?;
        if !natural {
            return Ok(d);
        }

        let metric = self.metric(dist);
        let n_params = d.ncols();
        let rows: Vec<DVector<f64>> = (0..d.nrows())
            .into_par_iter()
            .map(|i| {
                solve_metric(&metric[i], &d.row(i).transpose()).ok_or_else(|| {
                    AppError::numeric(format!("Singular metric at sample {i}."))
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(DMatrix::from_fn(rows.len(), n_params, |i, j| rows[i][j]))
    }

    /// Mean score, weighted by `weights` when given.
    fn total_score(
        &self,
        dist: &Exponential,
        y: &SurvivalData,
        weights: Option<&[f64]>,
    ) -> Result<f64, AppError> {
        let s = self.score(dist, y)?;
        match weights {
            None => {
                if s.is_empty() {
                    return Err(AppError::no_data("Cannot average an empty score vector."));
                }
                Ok(s.mean())
            }
            Some(w) => {
                if w.len() != s.len() {
                    return Err(AppError::input(format!(
                        "Sample weights must match the number of observations (weights={}, rows={}).",
                        w.len(),
                        s.len()
                    )));
                }
                let w_sum: f64 = w.iter().sum();
                if w_sum <= 0.0 || !w_sum.is_finite() {
                    return Err(AppError::input("Sample weights must have a positive, finite sum."));
                }
                Ok(s.iter().zip(w).map(|(v, wi)| v * wi).sum::<f64>() / w_sum)
            }
        }
    }
}

impl CensoredScore for ScoreKind {
    fn score(&self, dist: &Exponential, y: &SurvivalData) -> Result<DVector<f64>, AppError> {
        match self {
            ScoreKind::Log => LogScore.score(dist, y),
            ScoreKind::Crps => CrpScore.score(dist, y),
        }
    }

    fn d_score(&self, dist: &Exponential, y: &SurvivalData) -> Result<DMatrix<f64>, AppError> {
        match self {
            ScoreKind::Log => LogScore.d_score(dist, y),
            ScoreKind::Crps => CrpScore.d_score(dist, y),
        }
    }

    fn metric(&self, dist: &Exponential) -> Vec<DMatrix<f64>> {
        match self {
            ScoreKind::Log => LogScore.metric(dist),
            ScoreKind::Crps => CrpScore.metric(dist),
        }
    }
}

/// Observations and distribution must describe the same samples.
pub(crate) fn ensure_aligned(dist: &Exponential, y: &SurvivalData) -> Result<(), AppError> {
    if dist.n_samples() != y.len() {
        return Err(AppError::input(format!(
            "Distribution has {} sample(s) but {} observation(s) were given.",
            dist.n_samples(),
            y.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> SurvivalData {
        SurvivalData::new(vec![1.0, 0.0, 1.0], vec![0.5, 2.0, 4.0]).unwrap()
    }

    #[test]
    fn log_natural_gradient_equals_d_score() {
        let dist = Exponential::from_log_scale(&[0.1, 0.7, 1.5]).unwrap();
        let y = data();
        let d = ScoreKind::Log.d_score(&dist, &y).unwrap();
        let g = ScoreKind::Log.grad(&dist, &y, true).unwrap();
        assert_eq!(g.shape(), (3, 1));
        for i in 0..3 {
            assert!((g[(i, 0)] - d[(i, 0)]).abs() < 1e-12);
        }
    }

    #[test]
    fn crps_natural_gradient_divides_by_half_scale() {
        let dist = Exponential::from_log_scale(&[0.1, 0.7, 1.5]).unwrap();
        let y = data();
        let d = ScoreKind::Crps.d_score(&dist, &y).unwrap();
        let g = ScoreKind::Crps.grad(&dist, &y, true).unwrap();
        for i in 0..3 {
            let expected = d[(i, 0)] / (0.5 * dist.scale()[i]);
            assert!((g[(i, 0)] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn plain_gradient_is_d_score() {
        let dist = Exponential::from_log_scale(&[0.0, 0.0, 0.0]).unwrap();
        let y = data();
        let d = ScoreKind::Crps.d_score(&dist, &y).unwrap();
        let g = ScoreKind::Crps.grad(&dist, &y, false).unwrap();
        assert_eq!(d, g);
    }

    #[test]
    fn total_score_weights() {
        let dist = Exponential::constant(0.0, 3).unwrap();
        let y = data();
        let s = ScoreKind::Log.score(&dist, &y).unwrap();

        let uniform = ScoreKind::Log.total_score(&dist, &y, None).unwrap();
        assert!((uniform - s.mean()).abs() < 1e-12);

        let weighted = ScoreKind::Log
            .total_score(&dist, &y, Some(&[1.0, 0.0, 1.0][..]))
            .unwrap();
        assert!((weighted - 0.5 * (s[0] + s[2])).abs() < 1e-12);

        assert!(ScoreKind::Log.total_score(&dist, &y, Some(&[1.0][..])).is_err());
    }

    #[test]
    fn diverged_rows_score_as_non_finite_without_failing_the_batch() {
        let dist = Exponential::from_log_scale(&[0.0, 710.0, f64::NAN]).unwrap();
        let y = SurvivalData::new(vec![1.0, 1.0, 0.0], vec![1.0, 1.0, 1.0]).unwrap();
        for kind in ScoreKind::ALL {
            let s = kind.score(&dist, &y).unwrap();
            assert!(s[0].is_finite(), "{kind:?}: {}", s[0]);
            assert!(!s[1].is_finite(), "{kind:?}: {}", s[1]);
            assert!(!s[2].is_finite(), "{kind:?}: {}", s[2]);
            assert_eq!(kind.d_score(&dist, &y).unwrap().nrows(), 3);
        }
    }

    #[test]
    fn misaligned_inputs_are_rejected() {
        let dist = Exponential::constant(0.0, 2).unwrap();
        let err = ScoreKind::Log.score(&dist, &data()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
