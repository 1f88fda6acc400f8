//! Negative log-likelihood for right-censored exponential data.
//!
//! With `S = exp(θ)`:
//!
//! ```text
//! observed (E = 1):  -ln f(T; S)          = ln S + T/S
//! censored (E = 0):  -ln(1 - F(T; S) + ε) ≈ T/S
//! ```
//!
//! The Fisher information of `θ` is 1 for every sample.

use nalgebra::{DMatrix, DVector};

use crate::dist::Exponential;
use crate::domain::SurvivalData;
use crate::error::AppError;
use crate::scores::{CensoredScore, ensure_aligned};

/// Keeps the censored term finite once the survival probability underflows.
pub const EPS: f64 = 1e-10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogScore;

impl CensoredScore for LogScore {
    fn score(&self, dist: &Exponential, y: &SurvivalData) -> Result<DVector<f64>, AppError> {
        ensure_aligned(dist, y)?;
        let (e, t) = (y.event(), y.time());
        let cdf = dist.cdf(t)?;
        let logpdf = dist.logpdf(t)?;

        Ok(DVector::from_fn(y.len(), |i, _| {
            let cens = (1.0 - e[i]) * (1.0 - cdf[i] + EPS).ln();
            let uncens = e[i] * logpdf[i];
            -(cens + uncens)
        }))
    }

    fn d_score(&self, dist: &Exponential, y: &SurvivalData) -> Result<DMatrix<f64>, AppError> {
        ensure_aligned(dist, y)?;
        let (e, t) = (y.event(), y.time());
        let s = dist.scale();

        Ok(DMatrix::from_fn(y.len(), 1, |i, _| {
            let cens = (1.0 - e[i]) * t[i] / s[i];
            let uncens = e[i] * (t[i] / s[i] - 1.0);
            -(cens + uncens)
        }))
    }

    fn metric(&self, dist: &Exponential) -> Vec<DMatrix<f64>> {
        vec![DMatrix::from_element(1, 1, 1.0); dist.n_samples()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::central_diff;

    #[test]
    fn two_row_scenario() {
        // One observed event at 2.0, one censored at 3.0, both with scale 1.
        let dist = Exponential::from_log_scale(&[0.0, 0.0]).unwrap();
        let y = SurvivalData::new(vec![1.0, 0.0], vec![2.0, 3.0]).unwrap();
        let s = LogScore.score(&dist, &y).unwrap();

        assert!((s[0] - 2.0).abs() < 1e-12, "observed row: {}", s[0]);
        let expected = -((-3.0_f64).exp() + EPS).ln();
        assert!((s[1] - expected).abs() < 1e-12, "censored row: {}", s[1]);
        assert!((s[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn observed_rows_are_negative_log_pdf() {
        for &scale in &[0.3, 1.0, 2.5, 40.0] {
            for &t in &[0.0, 0.1, 1.0, 7.5] {
                let dist = Exponential::from_log_scale(&[f64::ln(scale)]).unwrap();
                let y = SurvivalData::new(vec![1.0], vec![t]).unwrap();
                let s = LogScore.score(&dist, &y).unwrap()[0];
                let expected = scale.ln() + t / scale;
                assert!(
                    (s - expected).abs() < 1e-10,
                    "scale={scale} t={t}: got {s}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn censored_rows_stay_finite_far_in_the_tail() {
        let dist = Exponential::from_log_scale(&[0.0, 0.0]).unwrap();
        let y = SurvivalData::new(vec![0.0, 0.0], vec![1e3, 1e6]).unwrap();
        let s = LogScore.score(&dist, &y).unwrap();
        for v in s.iter() {
            assert!(v.is_finite());
            assert!((v - (-EPS.ln())).abs() < 1e-6);
        }
    }

    #[test]
    fn d_score_is_column_and_matches_finite_difference() {
        let y = SurvivalData::new(vec![1.0, 0.0, 1.0, 0.0], vec![0.2, 1.5, 3.0, 0.7]).unwrap();
        let theta = [0.4, -0.3, 1.1, 0.0];
        let dist = Exponential::from_log_scale(&theta).unwrap();
        let d = LogScore.d_score(&dist, &y).unwrap();
        assert_eq!(d.shape(), (4, 1));

        for i in 0..4 {
            let row = SurvivalData::new(vec![y.event()[i]], vec![y.time()[i]]).unwrap();
            let f = |th: f64| {
                let d = Exponential::from_log_scale(&[th]).unwrap();
                LogScore.score(&d, &row).unwrap()[0]
            };
            let fd = central_diff(f, theta[i], 1e-5);
            assert!((fd - d[(i, 0)]).abs() < 1e-4, "row {i}: fd={fd} analytic={}", d[(i, 0)]);
        }
    }

    #[test]
    fn metric_is_unit_fisher_information() {
        let dist = Exponential::from_log_scale(&[-2.0, 0.0, 3.0]).unwrap();
        let m = LogScore.metric(&dist);
        assert_eq!(m.len(), 3);
        for mi in &m {
            assert_eq!(mi.shape(), (1, 1));
            assert_eq!(mi[(0, 0)], 1.0);
        }
    }
}
