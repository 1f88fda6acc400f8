//! Exponential distribution parameterized by its log-scale.
//!
//! The boosting loop works on an unconstrained natural parameter `θ = ln(scale)`.
//! `Exponential` maps a `1 × n_samples` parameter matrix to one Exponential
//! primitive per sample (`statrs::distribution::Exp` with `rate = 1 / scale`)
//! and exposes the handful of methods the scoring rules need.
//!
//! Anything not exposed here is reported as absent via [`Exponential::attr`]
//! rather than forwarded to the primitive.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{Continuous, ContinuousCDF, Exp};

use crate::domain::ScoreKind;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Exponential {
    params: DMatrix<f64>,
    scale: DVector<f64>,
    /// `None` where the scale is not a valid rate (overflow, NaN); those rows evaluate to NaN.
    dist: Vec<Option<Exp>>,
}

impl Exponential {
    /// Number of natural parameters (`ln(scale)`).
    pub const N_PARAMS: usize = 1;

    /// Scoring rules implemented for right-censored observations.
    pub const CENSORED_SCORES: [ScoreKind; 2] = [ScoreKind::Log, ScoreKind::Crps];

    /// Build from an `N_PARAMS × n_samples` parameter matrix.
    ///
    /// Extra rows are ignored; only row 0 (`ln(scale)`) is read. Parameter
    /// values are not validated: a sample whose scale overflows or is NaN
    /// produces NaN from every per-sample method and score.
    pub fn from_params(params: &DMatrix<f64>) -> Result<Self, AppError> {
        if params.nrows() < Self::N_PARAMS {
            return Err(AppError::input(format!(
                "Exponential expects {} parameter row(s), got {}.",
                Self::N_PARAMS,
                params.nrows()
            )));
        }

        let scale = DVector::from_iterator(params.ncols(), params.row(0).iter().map(|v| v.exp()));
        let dist = scale.iter().map(|&s| Exp::new(1.0 / s).ok()).collect();

        Ok(Self {
            params: params.clone(),
            scale,
            dist,
        })
    }

    /// Build from per-sample log-scales (a `[1]` parameter vector is one sample).
    pub fn from_log_scale(log_scale: &[f64]) -> Result<Self, AppError> {
        Self::from_params(&DMatrix::from_row_slice(1, log_scale.len(), log_scale))
    }

    /// The same log-scale repeated for `n` samples.
    pub fn constant(log_scale: f64, n: usize) -> Result<Self, AppError> {
        Self::from_params(&DMatrix::from_element(1, n, log_scale))
    }

    /// Initial parameters from raw times.
    ///
    /// Uses the maximum-likelihood exponential fit with location and scale and
    /// returns `[ln(loc + scale)]`, i.e. the log of the sample mean. Censoring
    /// flags are not consulted.
    pub fn fit(y: &[f64]) -> Result<DVector<f64>, AppError> {
        let (loc, scale) = fit_loc_scale(y)?;
        Ok(DVector::from_element(1, (loc + scale).ln()))
    }

    pub fn n_samples(&self) -> usize {
        self.scale.len()
    }

    pub fn params_matrix(&self) -> &DMatrix<f64> {
        &self.params
    }

    pub fn scale(&self) -> &DVector<f64> {
        &self.scale
    }

    /// Named parameters.
    pub fn params(&self) -> BTreeMap<&'static str, DVector<f64>> {
        BTreeMap::from([("scale", self.scale.clone())])
    }

    /// Point prediction (the mean, equal to the scale).
    pub fn predict(&self) -> DVector<f64> {
        self.scale.clone()
    }

    pub fn mean(&self) -> DVector<f64> {
        self.scale.clone()
    }

    pub fn var(&self) -> DVector<f64> {
        self.scale.map(|s| s * s)
    }

    /// Named lookup of derived quantities; `None` for anything not defined.
    pub fn attr(&self, name: &str) -> Option<DVector<f64>> {
        match name {
            "scale" | "mean" => Some(self.mean()),
            "var" => Some(self.var()),
            "std" => Some(self.scale.clone()),
            "rate" => Some(self.scale.map(|s| 1.0 / s)),
            _ => None,
        }
    }

    /// Per-sample CDF at `t[i]`.
    ///
    /// `t` must hold one value per sample.
    pub fn cdf(&self, t: &[f64]) -> Result<DVector<f64>, AppError> {
        self.zip_map(t, |d, x| d.cdf(x))
    }

    /// Per-sample survival function `1 - CDF` at `t[i]`.
    pub fn sf(&self, t: &[f64]) -> Result<DVector<f64>, AppError> {
        self.zip_map(t, |d, x| d.sf(x))
    }

    pub fn pdf(&self, t: &[f64]) -> Result<DVector<f64>, AppError> {
        self.zip_map(t, |d, x| d.pdf(x))
    }

    pub fn logpdf(&self, t: &[f64]) -> Result<DVector<f64>, AppError> {
        self.zip_map(t, |d, x| d.ln_pdf(x))
    }

    /// Per-sample quantile at probability `q[i]`; NaN outside `[0, 1]`.
    pub fn ppf(&self, q: &[f64]) -> Result<DVector<f64>, AppError> {
        self.zip_map(q, |d, p| {
            if (0.0..=1.0).contains(&p) {
                d.inverse_cdf(p)
            } else {
                f64::NAN
            }
        })
    }

    fn zip_map<F>(&self, x: &[f64], f: F) -> Result<DVector<f64>, AppError>
    where
        F: Fn(&Exp, f64) -> f64,
    {
        if x.len() != self.dist.len() {
            return Err(AppError::input(format!(
                "Expected {} value(s), one per sample, got {}.",
                self.dist.len(),
                x.len()
            )));
        }
        Ok(DVector::from_iterator(
            x.len(),
            self.dist.iter().zip(x).map(|(d, &v)| match d {
                Some(d) => f(d, v),
                None => f64::NAN,
            }),
        ))
    }
}

/// Maximum-likelihood `(loc, scale)` for a shifted exponential.
///
/// `loc = min(y)` and `scale = mean(y) - loc`.
pub fn fit_loc_scale(y: &[f64]) -> Result<(f64, f64), AppError> {
    if y.is_empty() {
        return Err(AppError::no_data("Cannot fit an exponential to an empty sample."));
    }
    let loc = y.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    Ok((loc, mean - loc))
}
