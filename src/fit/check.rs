//! Finite-difference validation of `d_score`.
//!
//! For each row the analytic derivative is compared against a central
//! difference of that row's score in `ln(scale)`.

use rayon::prelude::*;

use crate::dist::Exponential;
use crate::domain::{ScoreKind, SurvivalData};
use crate::error::AppError;
use crate::math::try_central_diff;
use crate::scores::CensoredScore;

#[derive(Debug, Clone, PartialEq)]
pub struct GradientCheck {
    pub score: ScoreKind,
    pub log_scale: f64,
    pub step: f64,
    /// `(analytic, finite_difference)` per row.
    pub rows: Vec<(f64, f64)>,
    pub max_abs_error: f64,
    /// Row index of `max_abs_error`.
    pub worst_row: usize,
}

impl GradientCheck {
    /// NaN errors never pass.
    pub fn passes(&self, tol: f64) -> bool {
        self.max_abs_error <= tol
    }
}

pub fn gradient_check(
    data: &SurvivalData,
    kind: ScoreKind,
    log_scale: f64,
    step: f64,
) -> Result<GradientCheck, AppError> {
    if data.is_empty() {
        return Err(AppError::no_data("No observations to check."));
    }
    if !(step.is_finite() && step > 0.0) {
        return Err(AppError::input("Finite-difference step must be finite and > 0."));
    }

    let dist = Exponential::constant(log_scale, data.len())?;
    let analytic = kind.d_score(&dist, data)?;

    let fd = data
        .rows()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|&(e, t)| -> Result<f64, AppError> {
            let row = SurvivalData::new(vec![e], vec![t])?;
            try_central_diff(
                |theta| -> Result<f64, AppError> {
                    let dist = Exponential::from_log_scale(&[theta])?;
                    Ok(kind.score(&dist, &row)?[0])
                },
                log_scale,
                step,
            )
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let rows: Vec<(f64, f64)> = analytic.column(0).iter().copied().zip(fd).collect();

    let mut max_abs_error = 0.0;
    let mut worst_row = 0;
    for (i, (a, f)) in rows.iter().enumerate() {
        let err = (a - f).abs();
        if err.is_nan() {
            max_abs_error = f64::NAN;
            worst_row = i;
            break;
        }
        if err > max_abs_error {
            max_abs_error = err;
            worst_row = i;
        }
    }

    Ok(GradientCheck {
        score: kind,
        log_scale,
        step,
        rows,
        max_abs_error,
        worst_row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_sample;
    use crate::domain::SyntheticConfig;

    #[test]
    fn both_rules_pass_on_synthetic_data() {
        let data = generate_sample(&SyntheticConfig {
            n: 200,
            scale: 3.0,
            censor_scale: Some(6.0),
            seed: 11,
        })
        .unwrap();

        for kind in ScoreKind::ALL {
            let check = gradient_check(&data, kind, 3.0_f64.ln(), 1e-5).unwrap();
            assert_eq!(check.rows.len(), 200);
            assert!(
                check.passes(1e-4),
                "{kind:?}: max error {} at row {}",
                check.max_abs_error,
                check.worst_row
            );
        }
    }

    #[test]
    fn rejects_bad_step() {
        let data = SurvivalData::uncensored(vec![1.0]);
        assert!(gradient_check(&data, ScoreKind::Log, 0.0, 0.0).is_err());
    }
}
