//! Total-score profile over a grid of constant scales.

use rayon::prelude::*;

use crate::dist::Exponential;
use crate::domain::{ProfilePoint, ScoreKind, SurvivalData};
use crate::error::AppError;
use crate::fit::grid::log_space;
use crate::scores::CensoredScore;

/// A score profile plus its minimizing grid point.
#[derive(Debug, Clone)]
pub struct ScoreProfile {
    pub score: ScoreKind,
    pub points: Vec<ProfilePoint>,
    pub best: ProfilePoint,
}

/// Evaluate the mean score at each grid scale (parallel).
pub fn score_profile(
    data: &SurvivalData,
    kind: ScoreKind,
    scale_min: f64,
    scale_max: f64,
    steps: usize,
) -> Result<ScoreProfile, AppError> {
    if data.is_empty() {
        return Err(AppError::no_data("No observations to profile."));
    }
    let grid = log_space(scale_min, scale_max, steps)?;

    let points = grid
        .par_iter()
        .map(|&scale| -> Result<ProfilePoint, AppError> {
            let dist = Exponential::constant(scale.ln(), data.len())?;
            let total_score = kind.total_score(&dist, data, None)?;
            Ok(ProfilePoint { scale, total_score })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    // Deterministic selection: minimum finite score, ties go to the smaller scale.
    let best = points
        .iter()
        .filter(|p| p.total_score.is_finite())
        .fold(None::<ProfilePoint>, |acc, p| match acc {
            Some(b) if b.total_score <= p.total_score => Some(b),
            _ => Some(*p),
        })
        .ok_or_else(|| AppError::numeric("Score profile has no finite values."))?;

    Ok(ScoreProfile {
        score: kind,
        points,
        best,
    })
}
