//! Reporting utilities: per-row score evaluation and formatted terminal output.

use crate::dist::Exponential;
use crate::domain::{ScoreKind, ScoreRow, SurvivalData};
use crate::error::AppError;
use crate::scores::CensoredScore;

pub mod format;

pub use format::*;

/// Evaluate score, derivative, and metric for every row at a shared scale.
pub fn compute_score_rows(
    data: &SurvivalData,
    kind: ScoreKind,
    log_scale: f64,
) -> Result<Vec<ScoreRow>, AppError> {
    let dist = Exponential::constant(log_scale, data.len())?;
    let score = kind.score(&dist, data)?;
    let d_score = kind.d_score(&dist, data)?;
    let metric = kind.metric(&dist);

    let mut out = Vec::with_capacity(data.len());
    for (i, (event, time)) in data.rows().enumerate() {
        out.push(ScoreRow {
            event,
            time,
            scale: dist.scale()[i],
            score: score[i],
            d_score: d_score[(i, 0)],
            metric: metric[i][(0, 0)],
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rows_line_up_with_the_triplet() {
        let data = SurvivalData::new(vec![1.0, 0.0], vec![2.0, 3.0]).unwrap();
        let rows = compute_score_rows(&data, ScoreKind::Crps, 2.0_f64.ln()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].event, 0.0);
        assert!((rows[0].scale - 2.0).abs() < 1e-12);
        assert!((rows[0].metric - 1.0).abs() < 1e-12);

        let log_rows = compute_score_rows(&data, ScoreKind::Log, 0.0).unwrap();
        assert!((log_rows[0].score - 2.0).abs() < 1e-12);
        assert!((log_rows[0].d_score - -1.0).abs() < 1e-12);
        assert!((log_rows[1].d_score - -3.0).abs() < 1e-12);
    }
}
