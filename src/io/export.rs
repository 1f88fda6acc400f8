//! CSV exports: per-row scores and raw observations.
//!
//! Both files are meant to be easy to consume in spreadsheets or downstream
//! scripts, and `write_survival_csv` output is readable by `load_survival_csv`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{ScoreRow, SurvivalData};
use crate::error::AppError;

/// Write per-row score evaluations.
pub fn write_scores_csv(path: &Path, rows: &[ScoreRow]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "event,time,scale,score,d_score,metric")
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        writeln!(
            file,
            "{},{:.10},{:.10},{:.10},{:.10},{:.10}",
            r.event, r.time, r.scale, r.score, r.d_score, r.metric
        )
        .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write observations as `event,time`.
pub fn write_survival_csv(path: &Path, data: &SurvivalData) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create data CSV '{}': {e}", path.display())))?;

    writeln!(file, "event,time")
        .map_err(|e| AppError::input(format!("Failed to write data CSV header: {e}")))?;

    for (event, time) in data.rows() {
        writeln!(file, "{event},{time:.10}")
            .map_err(|e| AppError::input(format!("Failed to write data CSV row: {e}")))?;
    }

    Ok(())
}
