//! Read/write calibration JSON files.
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CalibrationResult, DatasetStats, FitFile};
use crate::error::AppError;

/// Write a calibration JSON file.
pub fn write_fit_json(
    path: &Path,
    calibration: &CalibrationResult,
    stats: &DatasetStats,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create fit JSON '{}': {e}", path.display())))?;

    let fit = FitFile {
        tool: "cexp".to_string(),
        generated_at: Utc::now(),
        stats: stats.clone(),
        calibration: calibration.clone(),
    };

    serde_json::to_writer_pretty(file, &fit)
        .map_err(|e| AppError::input(format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}

/// Read a calibration JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let fit: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid fit JSON: {e}")))?;
    Ok(fit)
}
