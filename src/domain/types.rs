//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during scoring and calibration
//! - exported to JSON/CSV
//! - reloaded later for reporting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which scoring rule to use for censored observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    /// Negative log-likelihood with right-censoring.
    Log,
    /// Continuous ranked probability score with right-censoring.
    Crps,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 2] = [ScoreKind::Log, ScoreKind::Crps];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ScoreKind::Log => "LogScore",
            ScoreKind::Crps => "CRPScore",
        }
    }
}

/// Right-censored time-to-event observations.
///
/// `event[i] == 1.0` marks an observed event at `time[i]`; `0.0` marks a
/// censoring time (the event happens at some unknown time after `time[i]`).
/// Values are not validated: an out-of-range event flag or a negative time
/// simply produces NaN/invalid scores downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalData {
    event: Vec<f64>,
    time: Vec<f64>,
}

impl SurvivalData {
    /// Build from parallel columns.
    ///
    /// Fails only when the columns have different lengths.
    pub fn new(event: Vec<f64>, time: Vec<f64>) -> Result<Self, AppError> {
        if event.len() != time.len() {
            return Err(AppError::input(format!(
                "Event and Time must have equal length (event={}, time={}).",
                event.len(),
                time.len()
            )));
        }
        Ok(Self { event, time })
    }

    /// All-uncensored observations.
    pub fn uncensored(time: Vec<f64>) -> Self {
        let event = vec![1.0; time.len()];
        Self { event, time }
    }

    pub fn event(&self) -> &[f64] {
        &self.event
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Iterate `(event, time)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.event.iter().copied().zip(self.time.iter().copied())
    }

    /// Summary statistics, or `None` when there are no finite rows.
    pub fn stats(&self) -> Option<DatasetStats> {
        let mut time_min = f64::INFINITY;
        let mut time_max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut n_events = 0usize;

        for (e, t) in self.rows() {
            time_min = time_min.min(t);
            time_max = time_max.max(t);
            sum += t;
            if e == 1.0 {
                n_events += 1;
            }
        }

        if !time_min.is_finite() || !time_max.is_finite() {
            return None;
        }

        let n = self.len();
        Some(DatasetStats {
            n_rows: n,
            n_events,
            n_censored: n - n_events,
            time_min,
            time_max,
            time_mean: sum / n as f64,
        })
    }
}

/// Dataset summary used in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_rows: usize,
    pub n_events: usize,
    pub n_censored: usize,
    pub time_min: f64,
    pub time_max: f64,
    pub time_mean: f64,
}

impl DatasetStats {
    pub fn censored_fraction(&self) -> f64 {
        if self.n_rows == 0 {
            return 0.0;
        }
        self.n_censored as f64 / self.n_rows as f64
    }
}

/// Where observations come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Load `event,time` rows from a CSV file.
    Csv(PathBuf),
    /// Generate synthetic censored exponential data.
    Synthetic(SyntheticConfig),
}

/// Synthetic data settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub n: usize,
    /// True scale (mean) of event times.
    pub scale: f64,
    /// Scale of independent censoring times; `None` disables censoring.
    pub censor_scale: Option<f64>,
    pub seed: u64,
}

/// Per-row evaluation of a scoring rule at a fixed scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub event: f64,
    pub time: f64,
    pub scale: f64,
    pub score: f64,
    pub d_score: f64,
    pub metric: f64,
}

/// One point on a score profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub scale: f64,
    pub total_score: f64,
}

/// Calibration settings for the intercept-only natural-gradient refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrateOptions {
    pub score: ScoreKind,
    pub learning_rate: f64,
    pub max_iters: usize,
    /// Stop when the absolute parameter step falls below this value.
    pub tol: f64,
}

impl Default for CalibrateOptions {
    fn default() -> Self {
        Self {
            score: ScoreKind::Log,
            learning_rate: 1.0,
            max_iters: 200,
            tol: 1e-8,
        }
    }
}

/// Output of a calibration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub score: ScoreKind,
    /// Log-scale from the censoring-blind `Exponential::fit`.
    pub initial_log_scale: f64,
    pub initial_total_score: f64,
    /// Log-scale after natural-gradient refinement.
    pub log_scale: f64,
    pub total_score: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl CalibrationResult {
    pub fn initial_scale(&self) -> f64 {
        self.initial_log_scale.exp()
    }

    pub fn scale(&self) -> f64 {
        self.log_scale.exp()
    }
}

/// A saved calibration file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub stats: DatasetStats,
    pub calibration: CalibrationResult,
}
