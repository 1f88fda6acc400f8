//! Command-line parsing for the censored Exponential scoring tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! scoring/calibration code. Args convert into plain domain config structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{CalibrateOptions, DataSource, ScoreKind, SyntheticConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "cexp",
    version,
    about = "Censored Exponential scoring rules: scores, gradients, calibration"
)]
pub struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a synthetic censored sample and write it as `event,time` CSV.
    Simulate(SimulateArgs),
    /// Evaluate score, derivative, and metric per row at a fixed scale.
    Score(ScoreArgs),
    /// Compare analytic derivatives against finite differences.
    Check(CheckArgs),
    /// Evaluate the mean score over a log-spaced grid of scales.
    Profile(ProfileArgs),
    /// Refine the fitted scale by natural-gradient steps on the mean score.
    Calibrate(CalibrateArgs),
}

/// Where the observations come from: a CSV file or synthetic draws.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV with `event,time[,weight]` columns. Overrides the synthetic flags.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Number of synthetic observations.
    #[arg(short = 'n', long = "n", default_value_t = 500)]
    pub n: usize,

    /// True scale (mean event time) of synthetic data.
    #[arg(long, default_value_t = 5.0)]
    pub true_scale: f64,

    /// Scale of exponential censoring times (omit for no censoring).
    #[arg(long)]
    pub censor_scale: Option<f64>,

    /// Random seed for synthetic data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl DataArgs {
    pub fn source(&self) -> DataSource {
        match &self.csv {
            Some(path) => DataSource::Csv(path.clone()),
            None => DataSource::Synthetic(self.synthetic()),
        }
    }

    pub fn synthetic(&self) -> SyntheticConfig {
        SyntheticConfig {
            n: self.n,
            scale: self.true_scale,
            censor_scale: self.censor_scale,
            seed: self.seed,
        }
    }
}

/// Which scale to evaluate at.
///
/// Precedence: `--at-scale`, then `--from-fit`, then the fitted scale of the data.
#[derive(Debug, Args, Clone)]
pub struct ScaleArgs {
    /// Evaluate at this scale.
    #[arg(long)]
    pub at_scale: Option<f64>,

    /// Evaluate at the calibrated scale stored in a JSON written by `cexp calibrate --export-fit`.
    #[arg(long, value_name = "JSON", conflicts_with = "at_scale")]
    pub from_fit: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output CSV path.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub at: ScaleArgs,

    /// Scoring rule.
    #[arg(long, value_enum, default_value_t = ScoreKind::Log)]
    pub score: ScoreKind,

    /// Show the first N rows.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Export per-row results to CSV.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub at: ScaleArgs,

    /// Scoring rule (omit to check every rule).
    #[arg(long, value_enum)]
    pub score: Option<ScoreKind>,

    /// Finite-difference step in ln(scale).
    #[arg(long, default_value_t = 1e-5)]
    pub step: f64,

    /// Maximum allowed absolute error.
    #[arg(long, default_value_t = 1e-4)]
    pub tol: f64,
}

#[derive(Debug, Args, Clone)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Scoring rule.
    #[arg(long, value_enum, default_value_t = ScoreKind::Log)]
    pub score: ScoreKind,

    /// Smallest scale in the grid.
    #[arg(long, default_value_t = 0.1)]
    pub scale_min: f64,

    /// Largest scale in the grid.
    #[arg(long, default_value_t = 100.0)]
    pub scale_max: f64,

    /// Grid size.
    #[arg(long, default_value_t = 121)]
    pub steps: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct CalibrateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Scoring rule.
    #[arg(long, value_enum, default_value_t = ScoreKind::Log)]
    pub score: ScoreKind,

    /// Step multiplier on the mean natural gradient.
    #[arg(long, default_value_t = 1.0)]
    pub learning_rate: f64,

    /// Iteration cap.
    #[arg(long, default_value_t = 200)]
    pub max_iters: usize,

    /// Stop when |step| falls below this value.
    #[arg(long, default_value_t = 1e-8)]
    pub tol: f64,

    /// Write the calibration result to JSON.
    #[arg(long = "export-fit", value_name = "PATH")]
    pub export_fit: Option<PathBuf>,
}

impl CalibrateArgs {
    pub fn options(&self) -> CalibrateOptions {
        CalibrateOptions {
            score: self.score,
            learning_rate: self.learning_rate,
            max_iters: self.max_iters,
            tol: self.tol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_overrides_synthetic_flags() {
        let cli = Cli::parse_from(["cexp", "score", "--csv", "obs.csv", "--score", "crps"]);
        let Command::Score(args) = cli.command else {
            panic!("expected score subcommand");
        };
        assert_eq!(args.score, ScoreKind::Crps);
        assert_eq!(args.data.source(), DataSource::Csv(PathBuf::from("obs.csv")));
        assert_eq!(cli.log_level, tracing::Level::WARN);
    }

    #[test]
    fn calibrate_defaults_match_options_default() {
        let cli = Cli::parse_from(["cexp", "--log-level", "debug", "calibrate", "--censor-scale", "10"]);
        let Command::Calibrate(args) = cli.command else {
            panic!("expected calibrate subcommand");
        };
        assert_eq!(args.options(), CalibrateOptions::default());
        assert_eq!(args.data.synthetic().censor_scale, Some(10.0));
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn at_scale_and_from_fit_conflict() {
        let res = Cli::try_parse_from(["cexp", "score", "--at-scale", "2", "--from-fit", "fit.json"]);
        assert!(res.is_err());
    }
}
