//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - survival observations (`SurvivalData`) and their summary (`DatasetStats`)
//! - configuration enums/structs (`ScoreKind`, `DataSource`, `CalibrateOptions`)
//! - outputs (`ScoreRow`, `ProfilePoint`, `CalibrationResult`, `FitFile`)

pub mod types;

pub use types::*;
