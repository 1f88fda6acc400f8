//! Diagnostics and calibration built on the scoring rules.
//!
//! Responsibilities:
//!
//! - generate log-spaced scale grids and evaluate score profiles (parallel)
//! - calibrate a shared `ln(scale)` by natural-gradient steps
//! - validate `d_score` against finite differences

pub mod calibrate;
pub mod check;
pub mod grid;
pub mod profile;

pub use calibrate::*;
pub use check::*;
pub use grid::*;
pub use profile::*;
