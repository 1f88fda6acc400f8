//! `censored-expon` library crate.
//!
//! An Exponential distribution for right-censored survival data, with the
//! scoring rules a natural-gradient boosting loop needs (log score and CRPS).
//!
//! The binary (`cexp`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the distribution and scores are reusable from other crates
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod dist;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod scores;
