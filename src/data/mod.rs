//! Data sources: synthetic censored samples.

pub mod sample;

pub use sample::*;
