//! Distribution adapters.

pub mod exponential;

pub use exponential::*;
