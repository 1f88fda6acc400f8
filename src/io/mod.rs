//! Input/output helpers.
//!
//! - CSV ingest + row errors (`ingest`)
//! - score and data exports (`export`)
//! - calibration JSON read/write (`fitfile`)

pub mod export;
pub mod fitfile;
pub mod ingest;

pub use export::*;
pub use fitfile::*;
pub use ingest::*;
