//! Mathematical utilities: metric solves and finite differences.

pub mod linalg;
pub mod numdiff;

pub use linalg::*;
pub use numdiff::*;
