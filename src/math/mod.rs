//! Mathematical utilities: expectation-value estimation from shot data.

pub mod expectation;

pub use expectation::*;
