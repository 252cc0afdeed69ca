//! Readout noise model implementation.
//!
//! The model is a small, pure function so that fitting/search code can stay
//! generic over it.

pub mod model;

pub use model::*;
