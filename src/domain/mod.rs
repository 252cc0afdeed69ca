//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - qubit identifiers (`QubitId`)
//! - flattened calibration rows (`Record`)
//! - noise model parameters and fit outputs (`NoiseParams`, `FitResult`)
//! - run configuration (`FitConfig`) and the calibration file schema

pub mod types;

pub use types::*;
