//! Input/output helpers.
//!
//! - raw record flattening + validation (`ingest`)
//! - per-setting results export (CSV) (`export`)
//! - calibration JSON read/write (`calib`)

pub mod calib;
pub mod export;
pub mod ingest;

pub use calib::*;
pub use export::*;
pub use ingest::*;
