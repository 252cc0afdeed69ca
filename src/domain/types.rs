//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for comparisons across datasets

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a qubit on a 2D device grid, e.g. `q2_3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId {
    pub row: u32,
    pub col: u32,
}

impl QubitId {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for QubitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}_{}", self.row, self.col)
    }
}

impl FromStr for QubitId {
    type Err = String;

    /// Parse the `q{row}_{col}` form used in record file names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix('q')
            .ok_or_else(|| format!("Invalid qubit id '{s}' (expected `q<row>_<col>`)."))?;
        let (row, col) = body
            .split_once('_')
            .ok_or_else(|| format!("Invalid qubit id '{s}' (expected `q<row>_<col>`)."))?;
        let row = row
            .parse::<u32>()
            .map_err(|_| format!("Invalid qubit row in '{s}'."))?;
        let col = col
            .parse::<u32>()
            .map_err(|_| format!("Invalid qubit column in '{s}'."))?;
        Ok(Self { row, col })
    }
}

/// One flattened calibration row: a qubit's readout scan.
///
/// Created by flattening raw stored bitstring arrays; immutable after creation.
/// `thetas` and `z_vals` are parallel arrays sorted by ascending angle.
#[derive(Debug, Clone)]
pub struct Record {
    pub qubit: QubitId,
    /// Date the raw data was collected, if the record carried one.
    pub collected: Option<NaiveDate>,
    /// Ordered sweep angles (radians).
    pub thetas: Vec<f64>,
    /// Measured ⟨Z⟩ per sweep angle.
    pub z_vals: Vec<f64>,
    /// Shots per sweep setting (informational, used for reporting).
    pub shots: usize,
}

/// The three noise-model parameters being fitted.
///
/// All three are probabilities; the objective soft-rejects negative values and
/// the simulator clamps at 1 (a probability above 1 is meaningless but cannot
/// occur at an optimum since it only increases the cost).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Depolarization probability (uniform random state corruption).
    pub depol: f64,
    /// Decay probability (amplitude damping toward |0⟩ during readout).
    pub decay: f64,
    /// Readout bitflip probability (measurement misclassification).
    pub readout: f64,
}

impl NoiseParams {
    pub const ZERO: NoiseParams = NoiseParams {
        depol: 0.0,
        decay: 0.0,
        readout: 0.0,
    };

    pub fn new(depol: f64, decay: f64, readout: f64) -> Self {
        Self {
            depol,
            decay,
            readout,
        }
    }

    /// View as the optimizer's parameter vector `[depol, decay, readout]`.
    pub fn to_array(self) -> [f64; 3] {
        [self.depol, self.decay, self.readout]
    }

    pub fn from_slice(x: &[f64]) -> Option<Self> {
        if x.len() != 3 {
            return None;
        }
        Some(Self {
            depol: x[0],
            decay: x[1],
            readout: x[2],
        })
    }

    pub fn has_negative(&self) -> bool {
        self.depol < 0.0 || self.decay < 0.0 || self.readout < 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.depol.is_finite() && self.decay.is_finite() && self.readout.is_finite()
    }
}

/// Per-qubit fit output: fitted parameters plus achieved cost and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub qubit: QubitId,
    pub params: NoiseParams,
    /// Achieved objective value (sum of absolute ⟨Z⟩ deviations).
    pub cost: f64,
    /// Number of sweep settings that entered the fit.
    pub n_settings: usize,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

impl FitResult {
    /// Mean absolute ⟨Z⟩ deviation per sweep setting.
    pub fn mean_abs_residual(&self) -> f64 {
        if self.n_settings == 0 {
            return f64::NAN;
        }
        self.cost / self.n_settings as f64
    }
}

/// One per-setting fitted value (used for rankings and exports).
#[derive(Debug, Clone)]
pub struct SettingResidual {
    pub qubit: QubitId,
    pub theta: f64,
    pub z_obs: f64,
    pub z_fit: f64,
    pub residual: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub experiment: String,
    pub dataset_id: String,
    /// Overrides the `RSCAN_DATA_DIR` environment variable when set.
    pub data_root: Option<PathBuf>,

    /// Initial guess for the simplex search.
    pub init: NoiseParams,
    pub max_iters: usize,
    /// Convergence tolerance on the simplex diameter.
    pub x_tol: f64,
    /// Convergence tolerance on the spread of objective values.
    pub f_tol: f64,

    /// Optional restriction of which sweep angles enter the fit.
    pub theta_min: Option<f64>,
    pub theta_max: Option<f64>,

    pub top_n: usize,
    pub export_results: Option<PathBuf>,
    pub export_calib: Option<PathBuf>,
    pub debug_bundle: bool,
}

/// A saved calibration file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationFile {
    pub tool: String,
    pub experiment: String,
    pub dataset_id: String,
    pub qubits: Vec<QubitCalibration>,
}

/// Per-qubit entry in a calibration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QubitCalibration {
    pub qubit: QubitId,
    pub params: NoiseParams,
    pub cost: f64,
    pub converged: bool,
    pub grid: CalibrationGrid,
}

/// Precomputed fitted ⟨Z⟩ grid for quick downstream comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationGrid {
    pub thetas: Vec<f64>,
    pub z: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qubit_id_roundtrips_through_display() {
        let q = QubitId::new(5, 3);
        let s = q.to_string();
        assert_eq!(s, "q5_3");
        assert_eq!(s.parse::<QubitId>().unwrap(), q);
    }

    #[test]
    fn qubit_id_rejects_malformed_strings() {
        assert!("5_3".parse::<QubitId>().is_err());
        assert!("q5".parse::<QubitId>().is_err());
        assert!("qa_b".parse::<QubitId>().is_err());
    }

    #[test]
    fn noise_params_slice_roundtrip() {
        let p = NoiseParams::new(0.01, 0.02, 0.03);
        let x = p.to_array();
        assert_eq!(NoiseParams::from_slice(&x), Some(p));
        assert!(NoiseParams::from_slice(&[0.1, 0.2]).is_none());
    }

    #[test]
    fn negative_detection() {
        assert!(!NoiseParams::ZERO.has_negative());
        assert!(NoiseParams::new(-1e-9, 0.0, 0.0).has_negative());
    }
}
