//! The noise-model fit objective.
//!
//! Given a candidate 3-vector of probabilities and a reference sequence of
//! observed expectation values, the cost is the sum of absolute differences
//! between the simulated and observed ⟨Z⟩ over the sweep.
//!
//! Negative probabilities are rejected with a flat penalty instead of an
//! error: the simplex search probes freely in parameter space, and a constant
//! wall at the boundary keeps it inside the valid region without aborting the
//! run. The optimizer never accepts a penalized vertex because any valid cost
//! is far below the penalty for realistic sweep lengths.

use crate::domain::NoiseParams;
use crate::models::predict_z;

/// Flat cost returned for any candidate with a negative component.
pub const NEGATIVE_PENALTY: f64 = 1000.0;

/// The objective for one qubit's readout scan.
///
/// Holds the fixed reference data; `cost` is the black-box function handed to
/// the minimizer.
#[derive(Debug, Clone)]
pub struct ScanObjective {
    thetas: Vec<f64>,
    z_obs: Vec<f64>,
}

impl ScanObjective {
    /// Build an objective from parallel `(theta, z_obs)` arrays.
    ///
    /// Returns `None` if the arrays are empty or of mismatched length.
    pub fn new(thetas: Vec<f64>, z_obs: Vec<f64>) -> Option<Self> {
        if thetas.is_empty() || thetas.len() != z_obs.len() {
            return None;
        }
        Some(Self { thetas, z_obs })
    }

    pub fn n_settings(&self) -> usize {
        self.thetas.len()
    }

    /// Evaluate the cost of a candidate parameter vector `[depol, decay, readout]`.
    pub fn cost(&self, x: &[f64]) -> f64 {
        let Some(params) = NoiseParams::from_slice(x) else {
            return NEGATIVE_PENALTY;
        };
        if params.has_negative() {
            return NEGATIVE_PENALTY;
        }
        if !params.is_finite() {
            return NEGATIVE_PENALTY;
        }

        self.thetas
            .iter()
            .zip(self.z_obs.iter())
            .map(|(&theta, &z)| (predict_z(theta, &params) - z).abs())
            .sum()
    }
}
