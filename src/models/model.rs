//! Forward model: simulated ⟨Z⟩ for one sweep setting.
//!
//! The fitter relies on a single primitive operation: predict the measured
//! ⟨Z⟩ for a sweep angle `θ` under candidate noise parameters. The channel
//! order mirrors the physical sequence on hardware:
//!
//! 1. `Rx(θ)` rotation (the calibration circuit)
//! 2. depolarization accumulated during the gate
//! 3. amplitude damping (T1 decay) while waiting for readout
//! 4. bitflip misclassification at measurement

use crate::domain::NoiseParams;
use crate::sim::{DensityMatrix, amplitude_damping, bit_flip, depolarizing, rx};

/// Predict ⟨Z⟩ after the rotation circuit under the given noise parameters.
pub fn predict_z(theta: f64, params: &NoiseParams) -> f64 {
    let mut rho = DensityMatrix::ground();
    rho.apply_unitary(&rx(theta));
    rho.apply_kraus(&depolarizing(params.depol));
    rho.apply_kraus(&amplitude_damping(params.decay));
    rho.apply_kraus(&bit_flip(params.readout));
    rho.expectation_z()
}
