//! Kraus operators for the noise channels in the readout model.
//!
//! Each function returns the full Kraus set of a trace-preserving channel.
//! Probabilities are clamped into [0, 1] before taking square roots; the
//! objective already rejects negative candidates, and values above 1 can only
//! be produced transiently by the simplex search.

use nalgebra::Matrix2;
use num_complex::Complex64;

use crate::sim::density::Mat2;

fn cr(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

/// Depolarizing channel with error probability `p`:
///
/// ```text
/// K₀ = √(1-p) I,  K₁ = √(p/3) X,  K₂ = √(p/3) Y,  K₃ = √(p/3) Z
/// ```
pub fn depolarizing(p: f64) -> Vec<Mat2> {
    let p = p.clamp(0.0, 1.0);
    let k0 = (1.0 - p).sqrt();
    let k = (p / 3.0).sqrt();
    vec![
        Matrix2::new(cr(k0), cr(0.0), cr(0.0), cr(k0)),
        // X
        Matrix2::new(cr(0.0), cr(k), cr(k), cr(0.0)),
        // Y
        Matrix2::new(
            cr(0.0),
            Complex64::new(0.0, -k),
            Complex64::new(0.0, k),
            cr(0.0),
        ),
        // Z
        Matrix2::new(cr(k), cr(0.0), cr(0.0), cr(-k)),
    ]
}

/// Amplitude-damping channel with decay probability `gamma` (T1 decay toward |0⟩):
///
/// ```text
/// K₀ = [[1, 0], [0, √(1-γ)]],  K₁ = [[0, √γ], [0, 0]]
/// ```
pub fn amplitude_damping(gamma: f64) -> Vec<Mat2> {
    let gamma = gamma.clamp(0.0, 1.0);
    vec![
        Matrix2::new(cr(1.0), cr(0.0), cr(0.0), cr((1.0 - gamma).sqrt())),
        Matrix2::new(cr(0.0), cr(gamma.sqrt()), cr(0.0), cr(0.0)),
    ]
}

/// Bit-flip channel with flip probability `q` (readout misclassification):
///
/// ```text
/// K₀ = √(1-q) I,  K₁ = √q X
/// ```
pub fn bit_flip(q: f64) -> Vec<Mat2> {
    let q = q.clamp(0.0, 1.0);
    let k0 = (1.0 - q).sqrt();
    let k1 = q.sqrt();
    vec![
        Matrix2::new(cr(k0), cr(0.0), cr(0.0), cr(k0)),
        Matrix2::new(cr(0.0), cr(k1), cr(k1), cr(0.0)),
    ]
}
