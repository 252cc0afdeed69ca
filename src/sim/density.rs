//! Density-matrix state and unitary evolution for one qubit.

use nalgebra::Matrix2;
use num_complex::Complex64;

/// 2×2 complex matrix alias used across the simulator.
pub type Mat2 = Matrix2<Complex64>;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// A single-qubit density matrix.
///
/// Invariants (maintained by construction and by the channel definitions):
/// unit trace, Hermitian, positive semi-definite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityMatrix {
    rho: Mat2,
}

impl DensityMatrix {
    /// The pure state |0⟩⟨0|.
    pub fn ground() -> Self {
        Self {
            rho: Matrix2::new(c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)),
        }
    }

    /// Evolve under a unitary: ρ → UρU†.
    pub fn apply_unitary(&mut self, u: &Mat2) {
        self.rho = u * self.rho * u.adjoint();
    }

    /// Evolve under a Kraus channel: ρ → Σᵢ KᵢρKᵢ†.
    pub fn apply_kraus(&mut self, kraus: &[Mat2]) {
        let mut out = Matrix2::zeros();
        for k in kraus {
            out += k * self.rho * k.adjoint();
        }
        self.rho = out;
    }

    /// Expectation value of the Pauli-Z observable: tr(Zρ).
    pub fn expectation_z(&self) -> f64 {
        (self.rho[(0, 0)] - self.rho[(1, 1)]).re
    }

    /// Trace of the density matrix (1 for a trace-preserving evolution).
    pub fn trace(&self) -> f64 {
        self.rho.trace().re
    }
}

/// The `Rx(θ)` rotation unitary.
pub fn rx(theta: f64) -> Mat2 {
    let half = theta / 2.0;
    let cos = half.cos();
    let sin = half.sin();
    Matrix2::new(c(cos, 0.0), c(0.0, -sin), c(0.0, -sin), c(cos, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn ground_state_has_z_plus_one() {
        let rho = DensityMatrix::ground();
        assert!((rho.expectation_z() - 1.0).abs() < TOL);
        assert!((rho.trace() - 1.0).abs() < TOL);
    }

    #[test]
    fn rx_pi_flips_to_excited() {
        let mut rho = DensityMatrix::ground();
        rho.apply_unitary(&rx(std::f64::consts::PI));
        assert!((rho.expectation_z() + 1.0).abs() < TOL);
        assert!((rho.trace() - 1.0).abs() < TOL);
    }

    #[test]
    fn rx_half_pi_gives_zero_z() {
        let mut rho = DensityMatrix::ground();
        rho.apply_unitary(&rx(std::f64::consts::FRAC_PI_2));
        assert!(rho.expectation_z().abs() < TOL);
    }

    #[test]
    fn rx_matches_cosine_over_sweep() {
        // ⟨Z⟩ after Rx(θ) from |0⟩ is cos(θ) exactly.
        for i in 0..=32 {
            let theta = -std::f64::consts::PI + i as f64 * (2.0 * std::f64::consts::PI / 32.0);
            let mut rho = DensityMatrix::ground();
            rho.apply_unitary(&rx(theta));
            assert!(
                (rho.expectation_z() - theta.cos()).abs() < 1e-10,
                "theta={theta}: got {}, expected {}",
                rho.expectation_z(),
                theta.cos()
            );
        }
    }
}
