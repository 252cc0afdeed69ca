//! Single-qubit density-matrix simulator.
//!
//! The fit objective needs a forward model: prepare |0⟩, rotate by `Rx(θ)`,
//! apply the noise channels under test, and read out ⟨Z⟩. A 2×2 density matrix
//! is the smallest representation that captures the mixed states produced by
//! the channels, so everything here is fixed-size `Matrix2<Complex64>` algebra.

pub mod channels;
pub mod density;

pub use channels::*;
pub use density::*;
