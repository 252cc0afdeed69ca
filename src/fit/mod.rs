//! Noise-model fitting orchestration.
//!
//! Responsibilities:
//!
//! - evaluate the L1 fit objective against observed ⟨Z⟩ values (`objective`)
//! - minimize it with a derivative-free simplex search (`nelder_mead`)
//! - run one fit per qubit, in parallel (`fitter`)

pub mod fitter;
pub mod nelder_mead;
pub mod objective;

pub use fitter::*;
pub use nelder_mead::*;
pub use objective::*;
