//! Data access: the filesystem record store and synthetic dataset generation.

pub mod sample;
pub mod store;

pub use sample::*;
pub use store::*;
