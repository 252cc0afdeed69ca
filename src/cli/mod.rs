//! Command-line parsing for the readout-scan noise fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rscan", version, about = "Readout-Scan Noise Model Fitter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the noise model per qubit, print diagnostics/rankings, and optionally export.
    Fit(FitArgs),
    /// Print noisiest/cleanest qubit rankings only (useful for scripting).
    Rank(FitArgs),
    /// Generate a synthetic dataset into the record store from known parameters.
    Sample(SampleArgs),
    /// List experiments and dataset ids available in the record store.
    List(ListArgs),
}

/// Common options for fitting and ranking.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Experiment name in the record store.
    #[arg(short = 'e', long, default_value = "readout-scan")]
    pub experiment: String,

    /// Dataset id to analyze (e.g. a collection date like 2026-01-05).
    #[arg(short = 'd', long)]
    pub dataset: String,

    /// Record store root (overrides RSCAN_DATA_DIR).
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Initial guess for the depolarization probability.
    #[arg(long, default_value_t = 0.01)]
    pub init_depol: f64,

    /// Initial guess for the decay probability.
    #[arg(long, default_value_t = 0.01)]
    pub init_decay: f64,

    /// Initial guess for the readout bitflip probability.
    #[arg(long, default_value_t = 0.01)]
    pub init_readout: f64,

    /// Maximum simplex iterations per qubit.
    #[arg(long, default_value_t = 400)]
    pub max_iters: usize,

    /// Convergence tolerance on the simplex diameter.
    #[arg(long, default_value_t = 1e-5)]
    pub x_tol: f64,

    /// Convergence tolerance on the objective spread across the simplex.
    #[arg(long, default_value_t = 1e-8)]
    pub f_tol: f64,

    /// Only fit sweep angles >= this value (radians).
    #[arg(long, allow_hyphen_values = true)]
    pub theta_min: Option<f64>,

    /// Only fit sweep angles <= this value (radians).
    #[arg(long, allow_hyphen_values = true)]
    pub theta_max: Option<f64>,

    /// Show top-N noisiest and cleanest qubits.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Export per-setting results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export calibration (fitted params + grid) to JSON.
    #[arg(long = "export-calib")]
    pub export_calib: Option<PathBuf>,

    /// Write a markdown debug bundle under debug/.
    #[arg(long)]
    pub debug_bundle: bool,
}

/// Options for synthetic dataset generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Experiment name to write under.
    #[arg(short = 'e', long, default_value = "readout-scan")]
    pub experiment: String,

    /// Dataset id to write.
    #[arg(short = 'd', long)]
    pub dataset: String,

    /// Record store root (overrides RSCAN_DATA_DIR).
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Number of qubits to generate.
    #[arg(short = 'n', long, default_value_t = 4)]
    pub qubits: usize,

    /// Number of sweep angles.
    #[arg(long, default_value_t = 64)]
    pub theta_steps: usize,

    /// Minimum sweep angle (radians).
    #[arg(long, default_value_t = -std::f64::consts::PI, allow_hyphen_values = true)]
    pub theta_min: f64,

    /// Maximum sweep angle (radians).
    #[arg(long, default_value_t = std::f64::consts::PI)]
    pub theta_max: f64,

    /// Shots per sweep setting.
    #[arg(long, default_value_t = 1000)]
    pub shots: usize,

    /// Random seed for shot sampling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Generating depolarization probability.
    #[arg(long, default_value_t = 0.01)]
    pub depol: f64,

    /// Generating decay probability.
    #[arg(long, default_value_t = 0.05)]
    pub decay: f64,

    /// Generating readout bitflip probability.
    #[arg(long, default_value_t = 0.02)]
    pub readout: f64,
}

/// Options for listing record store contents.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Record store root (overrides RSCAN_DATA_DIR).
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Only list datasets of this experiment.
    #[arg(short = 'e', long)]
    pub experiment: Option<String>,
}
