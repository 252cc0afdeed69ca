//! Shared "fit pipeline" logic used by every fitting front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! store load -> flatten/validate -> per-qubit fit -> residuals -> rankings
//!
//! The CLI commands can then focus on presentation (printing vs exporting).

use crate::data::store::RecordStore;
use crate::domain::{FitConfig, FitResult, SettingResidual};
use crate::error::AppError;
use crate::fit::fitter::{FitOptions, fit_all};
use crate::fit::nelder_mead::NelderMeadConfig;
use crate::io::ingest::{IngestedData, flatten_records};
use crate::report::{Rankings, compute_residuals, rank_noisy_clean};

/// All computed outputs of a single `rscan fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub fits: Vec<FitResult>,
    pub residuals: Vec<SettingResidual>,
    pub rankings: Rankings,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let store = match &config.data_root {
        Some(root) => RecordStore::with_root(root),
        None => RecordStore::from_env(),
    };
    let raw = store.load_dataset(&config.experiment, &config.dataset_id)?;

    let ingest = flatten_records(&raw, config)?;

    let opts = fit_options_from_config(config);
    let fits = fit_all(&ingest.records, &opts)?;

    let residuals = compute_residuals(&ingest.records, &fits)?;
    let rankings = rank_noisy_clean(&fits, config.top_n);

    Ok(RunOutput {
        ingest,
        fits,
        residuals,
        rankings,
    })
}

pub fn fit_options_from_config(config: &FitConfig) -> FitOptions {
    FitOptions {
        init: config.init,
        nm: NelderMeadConfig {
            max_iters: config.max_iters,
            x_tol: config.x_tol,
            f_tol: config.f_tol,
            ..NelderMeadConfig::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{SampleConfig, generate_sample};
    use crate::domain::NoiseParams;
    use std::path::PathBuf;

    fn scratch_root() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rscan-pipeline-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn end_to_end_fit_on_generated_dataset() {
        let root = scratch_root();
        let store = RecordStore::with_root(&root);

        // Modest shot count keeps the test fast; the fit only needs the curve
        // shape, not tight statistics.
        let sample = SampleConfig {
            n_qubits: 2,
            theta_steps: 21,
            theta_min: -std::f64::consts::PI,
            theta_max: std::f64::consts::PI,
            shots: 400,
            seed: 3,
            truth: NoiseParams::new(0.0, 0.0, 0.0),
        };
        for record in generate_sample(&sample).unwrap() {
            store.write_record("readout-scan", "synthetic", &record).unwrap();
        }

        let config = FitConfig {
            experiment: "readout-scan".to_string(),
            dataset_id: "synthetic".to_string(),
            data_root: Some(root.clone()),
            init: NoiseParams::new(0.01, 0.01, 0.01),
            max_iters: 1000,
            x_tol: 1e-5,
            f_tol: 1e-8,
            theta_min: None,
            theta_max: None,
            top_n: 2,
            export_results: None,
            export_calib: None,
            debug_bundle: false,
        };

        let run = run_fit(&config).unwrap();
        assert_eq!(run.fits.len(), 2);
        assert_eq!(run.ingest.stats.n_settings, 42);
        for fit in &run.fits {
            // Shot noise bounds how close to zero the fit can land.
            assert!(fit.params.depol < 0.1, "depol={}", fit.params.depol);
            assert!(fit.params.decay < 0.1, "decay={}", fit.params.decay);
            assert!(fit.params.readout < 0.1, "readout={}", fit.params.readout);
            assert!(!fit.params.has_negative());
        }
        assert_eq!(run.residuals.len(), 42);

        let _ = std::fs::remove_dir_all(&root);
    }
}
