//! Per-qubit noise-model fitting.
//!
//! Each qubit's readout scan is an independent optimization problem, so the
//! runs are embarrassingly parallel; we fan them out with rayon and restore a
//! deterministic output order afterwards.

use rayon::prelude::*;

use crate::domain::{FitResult, NoiseParams, Record};
use crate::error::AppError;
use crate::fit::nelder_mead::{NelderMeadConfig, minimize};
use crate::fit::objective::ScanObjective;

/// Options shared by every per-qubit fit in a run.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Starting point of the simplex search.
    pub init: NoiseParams,
    pub nm: NelderMeadConfig,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            // Small positive probabilities: starting exactly at zero would put
            // the initial simplex flush against the penalty wall.
            init: NoiseParams::new(0.01, 0.01, 0.01),
            nm: NelderMeadConfig::default(),
        }
    }
}

/// Fit the three-parameter noise model to one qubit's scan.
pub fn fit_record(record: &Record, opts: &FitOptions) -> Result<FitResult, AppError> {
    let objective = ScanObjective::new(record.thetas.clone(), record.z_vals.clone())
        .ok_or_else(|| {
            AppError::new(
                3,
                format!("Record for {} has no usable sweep settings.", record.qubit),
            )
        })?;
    let n_settings = objective.n_settings();

    let min = minimize(
        |x| objective.cost(x),
        &opts.init.to_array(),
        &opts.nm,
    )?;

    let params = NoiseParams::from_slice(&min.x).ok_or_else(|| {
        AppError::new(4, format!("Fit for {} returned a malformed parameter vector.", record.qubit))
    })?;
    if params.has_negative() {
        // The penalty keeps the optimum non-negative; reaching this means the
        // search never left the penalty region.
        return Err(AppError::new(
            4,
            format!("Fit for {} did not find a valid (non-negative) optimum.", record.qubit),
        ));
    }

    Ok(FitResult {
        qubit: record.qubit,
        params,
        cost: min.fval,
        n_settings,
        iterations: min.iterations,
        evaluations: min.evaluations,
        converged: min.converged,
    })
}

/// Fit every record, in parallel, returning results sorted by qubit id.
pub fn fit_all(records: &[Record], opts: &FitOptions) -> Result<Vec<FitResult>, AppError> {
    if records.is_empty() {
        return Err(AppError::new(3, "No records to fit."));
    }

    let mut fits: Vec<FitResult> = records
        .par_iter()
        .map(|r| fit_record(r, opts))
        .collect::<Result<Vec<_>, _>>()?;

    fits.sort_by_key(|f| f.qubit);
    Ok(fits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predict_z;

    fn sweep(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| -std::f64::consts::PI + i as f64 * (2.0 * std::f64::consts::PI / (n - 1) as f64))
            .collect()
    }

    fn synthetic_record(qubit: crate::domain::QubitId, truth: &NoiseParams) -> Record {
        let thetas = sweep(33);
        let z_vals = thetas.iter().map(|&t| predict_z(t, truth)).collect();
        Record {
            qubit,
            collected: None,
            thetas,
            z_vals,
            shots: 0,
        }
    }

    #[test]
    fn noiseless_data_recovers_zero_parameters() {
        // Observed values are the exact analytic cos(θ); the fit should land
        // within a small tolerance of (0, 0, 0).
        let record = synthetic_record(crate::domain::QubitId::new(0, 0), &NoiseParams::ZERO);
        let opts = FitOptions {
            nm: NelderMeadConfig {
                max_iters: 2000,
                ..NelderMeadConfig::default()
            },
            ..FitOptions::default()
        };
        let fit = fit_record(&record, &opts).unwrap();

        assert!(fit.params.depol.abs() < 0.02, "depol={}", fit.params.depol);
        assert!(fit.params.decay.abs() < 0.02, "decay={}", fit.params.decay);
        assert!(fit.params.readout.abs() < 0.02, "readout={}", fit.params.readout);
        assert!(fit.cost < 0.5, "cost={}", fit.cost);
        assert!(!fit.params.has_negative());
    }

    #[test]
    fn empty_record_is_rejected() {
        let record = Record {
            qubit: crate::domain::QubitId::new(1, 1),
            collected: None,
            thetas: vec![],
            z_vals: vec![],
            shots: 0,
        };
        assert!(fit_record(&record, &FitOptions::default()).is_err());
    }

    #[test]
    fn fit_all_sorts_by_qubit() {
        let records = vec![
            synthetic_record(crate::domain::QubitId::new(2, 0), &NoiseParams::ZERO),
            synthetic_record(crate::domain::QubitId::new(0, 1), &NoiseParams::ZERO),
            synthetic_record(crate::domain::QubitId::new(0, 0), &NoiseParams::ZERO),
        ];
        let fits = fit_all(&records, &FitOptions::default()).unwrap();
        let qubits: Vec<String> = fits.iter().map(|f| f.qubit.to_string()).collect();
        assert_eq!(qubits, vec!["q0_0", "q0_1", "q2_0"]);
    }

    #[test]
    fn fit_all_rejects_empty_input() {
        assert!(fit_all(&[], &FitOptions::default()).is_err());
    }
}
