//! Reporting utilities: residuals, rankings, and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;

use crate::domain::{FitResult, Record, SettingResidual};
use crate::error::AppError;
use crate::models::predict_z;

/// Noisiest/cleanest qubit rankings (top-N each side), by mean absolute residual.
#[derive(Debug, Clone)]
pub struct Rankings {
    pub noisiest: Vec<FitResult>,
    pub cleanest: Vec<FitResult>,
}

/// Compute fitted values and residuals for every sweep setting of every qubit.
///
/// `records` and `fits` must refer to the same qubits; both are sorted by
/// qubit id upstream.
pub fn compute_residuals(
    records: &[Record],
    fits: &[FitResult],
) -> Result<Vec<SettingResidual>, AppError> {
    if records.len() != fits.len() {
        return Err(AppError::new(
            4,
            "Record/fit count mismatch during residual computation.",
        ));
    }

    let mut out = Vec::new();
    for (record, fit) in records.iter().zip(fits.iter()) {
        if record.qubit != fit.qubit {
            return Err(AppError::new(
                4,
                format!("Record/fit qubit mismatch: {} vs {}.", record.qubit, fit.qubit),
            ));
        }
        for (&theta, &z_obs) in record.thetas.iter().zip(record.z_vals.iter()) {
            let z_fit = predict_z(theta, &fit.params);
            if !z_fit.is_finite() {
                return Err(AppError::new(
                    4,
                    "Non-finite model prediction during residual computation.",
                ));
            }
            out.push(SettingResidual {
                qubit: record.qubit,
                theta,
                z_obs,
                z_fit,
                residual: z_obs - z_fit,
            });
        }
    }
    Ok(out)
}

/// Rank the top noisiest and cleanest qubits by mean absolute residual.
pub fn rank_noisy_clean(fits: &[FitResult], top_n: usize) -> Rankings {
    let mut sorted = fits.to_vec();
    sorted.sort_by(|a, b| {
        b.mean_abs_residual()
            .partial_cmp(&a.mean_abs_residual())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let noisiest = sorted.iter().take(top_n).cloned().collect();

    let mut sorted_clean = fits.to_vec();
    sorted_clean.sort_by(|a, b| {
        a.mean_abs_residual()
            .partial_cmp(&b.mean_abs_residual())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let cleanest = sorted_clean.iter().take(top_n).cloned().collect();

    Rankings { noisiest, cleanest }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NoiseParams, QubitId};

    fn fit(row: u32, col: u32, cost: f64, n: usize) -> FitResult {
        FitResult {
            qubit: QubitId::new(row, col),
            params: NoiseParams::ZERO,
            cost,
            n_settings: n,
            iterations: 1,
            evaluations: 1,
            converged: true,
        }
    }

    #[test]
    fn rankings_order_by_mean_abs_residual() {
        let fits = vec![fit(0, 0, 1.0, 10), fit(0, 1, 5.0, 10), fit(0, 2, 0.2, 10)];
        let rankings = rank_noisy_clean(&fits, 2);
        assert_eq!(rankings.noisiest[0].qubit, QubitId::new(0, 1));
        assert_eq!(rankings.cleanest[0].qubit, QubitId::new(0, 2));
        assert_eq!(rankings.noisiest.len(), 2);
    }

    #[test]
    fn residuals_require_matching_qubits() {
        let record = Record {
            qubit: QubitId::new(0, 0),
            collected: None,
            thetas: vec![0.0],
            z_vals: vec![1.0],
            shots: 10,
        };
        let fits = vec![fit(9, 9, 0.0, 1)];
        assert!(compute_residuals(&[record], &fits).is_err());
    }

    #[test]
    fn residuals_are_obs_minus_fit() {
        let record = Record {
            qubit: QubitId::new(0, 0),
            collected: None,
            thetas: vec![0.0],
            z_vals: vec![0.9],
            shots: 10,
        };
        let fits = vec![fit(0, 0, 0.1, 1)];
        let residuals = compute_residuals(&[record], &fits).unwrap();
        assert_eq!(residuals.len(), 1);
        // Noiseless model at theta=0 predicts exactly 1.
        assert!((residuals[0].z_fit - 1.0).abs() < 1e-12);
        assert!((residuals[0].residual + 0.1).abs() < 1e-12);
    }
}
