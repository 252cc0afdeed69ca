//! Read/write calibration JSON files.
//!
//! Calibration JSON is the "portable" representation of a fitted run:
//! - fitted noise parameters + achieved cost per qubit
//! - a precomputed fitted ⟨Z⟩ grid for quick downstream comparisons
//!
//! The schema is defined by `domain::CalibrationFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{
    CalibrationFile, CalibrationGrid, FitConfig, FitResult, QubitCalibration,
};
use crate::error::AppError;
use crate::io::ingest::IngestedData;
use crate::models::predict_z;

const GRID_POINTS: usize = 101;

/// Write a calibration JSON file covering every fitted qubit.
pub fn write_calibration_json(
    path: &Path,
    fits: &[FitResult],
    ingest: &IngestedData,
    config: &FitConfig,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create calibration JSON '{}': {e}", path.display()),
        )
    })?;

    let qubits = fits
        .iter()
        .map(|fit| {
            let grid = build_grid(fit, ingest.stats.theta_min, ingest.stats.theta_max);
            QubitCalibration {
                qubit: fit.qubit,
                params: fit.params,
                cost: fit.cost,
                converged: fit.converged,
                grid,
            }
        })
        .collect();

    let calib = CalibrationFile {
        tool: "rscan".to_string(),
        experiment: config.experiment.clone(),
        dataset_id: config.dataset_id.clone(),
        qubits,
    };

    serde_json::to_writer_pretty(file, &calib)
        .map_err(|e| AppError::new(2, format!("Failed to write calibration JSON: {e}")))?;

    Ok(())
}

/// Read a calibration JSON file.
pub fn read_calibration_json(path: &Path) -> Result<CalibrationFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open calibration JSON '{}': {e}", path.display()),
        )
    })?;
    let calib: CalibrationFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid calibration JSON: {e}")))?;
    Ok(calib)
}

fn build_grid(fit: &FitResult, theta_min: f64, theta_max: f64) -> CalibrationGrid {
    let mut t0 = theta_min;
    let mut t1 = theta_max;
    if !(t0.is_finite() && t1.is_finite()) || t1 <= t0 {
        t0 = -std::f64::consts::PI;
        t1 = std::f64::consts::PI;
    }

    let mut thetas = Vec::with_capacity(GRID_POINTS);
    let mut z = Vec::with_capacity(GRID_POINTS);
    for i in 0..GRID_POINTS {
        let u = i as f64 / (GRID_POINTS as f64 - 1.0);
        let theta = t0 + u * (t1 - t0);
        thetas.push(theta);
        z.push(predict_z(theta, &fit.params));
    }

    CalibrationGrid { thetas, z }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NoiseParams, QubitId};
    use crate::io::ingest::{DatasetStats, IngestedData};

    #[test]
    fn calibration_roundtrips_through_json() {
        let dir = std::env::temp_dir().join(format!("rscan-calib-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("calib.json");

        let fits = vec![FitResult {
            qubit: QubitId::new(1, 2),
            params: NoiseParams::new(0.01, 0.04, 0.002),
            cost: 0.31,
            n_settings: 21,
            iterations: 120,
            evaluations: 220,
            converged: true,
        }];
        let ingest = IngestedData {
            records: vec![],
            stats: DatasetStats {
                n_records: 1,
                n_settings: 21,
                theta_min: -1.0,
                theta_max: 1.0,
                z_min: -0.9,
                z_max: 0.95,
            },
            record_errors: vec![],
            records_read: 1,
            records_used: 1,
        };
        let config = FitConfig {
            experiment: "readout-scan".to_string(),
            dataset_id: "2026-01-05".to_string(),
            data_root: None,
            init: NoiseParams::new(0.01, 0.01, 0.01),
            max_iters: 100,
            x_tol: 1e-5,
            f_tol: 1e-8,
            theta_min: None,
            theta_max: None,
            top_n: 5,
            export_results: None,
            export_calib: None,
            debug_bundle: false,
        };

        write_calibration_json(&path, &fits, &ingest, &config).unwrap();
        let calib = read_calibration_json(&path).unwrap();

        assert_eq!(calib.tool, "rscan");
        assert_eq!(calib.dataset_id, "2026-01-05");
        assert_eq!(calib.qubits.len(), 1);
        let q = &calib.qubits[0];
        assert_eq!(q.qubit, QubitId::new(1, 2));
        assert_eq!(q.grid.thetas.len(), q.grid.z.len());
        assert!((q.grid.thetas[0] + 1.0).abs() < 1e-12);
        // Grid values come from the fitted model over the observed range.
        assert!(q.grid.z.iter().all(|z| z.is_finite()));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
