//! Export per-setting results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{FitConfig, SettingResidual};
use crate::error::AppError;

/// Write per-setting results to a CSV file.
pub fn write_results_csv(
    path: &Path,
    residuals: &[SettingResidual],
    config: &FitConfig,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(
        file,
        "experiment,dataset_id,qubit,theta,z_obs,z_fit,residual"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writeln!(
            file,
            "{},{},{},{:.10},{:.6},{:.6},{:.6}",
            config.experiment, config.dataset_id, r.qubit, r.theta, r.z_obs, r.z_fit, r.residual,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
