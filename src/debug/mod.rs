//! Debug bundle writer for inspecting a fit run end to end.
//!
//! The bundle is a single markdown file under `debug/` capturing the run
//! configuration, ingest diagnostics, fitted parameters, and the worst
//! per-setting residuals. Handy when a qubit's fit looks off and you want the
//! numbers without re-running under a debugger.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::RunOutput;
use crate::domain::FitConfig;
use crate::error::AppError;

/// Number of worst residual settings listed in the bundle.
const WORST_N: usize = 20;

pub fn write_debug_bundle(run: &RunOutput, config: &FitConfig) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("rscan_debug_{}_{ts}.md", config.dataset_id));

    let mut out = String::new();
    out.push_str("# rscan debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- experiment: {}\n", config.experiment));
    out.push_str(&format!("- dataset_id: {}\n", config.dataset_id));
    out.push_str(&format!(
        "- init: depol={} decay={} readout={}\n",
        config.init.depol, config.init.decay, config.init.readout
    ));
    out.push_str(&format!(
        "- max_iters={} x_tol={} f_tol={}\n",
        config.max_iters, config.x_tol, config.f_tol
    ));

    out.push_str("\n## Ingest\n");
    out.push_str(&format!(
        "- records: read={} used={} skipped={}\n",
        run.ingest.records_read,
        run.ingest.records_used,
        run.ingest.record_errors.len()
    ));
    out.push_str(&format!(
        "- settings: n={} theta=[{:.4}, {:.4}] z=[{:.4}, {:.4}]\n",
        run.ingest.stats.n_settings,
        run.ingest.stats.theta_min,
        run.ingest.stats.theta_max,
        run.ingest.stats.z_min,
        run.ingest.stats.z_max
    ));
    for err in &run.ingest.record_errors {
        out.push_str(&format!("- skipped {}: {}\n", err.qubit, err.message));
    }

    out.push_str("\n## Fits\n");
    for fit in &run.fits {
        out.push_str(&format!(
            "- {}: depol={:.6} decay={:.6} readout={:.6} cost={:.6} iters={} evals={} converged={}\n",
            fit.qubit,
            fit.params.depol,
            fit.params.decay,
            fit.params.readout,
            fit.cost,
            fit.iterations,
            fit.evaluations,
            fit.converged
        ));
    }

    out.push_str("\n## Worst residuals\n");
    let mut worst = run.residuals.clone();
    worst.sort_by(|a, b| {
        b.residual
            .abs()
            .partial_cmp(&a.residual.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for r in worst.iter().take(WORST_N) {
        out.push_str(&format!(
            "- {} theta={:.4}: z_obs={:.4} z_fit={:.4} residual={:+.4}\n",
            r.qubit, r.theta, r.z_obs, r.z_fit, r.residual
        ));
    }

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    file.write_all(out.as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}
