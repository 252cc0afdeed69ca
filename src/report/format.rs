//! Formatted terminal output for fit runs.

use crate::domain::{FitConfig, FitResult};
use crate::io::ingest::IngestedData;
use crate::report::Rankings;

/// Format the full run summary (dataset stats + per-qubit fit table).
pub fn format_run_summary(ingest: &IngestedData, fits: &[FitResult], config: &FitConfig) -> String {
    let mut out = String::new();

    out.push_str("=== rscan - Readout Scan Noise Fit ===\n");
    out.push_str(&format!("Experiment: {}\n", config.experiment));
    out.push_str(&format!("Dataset: {}\n", config.dataset_id));
    out.push_str(&format!(
        "Records: read={} used={} | settings={} | theta=[{:.3}, {:.3}] | z=[{:.3}, {:.3}]\n",
        ingest.records_read,
        ingest.records_used,
        ingest.stats.n_settings,
        ingest.stats.theta_min,
        ingest.stats.theta_max,
        ingest.stats.z_min,
        ingest.stats.z_max,
    ));

    if !ingest.record_errors.is_empty() {
        out.push_str(&format!("Skipped records: {}\n", ingest.record_errors.len()));
        for err in &ingest.record_errors {
            out.push_str(&format!("  ({}) {}\n", err.qubit, err.message));
        }
    }

    out.push_str("\nFitted noise parameters:\n");
    out.push_str(&format_fit_table(fits));
    out.push('\n');

    out
}

/// Format the noisiest/cleanest qubit tables.
pub fn format_rankings(rankings: &Rankings) -> String {
    let mut out = String::new();

    out.push_str("Noisiest qubits (highest mean |residual|):\n");
    out.push_str(&format_fit_table(&rankings.noisiest));
    out.push('\n');

    out.push_str("Cleanest qubits (lowest mean |residual|):\n");
    out.push_str(&format_fit_table(&rankings.cleanest));

    out
}

fn format_fit_table(fits: &[FitResult]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:>10} {:>10} {:>10} {:>10} {:>12} {:>6} {:>5}\n",
        "qubit", "depol", "decay", "readout", "cost", "mean|resid|", "iters", "conv"
    ));
    out.push_str(&format!(
        "{:-<8} {:-<10} {:-<10} {:-<10} {:-<10} {:-<12} {:-<6} {:-<5}\n",
        "", "", "", "", "", "", "", ""
    ));

    for fit in fits {
        out.push_str(&format!(
            "{:<8} {:>10.6} {:>10.6} {:>10.6} {:>10.4} {:>12.6} {:>6} {:>5}\n",
            fit.qubit.to_string(),
            fit.params.depol,
            fit.params.decay,
            fit.params.readout,
            fit.cost,
            fit.mean_abs_residual(),
            fit.iterations,
            if fit.converged { "yes" } else { "no" },
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NoiseParams, QubitId};
    use crate::report::rank_noisy_clean;

    fn fit(row: u32, col: u32, cost: f64) -> FitResult {
        FitResult {
            qubit: QubitId::new(row, col),
            params: NoiseParams::new(0.01, 0.02, 0.003),
            cost,
            n_settings: 20,
            iterations: 42,
            evaluations: 80,
            converged: true,
        }
    }

    #[test]
    fn fit_table_lists_every_qubit() {
        let fits = vec![fit(0, 0, 0.5), fit(1, 3, 0.8)];
        let table = format_fit_table(&fits);
        assert!(table.contains("q0_0"));
        assert!(table.contains("q1_3"));
        assert!(table.contains("depol"));
    }

    #[test]
    fn rankings_output_has_both_sections() {
        let fits = vec![fit(0, 0, 0.5), fit(0, 1, 0.1)];
        let rankings = rank_noisy_clean(&fits, 1);
        let text = format_rankings(&rankings);
        assert!(text.contains("Noisiest"));
        assert!(text.contains("Cleanest"));
    }
}
