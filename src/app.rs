//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads records from the store
//! - runs flattening + per-qubit fitting
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, FitArgs, ListArgs, SampleArgs};
use crate::data::sample::{SampleConfig, generate_sample};
use crate::data::store::RecordStore;
use crate::domain::{FitConfig, NoiseParams};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `rscan` binary.
pub fn run() -> Result<(), AppError> {
    // We want `rscan -d 2026-01-05` to behave like `rscan fit -d 2026-01-05`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the shorter UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args, OutputMode::Full),
        Command::Rank(args) => handle_fit(args, OutputMode::RankOnly),
        Command::Sample(args) => handle_sample(args),
        Command::List(args) => handle_list(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RankOnly,
}

fn handle_fit(args: FitArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    // Print terminal output.
    match mode {
        OutputMode::Full => {
            println!(
                "{}",
                crate::report::format_run_summary(&run.ingest, &run.fits, &config)
            );
        }
        OutputMode::RankOnly => {}
    }

    println!("{}", crate::report::format_rankings(&run.rankings));

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.residuals, &config)?;
    }
    if let Some(path) = &config.export_calib {
        crate::io::calib::write_calibration_json(path, &run.fits, &run.ingest, &config)?;
    }
    if config.debug_bundle {
        let path = crate::debug::write_debug_bundle(&run, &config)?;
        println!("Debug bundle written to {}", path.display());
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let store = match &args.data_root {
        Some(root) => RecordStore::with_root(root),
        None => RecordStore::from_env(),
    };

    let sample = SampleConfig {
        n_qubits: args.qubits,
        theta_steps: args.theta_steps,
        theta_min: args.theta_min,
        theta_max: args.theta_max,
        shots: args.shots,
        seed: args.seed,
        truth: NoiseParams::new(args.depol, args.decay, args.readout),
    };

    let records = generate_sample(&sample)?;
    for record in &records {
        let path = store.write_record(&args.experiment, &args.dataset, record)?;
        println!("Wrote {}", path.display());
    }
    println!(
        "Generated {} records under {}/{}.",
        records.len(),
        args.experiment,
        args.dataset
    );

    Ok(())
}

fn handle_list(args: ListArgs) -> Result<(), AppError> {
    let store = match &args.data_root {
        Some(root) => RecordStore::with_root(root),
        None => RecordStore::from_env(),
    };

    match args.experiment {
        Some(experiment) => {
            for dataset in store.list_datasets(&experiment)? {
                let n = store.record_count(&experiment, &dataset);
                println!("{experiment}/{dataset}  ({n} records)");
            }
        }
        None => {
            for experiment in store.list_experiments()? {
                for dataset in store.list_datasets(&experiment)? {
                    let n = store.record_count(&experiment, &dataset);
                    println!("{experiment}/{dataset}  ({n} records)");
                }
            }
        }
    }

    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        experiment: args.experiment.clone(),
        dataset_id: args.dataset.clone(),
        data_root: args.data_root.clone(),
        init: NoiseParams::new(args.init_depol, args.init_decay, args.init_readout),
        max_iters: args.max_iters,
        x_tol: args.x_tol,
        f_tol: args.f_tol,
        theta_min: args.theta_min,
        theta_max: args.theta_max,
        top_n: args.top,
        export_results: args.export.clone(),
        export_calib: args.export_calib.clone(),
        debug_bundle: args.debug_bundle,
    }
}

/// Rewrite argv so `rscan <flags>` defaults to `rscan fit <flags>`.
///
/// Rules:
/// - `rscan`                     -> unchanged (clap prints help)
/// - `rscan -d 2026-01-05 ...`   -> `rscan fit -d 2026-01-05 ...`
/// - `rscan --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(argv: Vec<String>) -> Vec<String> {
    let mut argv = argv;
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "rank" | "sample" | "list");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
