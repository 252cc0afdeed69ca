//! Filesystem-backed record store.
//!
//! Layout: `{root}/{experiment}/{dataset_id}/{qubit}.json`, one JSON file per
//! stored measurement run. The root directory comes from `RSCAN_DATA_DIR`
//! (loaded via dotenvy so a project-local `.env` works), defaulting to
//! `./data`.
//!
//! Iteration order is always sorted by file name so runs are deterministic.

use std::fs::{File, create_dir_all, read_dir};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::QubitId;
use crate::error::AppError;

const DATA_DIR_VAR: &str = "RSCAN_DATA_DIR";
const DEFAULT_ROOT: &str = "data";

/// One stored measurement run, as written by the collection pipeline.
///
/// `bitstrings[i]` holds the shot outcomes (0/1) for sweep angle `thetas[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub qubit: QubitId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected: Option<NaiveDate>,
    pub thetas: Vec<f64>,
    pub bitstrings: Vec<Vec<u8>>,
}

/// Handle to the record store root.
#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    /// Resolve the store root from the environment (or the default).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let root = std::env::var(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ROOT));
        Self { root }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dataset_dir(&self, experiment: &str, dataset_id: &str) -> PathBuf {
        self.root.join(experiment).join(dataset_id)
    }

    /// Load every record of a dataset, sorted by file name.
    pub fn load_dataset(&self, experiment: &str, dataset_id: &str) -> Result<Vec<RawRecord>, AppError> {
        let dir = self.dataset_dir(experiment, dataset_id);
        let entries = read_dir(&dir).map_err(|e| {
            AppError::new(
                2,
                format!("Failed to open dataset directory '{}': {e}", dir.display()),
            )
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(AppError::new(
                3,
                format!("Dataset '{experiment}/{dataset_id}' contains no record files."),
            ));
        }

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let file = File::open(&path).map_err(|e| {
                AppError::new(2, format!("Failed to open record '{}': {e}", path.display()))
            })?;
            let record: RawRecord = serde_json::from_reader(file).map_err(|e| {
                AppError::new(2, format!("Invalid record JSON '{}': {e}", path.display()))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Write one record into the dataset directory, creating it if needed.
    pub fn write_record(
        &self,
        experiment: &str,
        dataset_id: &str,
        record: &RawRecord,
    ) -> Result<PathBuf, AppError> {
        let dir = self.dataset_dir(experiment, dataset_id);
        create_dir_all(&dir).map_err(|e| {
            AppError::new(
                2,
                format!("Failed to create dataset directory '{}': {e}", dir.display()),
            )
        })?;

        let path = dir.join(format!("{}.json", record.qubit));
        let file = File::create(&path).map_err(|e| {
            AppError::new(2, format!("Failed to create record '{}': {e}", path.display()))
        })?;
        serde_json::to_writer_pretty(file, record)
            .map_err(|e| AppError::new(2, format!("Failed to write record JSON: {e}")))?;
        Ok(path)
    }

    /// List experiment names present in the store, sorted.
    pub fn list_experiments(&self) -> Result<Vec<String>, AppError> {
        list_subdirs(&self.root)
    }

    /// List dataset ids of one experiment, sorted.
    pub fn list_datasets(&self, experiment: &str) -> Result<Vec<String>, AppError> {
        list_subdirs(&self.root.join(experiment))
    }

    /// Number of record files in a dataset (0 for a missing directory).
    pub fn record_count(&self, experiment: &str, dataset_id: &str) -> usize {
        let Ok(entries) = read_dir(self.dataset_dir(experiment, dataset_id)) else {
            return 0;
        };
        entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .count()
    }
}

fn list_subdirs(dir: &Path) -> Result<Vec<String>, AppError> {
    let entries = read_dir(dir)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", dir.display())))?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    Ok(names)
}
