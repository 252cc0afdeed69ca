//! Raw record flattening and normalization.
//!
//! This module turns stored bitstring records into clean `Record` rows that
//! are safe to fit.
//!
//! Design goals:
//! - **Row-level validation** (skip bad records, but report what happened)
//! - **Deterministic behavior** (rows sorted by angle, records by qubit)
//! - **Separation of concerns**: no fitting logic here

use crate::data::store::RawRecord;
use crate::domain::{FitConfig, Record};
use crate::error::AppError;
use crate::math::z_expectation;

/// Summary stats about the rows actually used for fitting.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_records: usize,
    pub n_settings: usize,
    pub theta_min: f64,
    pub theta_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

/// A record-level error encountered during flattening.
#[derive(Debug, Clone)]
pub struct RecordError {
    pub qubit: String,
    pub message: String,
}

/// Ingest output: flattened rows + stats + record errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<Record>,
    pub stats: DatasetStats,
    pub record_errors: Vec<RecordError>,
    pub records_read: usize,
    pub records_used: usize,
}

/// Flatten raw stored records into fit-ready rows, applying angle filters.
pub fn flatten_records(raw: &[RawRecord], config: &FitConfig) -> Result<IngestedData, AppError> {
    let records_read = raw.len();
    let mut records = Vec::with_capacity(raw.len());
    let mut record_errors = Vec::new();

    for r in raw {
        match flatten_one(r, config) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => record_errors.push(RecordError {
                qubit: r.qubit.to_string(),
                message: "No sweep settings remain after angle filtering.".to_string(),
            }),
            Err(message) => record_errors.push(RecordError {
                qubit: r.qubit.to_string(),
                message,
            }),
        }
    }

    records.sort_by_key(|r| r.qubit);

    let records_used = records.len();
    if records_used == 0 {
        return Err(AppError::new(
            3,
            "No valid records remain after validation/filtering.",
        ));
    }

    let stats = compute_stats(&records)
        .ok_or_else(|| AppError::new(3, "No valid settings remain after validation/filtering."))?;

    Ok(IngestedData {
        records,
        stats,
        record_errors,
        records_read,
        records_used,
    })
}

fn flatten_one(raw: &RawRecord, config: &FitConfig) -> Result<Option<Record>, String> {
    if raw.thetas.is_empty() {
        return Err("Record has no sweep angles.".to_string());
    }
    if raw.thetas.len() != raw.bitstrings.len() {
        return Err(format!(
            "Mismatched arrays: {} angles vs {} bitstring sets.",
            raw.thetas.len(),
            raw.bitstrings.len()
        ));
    }
    if raw.thetas.iter().any(|t| !t.is_finite()) {
        return Err("Non-finite sweep angle.".to_string());
    }

    let mut shots = 0usize;
    let mut rows: Vec<(f64, f64)> = Vec::with_capacity(raw.thetas.len());
    for (i, (&theta, bits)) in raw.thetas.iter().zip(raw.bitstrings.iter()).enumerate() {
        if let Some(&bad) = bits.iter().find(|&&b| b > 1) {
            return Err(format!("Non-binary measurement value {bad} at setting {i}."));
        }
        let z = z_expectation(bits)
            .ok_or_else(|| format!("Empty shot list at setting {i}."))?;
        shots = shots.max(bits.len());

        if let Some(min) = config.theta_min {
            if theta < min {
                continue;
            }
        }
        if let Some(max) = config.theta_max {
            if theta > max {
                continue;
            }
        }
        rows.push((theta, z));
    }

    if rows.is_empty() {
        return Ok(None);
    }

    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let (thetas, z_vals): (Vec<f64>, Vec<f64>) = rows.into_iter().unzip();

    Ok(Some(Record {
        qubit: raw.qubit,
        collected: raw.collected,
        thetas,
        z_vals,
        shots,
    }))
}

fn compute_stats(records: &[Record]) -> Option<DatasetStats> {
    let mut n_settings = 0usize;
    let mut theta_min = f64::INFINITY;
    let mut theta_max = f64::NEG_INFINITY;
    let mut z_min = f64::INFINITY;
    let mut z_max = f64::NEG_INFINITY;

    for r in records {
        n_settings += r.thetas.len();
        for &t in &r.thetas {
            theta_min = theta_min.min(t);
            theta_max = theta_max.max(t);
        }
        for &z in &r.z_vals {
            z_min = z_min.min(z);
            z_max = z_max.max(z);
        }
    }

    if !theta_min.is_finite() || !theta_max.is_finite() || !z_min.is_finite() || !z_max.is_finite() {
        return None;
    }

    Some(DatasetStats {
        n_records: records.len(),
        n_settings,
        theta_min,
        theta_max,
        z_min,
        z_max,
    })
}
