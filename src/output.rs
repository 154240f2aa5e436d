//! Dataset output.
//!
//! Every run writes two equivalent serializations side by side: a nested
//! JSON encoding where `historical_scores` stays a real object, and a flat
//! CSV encoding where the score series rides in one JSON-string column.
//! Readers for both exist so a dataset can be verified after the fact.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::pool::Failure;
use crate::types::{FlatRecord, SpecializationRecord};

pub const JSON_FILE: &str = "dataset.json";
pub const CSV_FILE: &str = "dataset.csv";
pub const REPORT_FILE: &str = "run_report.json";

/// End-of-run summary written beside the dataset.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RunReport {
    pub started_at: String,
    pub finished_at: String,
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<Failure>,
}

/// Write both encodings into `dir`, returning the two file paths.
pub fn write_dataset(dir: &Path, records: &[SpecializationRecord]) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;

    let json_path = dir.join(JSON_FILE);
    let json = serde_json::to_string_pretty(records)?;
    fs::write(&json_path, json)
        .with_context(|| format!("Failed to write {:?}", json_path))?;

    let csv_path = dir.join(CSV_FILE);
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("Failed to write {:?}", csv_path))?;
    for record in records {
        writer.serialize(record.flatten()?)?;
    }
    writer.flush()?;

    Ok((json_path, csv_path))
}

pub fn write_report(dir: &Path, report: &RunReport) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;
    let path = dir.join(REPORT_FILE);
    fs::write(&path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(path)
}

pub fn read_json(path: &Path) -> Result<Vec<SpecializationRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

pub fn read_csv(path: &Path) -> Result<Vec<SpecializationRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let mut records = Vec::new();
    for row in reader.deserialize::<FlatRecord>() {
        let flat = row.with_context(|| format!("Bad row in {:?}", path))?;
        records.push(flat.unflatten()?);
    }
    Ok(records)
}

/// Re-read a written dataset and check its invariants: both encodings hold
/// the same record set, codes are unique, every score series covers exactly
/// the supported year range, and every score is inside the valid bound.
pub fn run_verify(dir: &Path) -> Result<()> {
    use crate::types::{supported_years, MAX_VALID_SCORE};

    let json_records = read_json(&dir.join(JSON_FILE))?;
    let csv_records = read_csv(&dir.join(CSV_FILE))?;

    if !same_record_set(&json_records, &csv_records) {
        anyhow::bail!("JSON and CSV encodings disagree");
    }

    let mut codes = std::collections::HashSet::new();
    for record in &json_records {
        if !codes.insert(record.code.as_str()) {
            anyhow::bail!("Duplicate code {} in dataset", record.code);
        }
        let years: Vec<u16> = record.historical_scores.keys().copied().collect();
        let expected: Vec<u16> = supported_years().collect();
        if years != expected {
            anyhow::bail!("Record {} has wrong score years {:?}", record.code, years);
        }
        for (&year, &score) in &record.historical_scores {
            if !(0.0..=MAX_VALID_SCORE).contains(&score) {
                anyhow::bail!("Record {} has out-of-bound score {} for {}", record.code, score, year);
            }
        }
    }

    let eligible = json_records
        .iter()
        .filter(|r| r.geographic_distribution_eligible)
        .count();
    println!(
        "OK: {} records, {} eligible for geographic distribution, encodings agree",
        json_records.len(),
        eligible
    );
    Ok(())
}

/// Order-independent record-set equality, keyed by `code`.
pub fn same_record_set(a: &[SpecializationRecord], b: &[SpecializationRecord]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let by_code: HashMap<&str, &SpecializationRecord> =
        a.iter().map(|r| (r.code.as_str(), r)).collect();
    b.iter()
        .all(|r| by_code.get(r.code.as_str()).is_some_and(|other| *other == r))
}
