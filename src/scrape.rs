//! Full scrape run: id list → worker pool → dataset files.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use reqwest::blocking::Client;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ScrapeError;
use crate::output::{self, RunReport};
use crate::pool::{self, PoolConfig};
use crate::reference::ReferenceList;
use crate::types::SpecializationRecord;
use crate::utils::{load_id_list, osc8_file_link};
use crate::{assemble, extract, fetch, scores};

/// Everything one run needs, threaded explicitly instead of ambient state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub ids_path: PathBuf,
    pub reference_path: PathBuf,
    pub output_dir: PathBuf,
    pub base_url: String,
    pub workers: usize,
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub limit: Option<usize>,
    pub quiet: bool,
}

/// One id through the whole pipeline: fetch, extract, normalize, assemble.
pub fn process_id(
    client: &Client,
    base_url: &str,
    timeout_secs: u64,
    reference: &ReferenceList,
    internal_id: &str,
) -> Result<SpecializationRecord, ScrapeError> {
    let html = fetch::fetch_page(client, base_url, internal_id, timeout_secs)?;
    let fields = extract::extract_fields(&html)?;
    let historical_scores = scores::normalize(&extract::score_fragment(&html));
    assemble::assemble(
        internal_id,
        &fetch::detail_url(base_url, internal_id),
        &fields,
        historical_scores,
        reference,
    )
}

pub fn run_scrape(cfg: RunConfig) -> Result<()> {
    let started_at = Utc::now();

    let reference = ReferenceList::load(&cfg.reference_path)?;
    if !cfg.quiet {
        println!(
            "Loaded {} excluded code suffixes from {:?}",
            reference.len(),
            cfg.reference_path
        );
    }

    let mut ids = load_id_list(&cfg.ids_path)?;
    if let Some(limit) = cfg.limit {
        ids.truncate(limit);
    }
    if ids.is_empty() {
        bail!("No ids found in {:?}", cfg.ids_path);
    }

    let requested = ids.len();
    if !cfg.quiet {
        println!(
            "Scraping {} detail pages with {} workers ({}ms delay)...\n",
            requested, cfg.workers, cfg.delay_ms
        );
    }

    let reference = Arc::new(reference);
    let base_url = cfg.base_url.clone();
    let timeout_secs = cfg.timeout_secs;

    let outcome = pool::run_pool(
        ids,
        &PoolConfig {
            workers: cfg.workers,
            delay_ms: cfg.delay_ms,
            quiet: cfg.quiet,
        },
        move |internal_id: &str| {
            let client = fetch::build_client(timeout_secs)
                .map_err(|e| ScrapeError::Network(e.to_string()))?;
            process_id(&client, &base_url, timeout_secs, &reference, internal_id)
        },
    );

    if outcome.records.is_empty() {
        bail!(
            "All {} ids failed; source unreachable or markup unusable",
            requested
        );
    }

    let (json_path, csv_path) = output::write_dataset(&cfg.output_dir, &outcome.records)
        .context("Failed to write dataset")?;

    let report = RunReport {
        started_at: started_at.to_rfc3339(),
        finished_at: Utc::now().to_rfc3339(),
        requested,
        succeeded: outcome.records.len(),
        failed: outcome.failures.len(),
        failures: outcome.failures.clone(),
    };
    let report_path = output::write_report(&cfg.output_dir, &report)?;

    if !cfg.quiet {
        println!(
            "\nDone! {} records, {} permanent failures",
            report.succeeded, report.failed
        );
        if !outcome.failures.is_empty() {
            let ids: Vec<&str> = outcome
                .failures
                .iter()
                .map(|f| f.internal_id.as_str())
                .collect();
            println!("Failed ids: {}", ids.join(", "));
        }
        println!(
            "Saved {} / {} / {}",
            osc8_file_link(&json_path.to_string_lossy(), output::JSON_FILE),
            osc8_file_link(&csv_path.to_string_lossy(), output::CSV_FILE),
            osc8_file_link(&report_path.to_string_lossy(), output::REPORT_FILE),
        );
    }

    Ok(())
}
