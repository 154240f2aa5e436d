//! Bounded worker pool driving the per-id pipeline.
//!
//! Workers pull ids from a shared atomic index and send outcomes over a
//! channel; a single collector owns the aggregate, so no mutable state is
//! shared beyond the work index and the channel. Retries are local to one
//! id and never block other workers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::ScrapeError;
use crate::types::SpecializationRecord;
use crate::utils::osc8_link;

/// Max attempts per id before recording a permanent failure.
pub const RETRY_LIMIT: usize = 3;
/// Jitter added to the politeness delay, per worker request.
const JITTER_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub workers: usize,
    pub delay_ms: u64,
    pub quiet: bool,
}

/// One id that exhausted its retries.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Failure {
    pub internal_id: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct PoolOutcome {
    pub records: Vec<SpecializationRecord>,
    pub failures: Vec<Failure>,
}

fn id_jitter(internal_id: &str) -> u64 {
    let sum: u64 = internal_id.bytes().map(u64::from).sum();
    sum % JITTER_MS
}

/// Run `job` once per id with bounded retries and linear backoff.
fn run_job_with_retry<F>(
    job: &F,
    internal_id: &str,
    delay_ms: u64,
) -> Result<SpecializationRecord, ScrapeError>
where
    F: Fn(&str) -> Result<SpecializationRecord, ScrapeError>,
{
    let mut attempt = 1;
    loop {
        match job(internal_id) {
            Ok(record) => return Ok(record),
            Err(e) if e.is_retryable() && attempt < RETRY_LIMIT => {
                thread::sleep(Duration::from_millis(delay_ms * attempt as u64));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Drive `job` over every id with a fixed-size worker pool.
///
/// Returns all successful records (deduplicated by `code`, most recently
/// received wins) plus the permanent failures. Output order is completion
/// order, not input order.
pub fn run_pool<F>(ids: Vec<String>, cfg: &PoolConfig, job: F) -> PoolOutcome
where
    F: Fn(&str) -> Result<SpecializationRecord, ScrapeError> + Send + Sync + 'static,
{
    let total = ids.len();
    if total == 0 {
        return PoolOutcome::default();
    }

    let ids = Arc::new(ids);
    let job = Arc::new(job);
    let next = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel::<Result<SpecializationRecord, Failure>>();

    let workers = cfg.workers.min(total).max(1);
    let delay_ms = cfg.delay_ms;

    for _ in 0..workers {
        let ids = Arc::clone(&ids);
        let job = Arc::clone(&job);
        let next = Arc::clone(&next);
        let tx = tx.clone();

        thread::spawn(move || loop {
            let i = next.fetch_add(1, Ordering::Relaxed);
            if i >= ids.len() {
                break;
            }
            let internal_id = &ids[i];
            let result = run_job_with_retry(job.as_ref(), internal_id, delay_ms)
                .map_err(|e| Failure {
                    internal_id: internal_id.clone(),
                    error: e.to_string(),
                });
            if tx.send(result).is_err() {
                break;
            }
            // be polite
            thread::sleep(Duration::from_millis(delay_ms + id_jitter(internal_id)));
        });
    }
    drop(tx); // main thread is sole receiver now

    let mut by_code: HashMap<String, SpecializationRecord> = HashMap::new();
    let mut failures = Vec::new();

    for done in 1..=total {
        match rx.recv() {
            Ok(Ok(record)) => {
                if !cfg.quiet {
                    println!(
                        "[{:03}/{:03}] {} {}",
                        done,
                        total,
                        osc8_link(&record.source_url, &record.code),
                        record.university_name
                    );
                }
                // re-fetches of the same code supersede the older record
                by_code.insert(record.code.clone(), record);
            }
            Ok(Err(failure)) => {
                if !cfg.quiet {
                    eprintln!(
                        "[{:03}/{:03}] {} failed: {}",
                        done, total, failure.internal_id, failure.error
                    );
                }
                failures.push(failure);
            }
            Err(_) => break, // workers ended early; bail gracefully
        }
    }

    PoolOutcome {
        records: by_code.into_values().collect(),
        failures,
    }
}
