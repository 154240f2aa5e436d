//! Detail-page fetching.

use reqwest::blocking::Client;
use std::time::Duration;

use crate::error::ScrapeError;

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; OrientationScraper/1.0)";
pub const DEFAULT_BASE_URL: &str = "https://guide-orientation.rnu.tn/ar/dynamique/filiere.php";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Address of the detail page for one internal id.
pub fn detail_url(base_url: &str, internal_id: &str) -> String {
    format!("{}?id={}", base_url, internal_id)
}

/// Build a client with the scraper user-agent and a hard request timeout.
/// One client per worker thread; clients are not shared across threads.
pub fn build_client(timeout_secs: u64) -> anyhow::Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch one detail page and return its raw markup.
///
/// A single attempt: no retry here, that policy belongs to the worker loop.
/// The politeness delay between calls is also owned by the caller.
pub fn fetch_page(
    client: &Client,
    base_url: &str,
    internal_id: &str,
    timeout_secs: u64,
) -> Result<String, ScrapeError> {
    let url = detail_url(base_url, internal_id);

    let response = client.get(&url).send().map_err(|e| {
        if e.is_timeout() {
            ScrapeError::Timeout(timeout_secs)
        } else {
            ScrapeError::Network(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::HttpStatus { status, url });
    }

    response.text().map_err(|e| {
        if e.is_timeout() {
            ScrapeError::Timeout(timeout_secs)
        } else {
            ScrapeError::Network(e.to_string())
        }
    })
}
