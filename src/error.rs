use reqwest::StatusCode;

/// Per-id failure taxonomy for the scrape pipeline.
///
/// Everything except `IncompleteRecord` is considered transient and worth
/// retrying; a record whose identifying code cannot be determined will not
/// improve on a second fetch.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("unexpected status {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },
    #[error("document too malformed to parse: {0}")]
    MalformedDocument(String),
    #[error("no specialization code for id {0}")]
    IncompleteRecord(String),
}

impl ScrapeError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ScrapeError::IncompleteRecord(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_record_is_permanent() {
        assert!(!ScrapeError::IncompleteRecord("122103".to_string()).is_retryable());
        assert!(ScrapeError::Timeout(15).is_retryable());
        assert!(ScrapeError::MalformedDocument("no rows".to_string()).is_retryable());
        assert!(ScrapeError::HttpStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            url: "https://example.invalid".to_string(),
        }
        .is_retryable());
    }
}
