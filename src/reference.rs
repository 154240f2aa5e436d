//! Geographic-distribution reference list.
//!
//! The ministry publishes the 3-digit code suffixes that do NOT benefit
//! from the geographic-distribution admission rule. The flag on a record is
//! always computed from this list, never scraped; the page fragment for it
//! is unreliable.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Code suffixes excluded from geographic distribution.
#[derive(Debug, Clone, Default)]
pub struct ReferenceList {
    excluded_suffixes: HashSet<String>,
}

impl ReferenceList {
    /// Load the reference CSV. Each data line carries a 3-digit code in its
    /// second column (or as the sole column); blank lines and `#`/`;`
    /// comment lines are skipped, as is a header row.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference list from {:?}", path))?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut excluded_suffixes = HashSet::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let column = match line.split_once(',') {
                Some((_, second)) => second.split(',').next().unwrap_or(second),
                None => line,
            };
            let code = column.trim();
            if code.len() == 3 && code.chars().all(|c| c.is_ascii_digit()) {
                excluded_suffixes.insert(code.to_string());
            }
        }
        Self { excluded_suffixes }
    }

    pub fn len(&self) -> usize {
        self.excluded_suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.excluded_suffixes.is_empty()
    }

    /// Whether a specialization code benefits from geographic distribution.
    /// Pure function of the code's last three digits against the list.
    pub fn is_eligible(&self, code: &str) -> bool {
        let suffix = if code.len() >= 3 {
            &code[code.len() - 3..]
        } else {
            code
        };
        !self.excluded_suffixes.contains(suffix)
    }
}
