//! Historical score normalization.
//!
//! Detail pages carry the per-year admission scores in whatever shape the
//! site felt like that day: a slash-delimited series
//! (`2011/0/2012/0/.../2024/137.4415/`), loose `year: value` text, or
//! nothing at all. Normalization always yields a complete series over the
//! supported year range so downstream rows line up column for column.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::types::{supported_years, FIRST_SCORE_YEAR, LAST_SCORE_YEAR, MAX_VALID_SCORE, MISSING_SCORE};

fn year_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(20\d{2})\D*?(\d+(?:\.\d+)?)").unwrap())
}

/// Parse a raw score fragment into a year → score map covering every year
/// in the supported range.
///
/// Each year/value pair is parsed independently. A value that fails numeric
/// parsing or lands outside `[0, MAX_VALID_SCORE]` becomes `MISSING_SCORE`
/// rather than failing the record; partial history is expected. Years never
/// mentioned are filled with the sentinel too.
pub fn normalize(fragment: &str) -> BTreeMap<u16, f64> {
    let mut scores: BTreeMap<u16, f64> = supported_years().map(|y| (y, MISSING_SCORE)).collect();

    for caps in year_value_re().captures_iter(fragment) {
        let year: u16 = match caps[1].parse() {
            Ok(y) => y,
            Err(_) => continue,
        };
        if !(FIRST_SCORE_YEAR..=LAST_SCORE_YEAR).contains(&year) {
            continue;
        }
        let value = caps[2]
            .parse::<f64>()
            .ok()
            .filter(|v| (0.0..=MAX_VALID_SCORE).contains(v))
            .unwrap_or(MISSING_SCORE);
        scores.insert(year, value);
    }

    scores
}
