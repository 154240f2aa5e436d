//! Scraper for the Tunisian university orientation guide.
//!
//! Turns the public detail pages (one per specialization, Arabic labeled
//! tables plus an embedded historical-score series) into a schema-stable
//! dataset published as nested JSON and flat CSV.

pub mod assemble;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod pool;
pub mod reference;
pub mod scores;
pub mod scrape;
pub mod types;
pub mod utils;

pub use types::*;
