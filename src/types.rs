//! Record types for the orientation dataset with JSON/CSV serialization support

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First year covered by the historical score series
pub const FIRST_SCORE_YEAR: u16 = 2011;
/// Last year covered by the historical score series
pub const LAST_SCORE_YEAR: u16 = 2024;

/// Scores are admission totals; anything outside this bound is bad page data
pub const MAX_VALID_SCORE: f64 = 220.0;
/// Sentinel for missing or invalid score entries
pub const MISSING_SCORE: f64 = 0.0;

/// All years in the supported range, oldest first
pub fn supported_years() -> impl Iterator<Item = u16> {
    FIRST_SCORE_YEAR..=LAST_SCORE_YEAR
}

/// One university specialization offering, fully assembled.
///
/// `historical_scores` always contains every year in
/// `FIRST_SCORE_YEAR..=LAST_SCORE_YEAR`, with `MISSING_SCORE` filling gaps,
/// so every record serializes to an identical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecializationRecord {
    pub code: String,
    pub internal_id: String,
    pub source_url: String,
    pub university_id: String,
    pub university_name: String,
    pub bac_type_id: String,
    pub bac_type_name: String,
    pub field_of_study: String,
    pub historical_scores: BTreeMap<u16, f64>,
    pub geographic_distribution_eligible: bool,
    pub admission_criteria: String,
    pub institution_name: String,
    pub location_name: String,
    pub specialization_detail: String,
}

/// Flat row shape for the CSV encoding.
///
/// Identical to `SpecializationRecord` except `historical_scores` is carried
/// as a JSON-object string in a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatRecord {
    pub code: String,
    pub internal_id: String,
    pub source_url: String,
    pub university_id: String,
    pub university_name: String,
    pub bac_type_id: String,
    pub bac_type_name: String,
    pub field_of_study: String,
    pub historical_scores: String,
    pub geographic_distribution_eligible: bool,
    pub admission_criteria: String,
    pub institution_name: String,
    pub location_name: String,
    pub specialization_detail: String,
}

impl SpecializationRecord {
    pub fn flatten(&self) -> anyhow::Result<FlatRecord> {
        Ok(FlatRecord {
            code: self.code.clone(),
            internal_id: self.internal_id.clone(),
            source_url: self.source_url.clone(),
            university_id: self.university_id.clone(),
            university_name: self.university_name.clone(),
            bac_type_id: self.bac_type_id.clone(),
            bac_type_name: self.bac_type_name.clone(),
            field_of_study: self.field_of_study.clone(),
            historical_scores: serde_json::to_string(&self.historical_scores)?,
            geographic_distribution_eligible: self.geographic_distribution_eligible,
            admission_criteria: self.admission_criteria.clone(),
            institution_name: self.institution_name.clone(),
            location_name: self.location_name.clone(),
            specialization_detail: self.specialization_detail.clone(),
        })
    }
}

impl FlatRecord {
    pub fn unflatten(&self) -> anyhow::Result<SpecializationRecord> {
        let historical_scores: BTreeMap<u16, f64> =
            serde_json::from_str(&self.historical_scores)?;
        Ok(SpecializationRecord {
            code: self.code.clone(),
            internal_id: self.internal_id.clone(),
            source_url: self.source_url.clone(),
            university_id: self.university_id.clone(),
            university_name: self.university_name.clone(),
            bac_type_id: self.bac_type_id.clone(),
            bac_type_name: self.bac_type_name.clone(),
            field_of_study: self.field_of_study.clone(),
            historical_scores,
            geographic_distribution_eligible: self.geographic_distribution_eligible,
            admission_criteria: self.admission_criteria.clone(),
            institution_name: self.institution_name.clone(),
            location_name: self.location_name.clone(),
            specialization_detail: self.specialization_detail.clone(),
        })
    }
}
