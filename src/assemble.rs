//! Record assembly.
//!
//! Merges extractor output, the normalized score series, and the
//! geographic-distribution lookup into one fixed-shape record. Partial
//! records are kept: every field except the identifying code degrades to
//! empty/sentinel rather than dropping the record.

use std::collections::{BTreeMap, HashMap};

use crate::error::ScrapeError;
use crate::reference::ReferenceList;
use crate::types::SpecializationRecord;

fn field(fields: &HashMap<&'static str, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

/// The internal id is the bac-type digit followed by the specialization
/// code, so `122103` codes bac type `1`, specialization `22103`.
fn derive_code(internal_id: &str) -> Option<String> {
    if internal_id.len() >= 2 && internal_id.chars().all(|c| c.is_ascii_digit()) {
        Some(internal_id[1..].to_string())
    } else {
        None
    }
}

fn derive_bac_type_id(internal_id: &str) -> String {
    internal_id
        .chars()
        .next()
        .filter(|c| c.is_ascii_digit())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

/// Assemble one record.
///
/// Fails only when the code is neither on the page nor derivable from the
/// id; everything else degrades gracefully.
pub fn assemble(
    internal_id: &str,
    source_url: &str,
    fields: &HashMap<&'static str, String>,
    historical_scores: BTreeMap<u16, f64>,
    reference: &ReferenceList,
) -> Result<SpecializationRecord, ScrapeError> {
    let extracted_code = field(fields, "code");
    let code = if !extracted_code.is_empty() {
        extracted_code
    } else {
        derive_code(internal_id)
            .ok_or_else(|| ScrapeError::IncompleteRecord(internal_id.to_string()))?
    };

    let geographic_distribution_eligible = reference.is_eligible(&code);

    Ok(SpecializationRecord {
        code,
        internal_id: internal_id.to_string(),
        source_url: source_url.to_string(),
        university_id: field(fields, "university_id"),
        university_name: field(fields, "university_name"),
        bac_type_id: derive_bac_type_id(internal_id),
        bac_type_name: field(fields, "bac_type_name"),
        field_of_study: field(fields, "field_of_study"),
        historical_scores,
        geographic_distribution_eligible,
        admission_criteria: field(fields, "admission_criteria"),
        institution_name: field(fields, "institution_name"),
        location_name: field(fields, "location_name"),
        specialization_detail: field(fields, "specialization_detail"),
    })
}
