//! End-to-end pipeline tests driven by fixture detail pages.
//! No live network: fixtures stand in for the fetched markup.

use std::fs;
use std::path::Path;

use orientation_scrape::assemble::assemble;
use orientation_scrape::error::ScrapeError;
use orientation_scrape::extract::{extract_fields, score_fragment};
use orientation_scrape::output;
use orientation_scrape::pool::{run_pool, PoolConfig};
use orientation_scrape::reference::ReferenceList;
use orientation_scrape::scores;
use orientation_scrape::types::{supported_years, SpecializationRecord, MISSING_SCORE};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture readable")
}

fn assemble_fixture(
    internal_id: &str,
    name: &str,
    reference: &ReferenceList,
) -> Result<SpecializationRecord, ScrapeError> {
    let html = fixture(name);
    let fields = extract_fields(&html)?;
    let series = scores::normalize(&score_fragment(&html));
    let url = format!(
        "https://guide-orientation.rnu.tn/ar/dynamique/filiere.php?id={}",
        internal_id
    );
    assemble(internal_id, &url, &fields, series, reference)
}

#[test]
fn full_detail_page_assembles_expected_record() {
    let reference = ReferenceList::parse("103\n");
    let record = assemble_fixture("122103", "filiere_122103.html", &reference).unwrap();

    assert_eq!(record.code, "22103");
    assert_eq!(record.internal_id, "122103");
    assert_eq!(record.bac_type_id, "1");
    assert_eq!(record.university_id, "12");
    assert_eq!(record.university_name, "جامعة تونس");
    assert_eq!(record.bac_type_name, "آداب");
    assert_eq!(record.field_of_study, "الآداب واللغات");
    assert_eq!(record.location_name, "تونس");

    assert_eq!(record.historical_scores.len(), 14);
    assert_eq!(record.historical_scores[&2024], 137.4415);
    for year in supported_years().filter(|&y| y != 2024) {
        assert_eq!(record.historical_scores[&year], MISSING_SCORE);
    }

    // suffix 103 is on the exclusion list
    assert!(!record.geographic_distribution_eligible);
}

#[test]
fn missing_score_section_still_fills_every_year() {
    let record =
        assemble_fixture("210209", "filiere_no_scores.html", &ReferenceList::default()).unwrap();

    assert_eq!(record.code, "10209");
    assert_eq!(record.historical_scores.len(), 14);
    assert!(record
        .historical_scores
        .values()
        .all(|&score| score == MISSING_SCORE));
}

#[test]
fn eligibility_depends_only_on_reference_list() {
    let excluded = ReferenceList::parse("103\n");
    let empty = ReferenceList::default();

    let flagged = assemble_fixture("122103", "filiere_122103.html", &excluded).unwrap();
    let unflagged = assemble_fixture("122103", "filiere_122103.html", &empty).unwrap();

    assert!(!flagged.geographic_distribution_eligible);
    assert!(unflagged.geographic_distribution_eligible);

    // everything except the derived flag is identical
    let mut flagged_neutral = flagged.clone();
    flagged_neutral.geographic_distribution_eligible = true;
    assert_eq!(flagged_neutral, unflagged);
}

#[test]
fn dataset_round_trip_through_both_encodings() {
    let reference = ReferenceList::parse("103\n");
    let records = vec![
        assemble_fixture("122103", "filiere_122103.html", &reference).unwrap(),
        assemble_fixture("210209", "filiere_no_scores.html", &reference).unwrap(),
    ];

    let dir = std::env::temp_dir().join("orientation-scrape-e2e-roundtrip");
    let (json_path, csv_path) = output::write_dataset(&dir, &records).unwrap();

    let from_json = output::read_json(&json_path).unwrap();
    let from_csv = output::read_csv(&csv_path).unwrap();

    assert!(output::same_record_set(&records, &from_json));
    assert!(output::same_record_set(&records, &from_csv));
    assert!(output::same_record_set(&from_json, &from_csv));

    // multi-byte Arabic text survives both encodings
    assert!(from_csv.iter().any(|r| r.university_name == "جامعة تونس"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn pool_run_excludes_only_the_failing_id() {
    let reference = ReferenceList::parse("103\n");
    let ids: Vec<String> = vec!["122103".into(), "210209".into(), "999999".into()];

    let outcome = run_pool(
        ids,
        &PoolConfig {
            workers: 2,
            delay_ms: 0,
            quiet: true,
        },
        move |internal_id: &str| match internal_id {
            "122103" => assemble_fixture(internal_id, "filiere_122103.html", &reference),
            "210209" => assemble_fixture(internal_id, "filiere_no_scores.html", &reference),
            // this id times out on every attempt
            _ => Err(ScrapeError::Timeout(15)),
        },
    );

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].internal_id, "999999");

    let mut codes: Vec<&str> = outcome.records.iter().map(|r| r.code.as_str()).collect();
    codes.sort();
    assert_eq!(codes, vec!["10209", "22103"]);
}
