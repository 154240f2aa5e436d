//! Label-driven field extraction from detail pages.
//!
//! The source site renders one specialization per page as a two-column
//! table: Arabic label on the left, value on the right. Extraction is a
//! declarative table of (field, label) pairs evaluated against the parsed
//! document, so new fields are one line here and a fixture update, not new
//! scanning code.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

use crate::error::ScrapeError;

/// A named field and the Arabic label that announces it on the page.
pub struct FieldLabel {
    pub field: &'static str,
    pub label: &'static str,
}

/// Labels observed on filiere detail pages. Order matches the output schema.
pub const FIELD_LABELS: &[FieldLabel] = &[
    FieldLabel { field: "code", label: "رمز الشعبة" },
    FieldLabel { field: "university_id", label: "رمز الجامعة" },
    FieldLabel { field: "university_name", label: "الجامعة" },
    FieldLabel { field: "bac_type_name", label: "نوع الباكالوريا" },
    FieldLabel { field: "field_of_study", label: "مجال التكوين" },
    FieldLabel { field: "admission_criteria", label: "المقياس" },
    FieldLabel { field: "institution_name", label: "المؤسسة" },
    FieldLabel { field: "location_name", label: "الولاية" },
    FieldLabel { field: "specialization_detail", label: "التخصصات" },
];

fn selector(css: &'static str) -> Selector {
    // Selectors here are literals; parse failure is a programming error.
    Selector::parse(css).expect("valid selector literal")
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Value of a labeled row: bold fragments win over the raw cell text,
/// matching how the site marks the actual value inside decorated cells.
fn cell_value(cell: ElementRef) -> String {
    let bold = selector("b");
    let bold_parts: Vec<String> = cell
        .select(&bold)
        .map(|b| cell_text(b))
        .filter(|t| !t.is_empty())
        .collect();
    if !bold_parts.is_empty() {
        return bold_parts.join(" ");
    }
    cell_text(cell)
}

/// Extract every labeled field from raw markup.
///
/// Absent labels yield empty strings; only a page with no table rows at all
/// is an error, since there is then no structure left to scan.
pub fn extract_fields(html: &str) -> Result<HashMap<&'static str, String>, ScrapeError> {
    let document = Html::parse_document(html);
    let row_sel = selector("tr");
    let cell_sel = selector("td");

    let mut fields: HashMap<&'static str, String> = FIELD_LABELS
        .iter()
        .map(|fl| (fl.field, String::new()))
        .collect();

    let mut row_count = 0usize;
    for row in document.select(&row_sel) {
        row_count += 1;
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }
        let label_text = cell_text(cells[0]);
        // Longest matching label wins the row: "رمز الجامعة" must not also
        // feed the plain "الجامعة" field.
        let best = FIELD_LABELS
            .iter()
            .filter(|fl| label_text.contains(fl.label))
            .max_by_key(|fl| fl.label.len());
        if let Some(fl) = best {
            let current = fields.get_mut(fl.field).expect("field present");
            // First match wins; later rows repeating a label are noise.
            if current.is_empty() {
                *current = cell_value(cells[1]);
            }
        }
    }

    if row_count == 0 {
        return Err(ScrapeError::MalformedDocument(
            "no table rows found".to_string(),
        ));
    }

    Ok(fields)
}

/// Collect the raw historical-score fragment: script bodies that mention a
/// year, falling back to the page's visible text. The normalizer does the
/// actual parsing.
pub fn score_fragment(html: &str) -> String {
    let document = Html::parse_document(html);
    let script_sel = selector("script");

    let mut fragment = String::new();
    for script in document.select(&script_sel) {
        let body: String = script.text().collect();
        if body.contains("20") {
            fragment.push_str(&body);
            fragment.push('\n');
        }
    }

    if fragment.trim().is_empty() {
        fragment = document.root_element().text().collect::<Vec<_>>().join(" ");
    }

    fragment
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body><table>
          <tr><td>الجامعة</td><td><b>جامعة تونس</b></td></tr>
          <tr><td>رمز الشعبة</td><td><b>22103</b></td></tr>
          <tr><td>نوع الباكالوريا</td><td>آداب</td></tr>
          <tr><td>الولاية</td><td><b>تونس</b></td></tr>
        </table></body></html>"#;

    #[test]
    fn labeled_fields_are_extracted() {
        let fields = extract_fields(PAGE).unwrap();
        assert_eq!(fields["university_name"], "جامعة تونس");
        assert_eq!(fields["code"], "22103");
        assert_eq!(fields["bac_type_name"], "آداب");
        assert_eq!(fields["location_name"], "تونس");
    }

    #[test]
    fn absent_labels_default_to_empty() {
        let fields = extract_fields(PAGE).unwrap();
        assert_eq!(fields["field_of_study"], "");
        assert_eq!(fields["admission_criteria"], "");
        assert_eq!(fields["specialization_detail"], "");
    }

    #[test]
    fn bold_fragments_win_over_cell_text() {
        let html = r#"<table><tr><td>المؤسسة</td>
            <td>نص مهمل <b>كلية الآداب</b> <b>بتونس</b></td></tr></table>"#;
        let fields = extract_fields(html).unwrap();
        assert_eq!(fields["institution_name"], "كلية الآداب بتونس");
    }

    #[test]
    fn first_labeled_row_wins() {
        let html = r#"<table>
            <tr><td>الجامعة</td><td>جامعة تونس</td></tr>
            <tr><td>الجامعة</td><td>جامعة أخرى</td></tr>
        </table>"#;
        let fields = extract_fields(html).unwrap();
        assert_eq!(fields["university_name"], "جامعة تونس");
    }

    #[test]
    fn university_id_label_does_not_feed_university_name() {
        let html = r#"<table>
            <tr><td>رمز الجامعة</td><td>12</td></tr>
            <tr><td>الجامعة</td><td>جامعة تونس</td></tr>
        </table>"#;
        let fields = extract_fields(html).unwrap();
        assert_eq!(fields["university_id"], "12");
        assert_eq!(fields["university_name"], "جامعة تونس");
    }

    #[test]
    fn rowless_document_is_malformed() {
        let err = extract_fields("<html><body><p>rien</p></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedDocument(_)));
    }

    #[test]
    fn score_fragment_prefers_script_bodies() {
        let html = r#"<html><body>
            <script>var serie = "2023/0/2024/137.4415/";</script>
            <table><tr><td>x</td></tr></table>
        </body></html>"#;
        let fragment = score_fragment(html);
        assert!(fragment.contains("2024/137.4415"));
    }

    #[test]
    fn score_fragment_falls_back_to_page_text() {
        let html = "<html><body><p>2020: 110.5</p></body></html>";
        let fragment = score_fragment(html);
        assert!(fragment.contains("2020: 110.5"));
    }
}
