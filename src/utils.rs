use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Create an OSC8 hyperlink for terminal output
pub fn osc8_link(url: &str, text: &str) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, text)
}

/// Create an OSC8 file:// hyperlink for terminal output
pub fn osc8_file_link(path: &str, text: &str) -> String {
    let abs_path = fs::canonicalize(path)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| path.to_string());
    format!("\x1b]8;;file://{}\x1b\\{}\x1b]8;;\x1b\\", abs_path, text)
}

/// Load the internal-id list: one numeric id per line. Blank lines and
/// `#`/`;` comments are skipped, and so are CSV header rows or stray text,
/// so a two-column `code,url` export also works as input.
pub fn load_id_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read id list from {:?}", path))?;

    let mut ids = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let first = line.split(',').next().unwrap_or(line).trim();
        if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) {
            ids.push(first.to_string());
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn id_list_skips_comments_and_headers() {
        let path = std::env::temp_dir().join("orientation-scrape-test-ids.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "# seeded from the links export").unwrap();
        writeln!(file, "ramz_code,ramz_link").unwrap();
        writeln!(file, "122103,https://example.invalid?id=122103").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "210209").unwrap();
        drop(file);

        let ids = load_id_list(&path).unwrap();
        assert_eq!(ids, vec!["122103".to_string(), "210209".to_string()]);
        fs::remove_file(&path).ok();
    }
}
