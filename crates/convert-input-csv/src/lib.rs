//! CSV input plugin: one line per record, fields joined with `" | "`.

use std::path::Path;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::metadata::StructuralCount;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;

pub struct CsvInputPlugin;

impl InputPlugin for CsvInputPlugin {
    fn name(&self) -> &str {
        "CSV Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Csv
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading CSV: {}", input_path.display());
        let rows = read_rows(input_path)?;
        Ok(NormalizedText::from_lines(
            rows.iter().map(|row| row.join(" | ")),
        ))
    }

    fn probe(&self, input_path: &Path) -> Vec<StructuralCount> {
        match read_rows(input_path) {
            Ok(rows) => {
                let mut counts = vec![StructuralCount::Rows(rows.len())];
                if let Some(first) = rows.first() {
                    counts.push(StructuralCount::Columns(first.len()));
                }
                counts
            }
            Err(e) => {
                log::debug!("CSV probe skipped: {}", e);
                Vec::new()
            }
        }
    }
}

/// Read every record; no header row, ragged rows allowed.
///
/// The csv reader drops empty lines, so the file is first cut into logical
/// records (a line break inside a quoted field does not end a record) and a
/// blank record becomes an empty row.
fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = std::fs::read(path).map_err(|e| {
        ConvertError::parse(
            DocFormat::Csv,
            format!("Cannot read {}: {}", path.display(), e),
        )
    })?;
    let content = String::from_utf8(bytes)
        .map_err(|e| ConvertError::parse(DocFormat::Csv, format!("Invalid UTF-8: {}", e)))?;

    let mut rows = Vec::new();
    for record in logical_records(&content) {
        if record.is_empty() {
            rows.push(Vec::new());
            continue;
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(record.as_bytes());
        for parsed in reader.records() {
            let parsed = parsed.map_err(|e| ConvertError::parse(DocFormat::Csv, e))?;
            rows.push(parsed.iter().map(str::to_string).collect());
        }
    }
    Ok(rows)
}

/// Join physical lines until the double quotes seen so far are balanced.
fn logical_records(content: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut open = false;

    for (i, line) in content.lines().enumerate() {
        if open {
            current.push('\n');
        } else if i > 0 {
            records.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        if line.matches('"').count() % 2 == 1 {
            open = !open;
        }
    }
    if !content.is_empty() {
        records.push(current);
    }
    records
}
