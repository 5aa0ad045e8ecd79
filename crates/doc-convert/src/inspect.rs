//! Metadata inspection for stored files.

use std::path::Path;

use log::debug;

use convert_core::metadata::MetadataRecord;
use convert_core::pipeline::extract_with;

use crate::registry;

/// Describe the file at `path`, read as `extension`.
///
/// Never fails: a missing file, an unknown extension or a parse failure is
/// recorded as `valid = false` with the cause in `error`.
pub fn inspect(path: &Path, extension: &str) -> MetadataRecord {
    let mut record = MetadataRecord::new(extension.trim_start_matches('.').to_lowercase());

    match std::fs::metadata(path) {
        Ok(meta) => record.size = meta.len(),
        Err(e) => {
            record.fail(e);
            return record;
        }
    }

    let parser = match registry::parser_for_tag(extension) {
        Ok(parser) => parser,
        Err(e) => {
            record.fail(e);
            return record;
        }
    };

    match extract_with(parser, path) {
        Ok(text) => {
            record.valid = true;
            record.character_count = Some(text.char_count());
            record.line_count = Some(text.line_count());
        }
        Err(e) => {
            record.fail(e);
            return record;
        }
    }

    for count in parser.probe(path) {
        debug!("{} probe: {:?}", parser.name(), count);
        record.apply(count);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "héllo\nworld\n").unwrap();

        let record = inspect(&path, "txt");
        assert!(record.valid);
        assert_eq!(record.size, 13);
        assert_eq!(record.character_count, Some(12));
        assert_eq!(record.line_count, Some(3));
        assert!(record.error.is_none());
    }

    #[test]
    fn test_corrupt_json_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"a\": [1, 2").unwrap();

        let record = inspect(&path, "json");
        assert!(!record.valid);
        assert!(!record.error.as_deref().unwrap_or_default().is_empty());
        assert_eq!(record.size, 11);
        assert!(record.character_count.is_none());
        assert!(record.key_count.is_none());
    }

    #[test]
    fn test_json_structure_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.json");
        std::fs::write(&path, r#"{"a": 1, "b": [true, null]}"#).unwrap();

        let record = inspect(&path, "json");
        assert!(record.valid);
        assert_eq!(record.key_count, Some(2));
        assert!(record.item_count.is_none());
    }

    #[test]
    fn test_csv_structure_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "a,b,c\n1,2,3\n4,5,6\n").unwrap();

        let record = inspect(&path, "csv");
        assert_eq!(record.row_count, Some(3));
        assert_eq!(record.column_count, Some(3));
    }

    #[test]
    fn test_deeply_nested_xml_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.xml");
        let depth = 200_000;
        std::fs::write(&path, format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))).unwrap();

        let record = inspect(&path, "xml");
        assert!(!record.valid);
        assert!(record.error.unwrap().contains("nesting too deep"));
        assert!(record.element_count.is_none());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let record = inspect(&dir.path().join("gone.txt"), "txt");
        assert!(!record.valid);
        assert_eq!(record.size, 0);
        assert!(record.error.is_some());
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.doc");
        std::fs::write(&path, "data").unwrap();

        let record = inspect(&path, "doc");
        assert!(!record.valid);
        assert_eq!(record.size, 4);
        assert!(record.error.unwrap().contains("doc"));
    }
}
