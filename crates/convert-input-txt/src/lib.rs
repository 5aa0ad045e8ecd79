//! TXT input plugin: reads UTF-8 plain text as-is.

use std::path::Path;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;

pub struct TxtInputPlugin;

impl InputPlugin for TxtInputPlugin {
    fn name(&self) -> &str {
        "TXT Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Txt
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading text: {}", input_path.display());

        let bytes = std::fs::read(input_path).map_err(|e| {
            ConvertError::parse(
                DocFormat::Txt,
                format!("Cannot read {}: {}", input_path.display(), e),
            )
        })?;

        let content = String::from_utf8(bytes)
            .map_err(|e| ConvertError::parse(DocFormat::Txt, format!("Invalid UTF-8: {}", e)))?;

        Ok(NormalizedText::new(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "Hello World\n\n  indented\n").unwrap();

        let text = TxtInputPlugin.parse(&path).unwrap();
        assert_eq!(text.as_str(), "Hello World\n\n  indented\n");
    }

    #[test]
    fn test_empty_file_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();
        assert!(TxtInputPlugin.parse(&path).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"caf\xe9").unwrap();

        let err = TxtInputPlugin.parse(&path).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { format: DocFormat::Txt, .. }));
    }
}
