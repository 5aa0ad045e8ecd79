//! HTML input plugin: extracts the visible body text of an HTML file.

use std::path::Path;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::metadata::StructuralCount;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;
use convert_utils::html;

pub struct HtmlInputPlugin;

impl InputPlugin for HtmlInputPlugin {
    fn name(&self) -> &str {
        "HTML Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Html
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading HTML: {}", input_path.display());
        let content = read_html(input_path)?;
        Ok(NormalizedText::new(html::visible_text(&content)))
    }

    fn probe(&self, input_path: &Path) -> Vec<StructuralCount> {
        let Ok(content) = read_html(input_path) else {
            return Vec::new();
        };
        match html::element_count(&content) {
            Some(n) => vec![StructuralCount::Tags(n)],
            None => Vec::new(),
        }
    }
}

fn read_html(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        ConvertError::parse(
            DocFormat::Html,
            format!("Cannot read {}: {}", path.display(), e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_parse_body_text() {
        let (_dir, path) = write(
            "page.html",
            "<html><head><title>Ignored</title></head><body><h1>Title</h1><p>First para</p><style>.x{}</style><p>Second</p></body></html>",
        );
        let text = HtmlInputPlugin.parse(&path).unwrap();
        assert_eq!(text.as_str(), "Title\nFirst para\nSecond");
    }

    #[test]
    fn test_probe_counts_tags() {
        let (_dir, path) = write("page.html", "<html><head></head><body><p>a</p></body></html>");
        assert_eq!(HtmlInputPlugin.probe(&path), vec![StructuralCount::Tags(4)]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = HtmlInputPlugin.parse(&dir.path().join("nope.html")).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { format: DocFormat::Html, .. }));
        assert!(HtmlInputPlugin.probe(&dir.path().join("nope.html")).is_empty());
    }
}
