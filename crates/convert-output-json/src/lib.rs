//! JSON output plugin: writes the text with its non-blank lines and counts.

use serde::Serialize;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;

pub struct JsonOutputPlugin;

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    content: &'a str,
    lines: Vec<&'a str>,
    /// Number of non-blank lines.
    line_count: usize,
    character_count: usize,
}

impl OutputPlugin for JsonOutputPlugin {
    fn name(&self) -> &str {
        "JSON Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Json
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        let lines: Vec<&str> = text.non_blank_lines().collect();
        log::info!("Rendering JSON: {} non-blank lines", lines.len());

        let document = JsonDocument {
            content: text.as_str(),
            line_count: lines.len(),
            lines,
            character_count: text.char_count(),
        };
        serde_json::to_vec_pretty(&document).map_err(|e| ConvertError::render(DocFormat::Json, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_render_fields() {
        let bytes = JsonOutputPlugin
            .render(&NormalizedText::new("héllo\n\n  \nworld"))
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["content"], "héllo\n\n  \nworld");
        assert_eq!(value["lines"], serde_json::json!(["héllo", "world"]));
        assert_eq!(value["line_count"], 2);
        assert_eq!(value["character_count"], 15);
    }

    #[test]
    fn test_pretty_and_unicode_preserved() {
        let bytes = JsonOutputPlugin.render(&NormalizedText::new("naïve")).unwrap();
        let out = String::from_utf8(bytes).unwrap();
        assert!(out.starts_with("{\n  \"content\": \"naïve\""));
        let keys: Vec<&str> = ["content", "lines", "line_count", "character_count"].to_vec();
        let mut last = 0;
        for key in keys {
            let pos = out.find(&format!("\"{}\"", key)).unwrap();
            assert!(pos >= last);
            last = pos;
        }
    }
}
