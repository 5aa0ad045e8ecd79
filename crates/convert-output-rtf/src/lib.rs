//! RTF output plugin: a single-font RTF document with one `\par` per line.

use convert_core::error::Result;
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;

pub struct RtfOutputPlugin;

const HEADER: &str = "{\\rtf1\\ansi\\deff0 {\\fonttbl {\\f0 Times New Roman;}}\n\\f0\\fs24\n";

impl OutputPlugin for RtfOutputPlugin {
    fn name(&self) -> &str {
        "RTF Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Rtf
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        log::info!("Rendering RTF: {} lines", text.line_count());

        let mut rtf = String::with_capacity(HEADER.len() + text.as_str().len() * 2);
        rtf.push_str(HEADER);
        rtf.push_str(&escape_rtf(text.as_str()));
        rtf.push_str("\n}");
        Ok(rtf.into_bytes())
    }
}

/// Escape RTF control characters. Characters outside ASCII become `\uN?`
/// escapes so the output stays 7-bit clean.
fn escape_rtf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\par\n"),
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    // \u takes a signed 16-bit value
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_rtf() {
        assert_eq!(escape_rtf(r"a\b{c}"), r"a\\b\{c\}");
        assert_eq!(escape_rtf("one\ntwo"), "one\\par\ntwo");
        assert_eq!(escape_rtf("é"), "\\u233?");
    }

    #[test]
    fn test_render_document() {
        let bytes = RtfOutputPlugin
            .render(&NormalizedText::new("Hello\nWorld"))
            .unwrap();
        let rtf = String::from_utf8(bytes).unwrap();
        assert!(rtf.starts_with("{\\rtf1\\ansi\\deff0 {\\fonttbl {\\f0 Times New Roman;}}"));
        assert!(rtf.contains("Hello\\par\nWorld"));
        assert!(rtf.ends_with("\n}"));
    }

    #[test]
    fn test_output_parses() {
        let bytes = RtfOutputPlugin
            .render(&NormalizedText::new("Readable text"))
            .unwrap();
        let rtf = String::from_utf8(bytes).unwrap();
        let tokens = rtf_parser::Lexer::scan(&rtf).unwrap();
        let doc = rtf_parser::Parser::new(tokens).parse().unwrap();
        let body: String = doc.body.iter().map(|b| b.text.as_str()).collect();
        assert!(body.contains("Readable text"));
    }
}
