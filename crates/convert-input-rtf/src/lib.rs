//! RTF input plugin: reads the body text of Rich Text Format files.
//!
//! Uses the `rtf-parser` crate for tokenization and parsing. Bytes are
//! decoded leniently first, honoring a `\ansicpgN` code page when the file
//! is not valid UTF-8.

use std::path::Path;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;
use convert_utils::encoding;
use rtf_parser::{Lexer, Parser};

pub struct RtfInputPlugin;

impl InputPlugin for RtfInputPlugin {
    fn name(&self) -> &str {
        "RTF Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Rtf
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading RTF: {}", input_path.display());
        parse_rtf(input_path)
    }
}

fn parse_rtf(path: &Path) -> Result<NormalizedText> {
    let bytes = std::fs::read(path).map_err(|e| {
        ConvertError::parse(
            DocFormat::Rtf,
            format!("Cannot read {}: {}", path.display(), e),
        )
    })?;
    let content = mark_breaks(&decode(&bytes));

    let tokens = Lexer::scan(&content)
        .map_err(|e| ConvertError::parse(DocFormat::Rtf, format!("RTF lexer error: {:?}", e)))?;

    let doc = Parser::new(tokens)
        .parse()
        .map_err(|e| ConvertError::parse(DocFormat::Rtf, format!("RTF parser error: {:?}", e)))?;

    let raw: String = doc
        .body
        .iter()
        .flat_map(|block| block.text.chars())
        .filter(|c| !matches!(c, '\n' | '\r'))
        .map(|c| if c == BREAK { '\n' } else { c })
        .collect();
    Ok(NormalizedText::new(tidy_lines(&raw)))
}

/// Stands in for a line break while the document goes through the lexer
/// and parser; mapped back to `\n` afterwards.
const BREAK: char = '\u{E000}';

/// Follow every `\par` and `\line` control word with a [`BREAK`] marker.
///
/// Raw newlines in RTF source carry no meaning, so these control words are
/// the only line breaks in the extracted text.
fn mark_breaks(rtf: &str) -> String {
    let mut out = String::with_capacity(rtf.len() + rtf.len() / 16);
    let mut chars = rtf.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if c != '\\' {
            continue;
        }
        let Some(&next) = chars.peek() else {
            break;
        };
        if !next.is_ascii_alphabetic() {
            // control symbol such as \\ \{ \} or \'hh
            out.push(next);
            chars.next();
            continue;
        }

        let mut word = String::new();
        while let Some(&l) = chars.peek() {
            if !l.is_ascii_alphabetic() {
                break;
            }
            word.push(l);
            chars.next();
        }
        out.push_str(&word);

        // optional numeric parameter
        while let Some(&d) = chars.peek() {
            if !(d.is_ascii_digit() || d == '-') {
                break;
            }
            out.push(d);
            chars.next();
        }

        if word == "par" || word == "line" {
            if chars.peek() == Some(&' ') {
                chars.next();
            }
            out.push(' ');
            out.push(BREAK);
        }
    }
    out
}

fn decode(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_err() {
        if let Some(page) = code_page(bytes) {
            if let Some(text) = encoding::decode_with_encoding(bytes, &format!("windows-{}", page)) {
                return text;
            }
        }
    }
    let (text, detected) = encoding::decode_to_utf8(bytes);
    log::debug!("RTF decoded as {}", detected);
    text
}

/// Code page number from an `\ansicpgN` control word in the header.
fn code_page(bytes: &[u8]) -> Option<u32> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let start = head.find("\\ansicpg")? + "\\ansicpg".len();
    let digits: String = head[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Trim whitespace around each line, collapse runs of blank lines into one
/// and drop blank lines at either end.
fn tidy_lines(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines().map(str::trim) {
        let blank = line.is_empty();
        if blank && lines.last().map_or(true, |last| last.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.rtf");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_parse_simple_rtf() {
        let rtf = r"{\rtf1\ansi{\fonttbl\f0 Times New Roman;}
\f0\fs24 Hello, world! This is a test document.
\par Second paragraph here.
}";
        let (_dir, path) = write(rtf.as_bytes());

        let text = RtfInputPlugin.parse(&path).unwrap();
        assert!(text.as_str().contains("Hello, world!"));
        assert!(text.as_str().contains("Second paragraph here."));
    }

    #[test]
    fn test_formatting_is_flattened() {
        let rtf = r"{\rtf1\ansi{\fonttbl\f0 Arial;}
\f0\fs24 Normal text \b bold text\b0  and \i italic text\i0.
\par Another paragraph.
}";
        let (_dir, path) = write(rtf.as_bytes());
        let text = RtfInputPlugin.parse(&path).unwrap();
        assert!(text.as_str().contains("bold text"));
        assert!(text.as_str().contains("italic text"));
        assert!(!text.as_str().contains("\\b"));
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let rtf = "{\\rtf1\\ansi\\deff0 {\\fonttbl {\\f0 Times New Roman;}}\n\\f0\\fs24\nalpha beta\\par\ngamma delta\\par\nepsilon\n}";
        let (_dir, path) = write(rtf.as_bytes());

        let text = RtfInputPlugin.parse(&path).unwrap();
        let lines: Vec<&str> = text.non_blank_lines().collect();
        assert_eq!(lines, vec!["alpha beta", "gamma delta", "epsilon"]);
    }

    #[test]
    fn test_mark_breaks() {
        assert_eq!(mark_breaks(r"a\par b"), format!("a\\par {}b", BREAK));
        assert_eq!(mark_breaks("a\\line\nb"), format!("a\\line {}\nb", BREAK));
        assert_eq!(mark_breaks(r"\pard\parskip0 x"), r"\pard\parskip0 x");
        assert_eq!(mark_breaks(r"\\par \{\par\}"), format!(r"\\par \{{\par {}\}}", BREAK));
    }

    #[test]
    fn test_tidy_lines() {
        assert_eq!(tidy_lines("\n\na  \n\n\n\n  b\t\n\n"), "a\n\nb");
        assert_eq!(tidy_lines(""), "");
    }

    #[test]
    fn test_code_page() {
        assert_eq!(code_page(br"{\rtf1\ansi\ansicpg1251\deff0"), Some(1251));
        assert_eq!(code_page(br"{\rtf1\ansi\deff0"), None);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RtfInputPlugin.parse(&dir.path().join("gone.rtf")).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { format: DocFormat::Rtf, .. }));
    }
}
