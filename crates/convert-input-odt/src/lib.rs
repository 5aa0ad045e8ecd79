//! ODT (OpenDocument Text) input plugin: reads paragraph and heading text.
//!
//! ODT files are ZIP archives containing XML content (similar to DOCX).
//! Main content is in `content.xml`; styles and metadata are ignored.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::metadata::StructuralCount;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;
use convert_utils::archive;

pub struct OdtInputPlugin;

impl InputPlugin for OdtInputPlugin {
    fn name(&self) -> &str {
        "ODT Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Odt
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading ODT: {}", input_path.display());
        let blocks = read_blocks(input_path)?;
        Ok(NormalizedText::from_lines(
            blocks
                .iter()
                .map(|b| b.text.as_str())
                .filter(|t| !t.trim().is_empty()),
        ))
    }

    fn probe(&self, input_path: &Path) -> Vec<StructuralCount> {
        match read_blocks(input_path) {
            Ok(blocks) => {
                let paragraphs = blocks.iter().filter(|b| !b.heading).count();
                vec![StructuralCount::Paragraphs(paragraphs)]
            }
            Err(e) => {
                log::debug!("ODT probe skipped: {}", e);
                Vec::new()
            }
        }
    }
}

/// A top-level `text:p` or `text:h` with its flattened text.
#[derive(Debug, PartialEq)]
struct Block {
    heading: bool,
    text: String,
}

fn read_blocks(path: &Path) -> Result<Vec<Block>> {
    let mut zip = archive::open_zip(path).map_err(|e| {
        ConvertError::parse(DocFormat::Odt, format!("Invalid ODT (ZIP) file: {}", e))
    })?;

    let content_xml = archive::read_entry_string(&mut zip, "content.xml")
        .map_err(|e| ConvertError::parse(DocFormat::Odt, format!("Missing content.xml: {}", e)))?;

    content_blocks(&content_xml).map_err(|e| ConvertError::parse(DocFormat::Odt, e))
}

/// Walk `content.xml` and collect blocks in document order.
///
/// `text:s` expands to its `text:c` count of spaces, `text:tab` to a tab
/// and `text:line-break` to a newline. Paragraphs nested inside a block
/// (notes, frames) are folded into the enclosing block.
fn content_blocks(xml: &str) -> std::result::Result<Vec<Block>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut blocks = Vec::new();

    let mut depth = 0usize;
    let mut heading = false;
    let mut buffer = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                name @ (b"p" | b"h") => {
                    if depth == 0 {
                        heading = name == b"h";
                        buffer.clear();
                    }
                    depth += 1;
                }
                _ if depth > 0 => push_inline(e, &mut buffer),
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                name @ (b"p" | b"h") => {
                    if depth == 0 {
                        blocks.push(Block {
                            heading: name == b"h",
                            text: String::new(),
                        });
                    }
                }
                _ if depth > 0 => push_inline(e, &mut buffer),
                _ => {}
            },
            Event::Text(ref e) if depth > 0 => {
                buffer.push_str(&e.unescape()?);
            }
            Event::End(ref e) => {
                if matches!(e.local_name().as_ref(), b"p" | b"h") && depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        blocks.push(Block {
                            heading,
                            text: std::mem::take(&mut buffer),
                        });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(blocks)
}

/// Upper bound on the spaces a single `text:s` may expand to.
const MAX_SPACES: usize = 1024;

fn push_inline(e: &BytesStart<'_>, buffer: &mut String) {
    match e.local_name().as_ref() {
        b"s" => {
            let count = e
                .attributes()
                .flatten()
                .find(|a| a.key.local_name().as_ref() == b"c")
                .and_then(|a| String::from_utf8_lossy(&a.value).parse::<usize>().ok())
                .unwrap_or(1)
                .min(MAX_SPACES);
            buffer.extend(std::iter::repeat(' ').take(count));
        }
        b"tab" => buffer.push('\t'),
        b"line-break" => buffer.push('\n'),
        _ => {}
    }
}
