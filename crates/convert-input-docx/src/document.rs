//! Paragraph text from `word/document.xml`.
//!
//! Handles the Word Open XML elements that carry text:
//! - `w:p` (paragraphs) → one entry each, empty ones included
//! - `w:t` (text runs) → concatenated in order
//! - `w:tab` → tab
//! - `w:br` / `w:cr` (breaks) → space

use quick_xml::events::Event;
use quick_xml::Reader;

/// Collect the text of every paragraph, in document order.
pub fn paragraph_texts(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();

    let mut depth = 0usize;
    let mut in_text = false;
    let mut buffer = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => {
                    if depth == 0 {
                        buffer.clear();
                    }
                    depth += 1;
                }
                b"t" if depth > 0 => in_text = true,
                b"tab" if depth > 0 => buffer.push('\t'),
                b"br" | b"cr" if depth > 0 => buffer.push(' '),
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"p" => {
                    if depth == 0 {
                        paragraphs.push(String::new());
                    }
                }
                b"tab" if depth > 0 => buffer.push('\t'),
                b"br" | b"cr" if depth > 0 => buffer.push(' '),
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                buffer.push_str(&e.unescape()?);
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        paragraphs.push(std::mem::take(&mut buffer));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
