//! Page text extraction with lopdf.

use std::path::Path;

use lopdf::Document;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;

pub fn load(path: &Path) -> Result<Document> {
    Document::load(path)
        .map_err(|e| ConvertError::parse(DocFormat::Pdf, format!("Failed to load PDF: {}", e)))
}

/// Page numbers in ascending order.
pub fn page_numbers(doc: &Document) -> Vec<u32> {
    // get_pages is keyed by page number, so iteration is already ordered
    doc.get_pages().keys().copied().collect()
}

/// Text of every page, each followed by a newline, with the whole result
/// trimmed. A page whose text cannot be decoded contributes nothing.
pub fn extract_text(doc: &Document) -> String {
    let pages = page_numbers(doc);
    log::info!("PDF has {} pages", pages.len());

    let mut text = String::new();
    for page_num in pages {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => log::warn!("No text extracted from page {}: {}", page_num, e),
        }
        text.push('\n');
    }
    text.trim().to_string()
}
