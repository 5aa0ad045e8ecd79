//! DOCX input plugin: reads paragraph text from Word documents.
//!
//! DOCX is a ZIP archive containing Office Open XML. Only
//! `word/document.xml` is read; styles, numbering and media are ignored.

mod document;

use std::path::Path;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::metadata::StructuralCount;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;
use convert_utils::archive;

pub struct DocxInputPlugin;

impl InputPlugin for DocxInputPlugin {
    fn name(&self) -> &str {
        "DOCX Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Docx
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading DOCX: {}", input_path.display());
        let paragraphs = read_paragraphs(input_path)?;
        Ok(NormalizedText::from_lines(
            paragraphs.iter().filter(|p| !p.trim().is_empty()),
        ))
    }

    fn probe(&self, input_path: &Path) -> Vec<StructuralCount> {
        match read_paragraphs(input_path) {
            Ok(paragraphs) => {
                let words = paragraphs
                    .iter()
                    .map(|p| p.split_whitespace().count())
                    .sum();
                vec![
                    StructuralCount::Paragraphs(paragraphs.len()),
                    StructuralCount::Words(words),
                ]
            }
            Err(e) => {
                log::debug!("DOCX probe skipped: {}", e);
                Vec::new()
            }
        }
    }
}

fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let mut zip = archive::open_zip(path).map_err(|e| {
        ConvertError::parse(DocFormat::Docx, format!("Invalid DOCX ZIP: {}", e))
    })?;

    let xml = archive::read_entry_string(&mut zip, "word/document.xml").map_err(|e| {
        ConvertError::parse(DocFormat::Docx, format!("Missing word/document.xml: {}", e))
    })?;

    document::paragraph_texts(&xml).map_err(|e| ConvertError::parse(DocFormat::Docx, e))
}
