//! PDF input plugin: extracts page text from PDF files.

mod extract;

use std::path::Path;

use convert_core::error::Result;
use convert_core::format::DocFormat;
use convert_core::metadata::StructuralCount;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;

pub struct PdfInputPlugin;

impl InputPlugin for PdfInputPlugin {
    fn name(&self) -> &str {
        "PDF Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Pdf
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading PDF: {}", input_path.display());
        let doc = extract::load(input_path)?;
        Ok(NormalizedText::new(extract::extract_text(&doc)))
    }

    fn probe(&self, input_path: &Path) -> Vec<StructuralCount> {
        match extract::load(input_path) {
            Ok(doc) => vec![StructuralCount::Pages(extract::page_numbers(&doc).len())],
            Err(e) => {
                log::debug!("PDF probe skipped: {}", e);
                Vec::new()
            }
        }
    }
}
