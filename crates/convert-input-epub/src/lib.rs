//! EPUB input plugin: reads the text of EPUB 2/3 content documents.

mod parser;

use std::path::Path;

use convert_core::error::Result;
use convert_core::format::DocFormat;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;

pub struct EpubInputPlugin;

impl InputPlugin for EpubInputPlugin {
    fn name(&self) -> &str {
        "EPUB Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Epub
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading EPUB: {}", input_path.display());
        parser::extract_epub_text(input_path).map(NormalizedText::new)
    }
}
