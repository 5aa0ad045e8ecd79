//! EPUB output plugin: wraps normalized text in an EPUB 2 book.

mod writer;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;

pub struct EpubOutputPlugin;

impl OutputPlugin for EpubOutputPlugin {
    fn name(&self) -> &str {
        "EPUB Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Epub
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        log::info!("Rendering EPUB: {} lines", text.line_count());
        writer::write_epub(text).map_err(|e| ConvertError::render(DocFormat::Epub, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_archive_layout() {
        let bytes = EpubOutputPlugin
            .render(&NormalizedText::new("Hello\nWorld"))
            .unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        {
            let first = archive.by_index(0).unwrap();
            assert_eq!(first.name(), "mimetype");
            assert_eq!(first.compression(), zip::CompressionMethod::Stored);
        }
        let names: Vec<String> = archive.file_names().map(String::from).collect();
        for expected in [
            "META-INF/container.xml",
            "OEBPS/content.opf",
            "OEBPS/toc.ncx",
            "OEBPS/content.xhtml",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = NormalizedText::new("same");
        assert_eq!(
            EpubOutputPlugin.render(&text).unwrap(),
            EpubOutputPlugin.render(&text).unwrap()
        );
    }
}
