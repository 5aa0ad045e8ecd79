//! DOCX output plugin: writes a minimal Office Open XML package.
//!
//! Package layout:
//! - `[Content_Types].xml`
//! - `_rels/.rels`
//! - `word/document.xml` with one `w:p` per line

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;
use convert_utils::archive::ZipBuilder;
use convert_utils::xml::{escape_xml_text, XmlBuilder};

pub struct DocxOutputPlugin;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Space after each paragraph, in twentieths of a point (6pt).
const SPACE_AFTER_TWIPS: u32 = 120;

impl OutputPlugin for DocxOutputPlugin {
    fn name(&self) -> &str {
        "DOCX Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Docx
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        log::info!("Rendering DOCX: {} paragraphs", text.line_count());
        write_package(text).map_err(|e| ConvertError::render(DocFormat::Docx, e))
    }
}

fn write_package(text: &NormalizedText) -> std::io::Result<Vec<u8>> {
    let mut zip = ZipBuilder::in_memory();
    zip.add_file("[Content_Types].xml", content_types().as_bytes())?;
    zip.add_file("_rels/.rels", package_rels().as_bytes())?;
    zip.add_file("word/document.xml", document_xml(text).as_bytes())?;
    zip.into_bytes()
}

fn content_types() -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag(
        "Types",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
    )
    .empty_tag(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )
    .empty_tag("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])
    .empty_tag(
        "Override",
        &[
            ("PartName", "/word/document.xml"),
            (
                "ContentType",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            ),
        ],
    )
    .close_tag("Types");
    xml.build()
}

fn package_rels() -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag(
        "Relationships",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/relationships")],
    )
    .empty_tag(
        "Relationship",
        &[
            ("Id", "rId1"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
            ),
            ("Target", "word/document.xml"),
        ],
    )
    .close_tag("Relationships");
    xml.build()
}

fn document_xml(text: &NormalizedText) -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag("w:document", &[("xmlns:w", WORDML_NS)])
        .open_tag("w:body", &[]);

    for line in text.lines() {
        if line.trim().is_empty() {
            xml.empty_tag("w:p", &[]);
        } else {
            xml.raw(&format!(
                "    <w:p><w:pPr><w:spacing w:after=\"{}\"/></w:pPr><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>\n",
                SPACE_AFTER_TWIPS,
                escape_xml_text(line)
            ));
        }
    }

    xml.close_tag("w:body").close_tag("w:document");
    xml.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        convert_utils::archive::read_entry_string(&mut archive, name).unwrap()
    }

    #[test]
    fn test_package_parts() {
        let bytes = DocxOutputPlugin
            .render(&NormalizedText::new("Hello\n\nWorld"))
            .unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"[Content_Types].xml"));
        assert!(names.contains(&"_rels/.rels"));
        assert!(names.contains(&"word/document.xml"));

        let doc = entry(&bytes, "word/document.xml");
        assert_eq!(doc.matches("<w:p>").count(), 2);
        assert_eq!(doc.matches("<w:p/>").count(), 1);
        assert!(doc.contains("<w:spacing w:after=\"120\"/>"));
        assert!(doc.contains("<w:t xml:space=\"preserve\">Hello</w:t>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let bytes = DocxOutputPlugin
            .render(&NormalizedText::new("a < b & c"))
            .unwrap();
        assert!(entry(&bytes, "word/document.xml").contains(">a &lt; b &amp; c</w:t>"));
    }

    #[test]
    fn test_deterministic() {
        let text = NormalizedText::new("same\ntext");
        assert_eq!(
            DocxOutputPlugin.render(&text).unwrap(),
            DocxOutputPlugin.render(&text).unwrap()
        );
    }
}
