//! ODT output plugin: writes a minimal OpenDocument Text package.
//!
//! Package layout:
//! - `mimetype` (stored, first entry)
//! - `META-INF/manifest.xml`
//! - `content.xml` with one `text:p` per line

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;
use convert_utils::archive::ZipBuilder;
use convert_utils::xml::XmlBuilder;

pub struct OdtOutputPlugin;

const MIMETYPE: &str = "application/vnd.oasis.opendocument.text";
const OFFICE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
const TEXT_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";
const MANIFEST_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";

impl OutputPlugin for OdtOutputPlugin {
    fn name(&self) -> &str {
        "ODT Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Odt
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        log::info!("Rendering ODT: {} paragraphs", text.line_count());
        write_package(text).map_err(|e| ConvertError::render(DocFormat::Odt, e))
    }
}

fn write_package(text: &NormalizedText) -> std::io::Result<Vec<u8>> {
    let mut zip = ZipBuilder::in_memory();
    zip.add_stored("mimetype", MIMETYPE.as_bytes())?;
    zip.add_file("META-INF/manifest.xml", manifest_xml().as_bytes())?;
    zip.add_file("content.xml", content_xml(text).as_bytes())?;
    zip.into_bytes()
}

fn manifest_xml() -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag(
        "manifest:manifest",
        &[("xmlns:manifest", MANIFEST_NS), ("manifest:version", "1.2")],
    )
    .empty_tag(
        "manifest:file-entry",
        &[
            ("manifest:full-path", "/"),
            ("manifest:version", "1.2"),
            ("manifest:media-type", MIMETYPE),
        ],
    )
    .empty_tag(
        "manifest:file-entry",
        &[
            ("manifest:full-path", "content.xml"),
            ("manifest:media-type", "text/xml"),
        ],
    )
    .close_tag("manifest:manifest");
    xml.build()
}

fn content_xml(text: &NormalizedText) -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag(
        "office:document-content",
        &[
            ("xmlns:office", OFFICE_NS),
            ("xmlns:text", TEXT_NS),
            ("office:version", "1.2"),
        ],
    )
    .open_tag("office:body", &[])
    .open_tag("office:text", &[]);

    for line in text.lines() {
        if line.trim().is_empty() {
            xml.empty_tag("text:p", &[]);
        } else {
            xml.text_element("text:p", line, &[]);
        }
    }

    xml.close_tag("office:text")
        .close_tag("office:body")
        .close_tag("office:document-content");
    xml.build()
}
