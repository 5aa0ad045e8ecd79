//! EPUB writer: assembles a single-chapter EPUB 2 package in memory.

use std::io;

use convert_core::text::NormalizedText;
use convert_utils::archive::ZipBuilder;
use convert_utils::xml::{paragraph_markup, xhtml11_document, XmlBuilder};

const TITLE: &str = "Converted Document";
const LANGUAGE: &str = "en";
const AUTHOR: &str = "Text Converter";
const UID: &str = "converted_text";

const CHAPTER_HREF: &str = "content.xhtml";

/// Build the EPUB archive for `text`.
pub fn write_epub(text: &NormalizedText) -> io::Result<Vec<u8>> {
    let mut zip = ZipBuilder::in_memory();

    // mimetype must be first, stored uncompressed
    zip.add_stored("mimetype", b"application/epub+zip")?;
    zip.add_file("META-INF/container.xml", generate_container_xml().as_bytes())?;
    zip.add_file("OEBPS/content.opf", generate_opf().as_bytes())?;
    zip.add_file("OEBPS/toc.ncx", generate_ncx().as_bytes())?;
    zip.add_file(
        &format!("OEBPS/{}", CHAPTER_HREF),
        generate_chapter(text).as_bytes(),
    )?;

    zip.into_bytes()
}

fn generate_container_xml() -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag(
        "container",
        &[
            ("version", "1.0"),
            ("xmlns", "urn:oasis:names:tc:opendocument:xmlns:container"),
        ],
    )
    .open_tag("rootfiles", &[])
    .empty_tag(
        "rootfile",
        &[
            ("full-path", "OEBPS/content.opf"),
            ("media-type", "application/oebps-package+xml"),
        ],
    )
    .close_tag("rootfiles")
    .close_tag("container");
    xml.build()
}

fn generate_opf() -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag(
        "package",
        &[
            ("xmlns", "http://www.idpf.org/2007/opf"),
            ("unique-identifier", "bookid"),
            ("version", "2.0"),
        ],
    );

    xml.open_tag(
        "metadata",
        &[
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:opf", "http://www.idpf.org/2007/opf"),
        ],
    );
    xml.text_element("dc:title", TITLE, &[]);
    xml.text_element("dc:language", LANGUAGE, &[]);
    xml.text_element("dc:identifier", UID, &[("id", "bookid")]);
    xml.text_element("dc:creator", AUTHOR, &[("opf:role", "aut")]);
    xml.close_tag("metadata");

    xml.open_tag("manifest", &[]);
    xml.empty_tag(
        "item",
        &[
            ("id", "ncx"),
            ("href", "toc.ncx"),
            ("media-type", "application/x-dtbncx+xml"),
        ],
    );
    xml.empty_tag(
        "item",
        &[
            ("id", "content"),
            ("href", CHAPTER_HREF),
            ("media-type", "application/xhtml+xml"),
        ],
    );
    xml.close_tag("manifest");

    xml.open_tag("spine", &[("toc", "ncx")]);
    xml.empty_tag("itemref", &[("idref", "content")]);
    xml.close_tag("spine");

    xml.close_tag("package");
    xml.build()
}

fn generate_ncx() -> String {
    let mut xml = XmlBuilder::new();
    xml.raw("<!DOCTYPE ncx PUBLIC \"-//NISO//DTD ncx 2005-1//EN\" \"http://www.daisy.org/z3986/2005/ncx-2005-1.dtd\">\n");
    xml.open_tag(
        "ncx",
        &[
            ("xmlns", "http://www.daisy.org/z3986/2005/ncx/"),
            ("version", "2005-1"),
        ],
    );

    xml.open_tag("head", &[]);
    xml.empty_tag("meta", &[("name", "dtb:uid"), ("content", UID)]);
    xml.empty_tag("meta", &[("name", "dtb:depth"), ("content", "1")]);
    xml.empty_tag("meta", &[("name", "dtb:totalPageCount"), ("content", "0")]);
    xml.empty_tag("meta", &[("name", "dtb:maxPageNumber"), ("content", "0")]);
    xml.close_tag("head");

    xml.open_tag("docTitle", &[]);
    xml.text_element("text", TITLE, &[]);
    xml.close_tag("docTitle");

    xml.open_tag("navMap", &[]);
    xml.open_tag("navPoint", &[("id", "navPoint-1"), ("playOrder", "1")]);
    xml.open_tag("navLabel", &[]);
    xml.text_element("text", "Content", &[]);
    xml.close_tag("navLabel");
    xml.empty_tag("content", &[("src", CHAPTER_HREF)]);
    xml.close_tag("navPoint");
    xml.close_tag("navMap");

    xml.close_tag("ncx");
    xml.build()
}

fn generate_chapter(text: &NormalizedText) -> String {
    xhtml11_document(TITLE, LANGUAGE, &paragraph_markup(text.lines()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_container_xml() {
        let xml = generate_container_xml();
        assert!(xml.contains("OEBPS/content.opf"));
        assert!(xml.contains("urn:oasis:names:tc:opendocument:xmlns:container"));
    }

    #[test]
    fn test_generate_opf() {
        let opf = generate_opf();
        assert!(opf.contains("<dc:title>Converted Document</dc:title>"));
        assert!(opf.contains("<dc:language>en</dc:language>"));
        assert!(opf.contains("<dc:identifier id=\"bookid\">converted_text</dc:identifier>"));
        assert!(opf.contains("<dc:creator opf:role=\"aut\">Text Converter</dc:creator>"));
        assert!(opf.contains("idref=\"content\""));
    }

    #[test]
    fn test_generate_ncx() {
        let ncx = generate_ncx();
        assert!(ncx.contains("content=\"converted_text\""));
        assert!(ncx.contains("src=\"content.xhtml\""));
    }

    #[test]
    fn test_chapter_is_escaped() {
        let chapter = generate_chapter(&NormalizedText::new("<script>&</script>\n\nnext"));
        assert!(!chapter.contains("<script>"));
        assert!(chapter.contains("<p>&lt;script&gt;&amp;&lt;/script&gt;</p><br/><p>next</p>"));
        assert!(chapter.contains("<title>Converted Document</title>"));
    }
}
