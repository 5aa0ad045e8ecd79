//! EPUB parsing: container.xml → OPF → spine → content documents.

use std::fs::File;
use std::path::Path;

use rayon::prelude::*;
use zip::read::ZipArchive;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_utils::{archive, html, xml};

/// Extract the text of every spine document, in reading order.
///
/// Documents that are missing from the archive or carry no text are
/// skipped. The rest are joined with a blank line.
pub fn extract_epub_text(path: &Path) -> Result<String> {
    let mut zip = archive::open_zip(path)
        .map_err(|e| ConvertError::parse(DocFormat::Epub, format!("Invalid ZIP: {}", e)))?;

    // 1. Find the OPF path from META-INF/container.xml
    let opf_path = read_container_xml(&mut zip)?;
    log::info!("OPF path: {}", opf_path);

    let opf_dir = opf_path
        .rfind('/')
        .map(|i| &opf_path[..=i])
        .unwrap_or("");

    // 2. Parse the OPF file
    let opf = read_text(&mut zip, &opf_path)?;
    let documents = spine_documents(&opf, opf_dir);

    // 3. Read raw bytes sequentially; the archive handle is not shareable
    let raw: Vec<(String, String)> = documents
        .into_iter()
        .filter_map(|entry| match read_text(&mut zip, &entry) {
            Ok(content) => Some((entry, content)),
            Err(e) => {
                log::warn!("Skipping spine document {}: {}", entry, e);
                None
            }
        })
        .collect();

    // 4. Extract text in parallel, keeping spine order
    let texts: Vec<String> = raw
        .par_iter()
        .map(|(_, content)| html::visible_text(content))
        .collect();

    let parts: Vec<String> = texts.into_iter().filter(|t| !t.trim().is_empty()).collect();
    log::info!("EPUB loaded: {} documents with text", parts.len());

    Ok(parts.join("\n\n"))
}

/// Read META-INF/container.xml and return the OPF file path.
fn read_container_xml(zip: &mut ZipArchive<File>) -> Result<String> {
    let container = read_text(zip, "META-INF/container.xml")?;
    xml::find_attributes(&container, "rootfile")
        .into_iter()
        .find_map(|mut attrs| attrs.remove("full-path"))
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            ConvertError::parse(DocFormat::Epub, "No rootfile found in container.xml")
        })
}

/// Archive paths of the spine documents, in spine order.
///
/// Falls back to every XHTML manifest item when the spine is empty.
fn spine_documents(opf: &str, opf_dir: &str) -> Vec<String> {
    let manifest: Vec<(String, String, String)> = xml::find_attributes(opf, "item")
        .into_iter()
        .filter_map(|mut attrs| {
            let id = attrs.remove("id")?;
            let href = attrs.remove("href")?;
            let media_type = attrs.remove("media-type").unwrap_or_default();
            Some((id, href, media_type))
        })
        .collect();

    let spine: Vec<String> = xml::find_attributes(opf, "itemref")
        .into_iter()
        .filter_map(|mut attrs| attrs.remove("idref"))
        .collect();

    let hrefs: Vec<&str> = if spine.is_empty() {
        manifest
            .iter()
            .filter(|(_, _, media_type)| is_document(media_type))
            .map(|(_, href, _)| href.as_str())
            .collect()
    } else {
        spine
            .iter()
            .filter_map(|idref| {
                let found = manifest.iter().find(|(id, _, _)| id == idref);
                if found.is_none() {
                    log::warn!("Spine references unknown manifest id {}", idref);
                }
                found.map(|(_, href, _)| href.as_str())
            })
            .collect()
    };

    hrefs.into_iter().map(|href| resolve_href(opf_dir, href)).collect()
}

fn is_document(media_type: &str) -> bool {
    matches!(media_type, "application/xhtml+xml" | "text/html")
}

/// Join a manifest href onto the OPF directory, decoding percent escapes,
/// dropping any fragment and folding `.` and `..` segments.
fn resolve_href(opf_dir: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or(href);
    let decoded = percent_encoding::percent_decode_str(href).decode_utf8_lossy();
    let joined = format!("{}{}", opf_dir, decoded);

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

fn read_text(zip: &mut ZipArchive<File>, name: &str) -> Result<String> {
    let bytes = archive::read_entry(zip, name).map_err(|e| {
        ConvertError::parse(DocFormat::Epub, format!("Cannot read {}: {}", name, e))
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPF: &str = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <manifest>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="b" href="text/ch%202.xhtml" media-type="application/xhtml+xml"/>
    <item id="a" href="text/ch1.xhtml#start" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="a"/>
    <itemref idref="missing"/>
    <itemref idref="b"/>
  </spine>
</package>"#;

    #[test]
    fn test_spine_order_and_paths() {
        let docs = spine_documents(OPF, "OEBPS/");
        assert_eq!(docs, vec!["OEBPS/text/ch1.xhtml", "OEBPS/text/ch 2.xhtml"]);
    }

    #[test]
    fn test_manifest_fallback_without_spine() {
        let opf = r#"<package><manifest>
<item id="c" href="c.xhtml" media-type="application/xhtml+xml"/>
<item id="css" href="s.css" media-type="text/css"/>
</manifest><spine/></package>"#;
        assert_eq!(spine_documents(opf, ""), vec!["c.xhtml"]);
    }

    #[test]
    fn test_resolve_href() {
        assert_eq!(resolve_href("OEBPS/text/", "../images/../ch.xhtml"), "OEBPS/ch.xhtml");
        assert_eq!(resolve_href("", "./a.xhtml"), "a.xhtml");
    }
}
