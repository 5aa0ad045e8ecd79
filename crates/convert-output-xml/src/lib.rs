//! XML output plugin: one numbered `<line>` element per line.

use convert_core::error::Result;
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;
use convert_utils::xml::XmlBuilder;

pub struct XmlOutputPlugin;

impl OutputPlugin for XmlOutputPlugin {
    fn name(&self) -> &str {
        "XML Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Xml
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        log::info!("Rendering XML: {} lines", text.line_count());

        let mut xml = XmlBuilder::new();
        xml.open_tag("document", &[("type", "text")]);
        for (idx, line) in text.lines().enumerate() {
            let number = (idx + 1).to_string();
            if line.is_empty() {
                xml.empty_tag("line", &[("number", &number)]);
            } else {
                xml.text_element("line", line, &[("number", &number)]);
            }
        }
        xml.close_tag("document");

        Ok(xml.build().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    #[test]
    fn test_render_lines() {
        let bytes = XmlOutputPlugin
            .render(&NormalizedText::new("first\n\nthird"))
            .unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<document type=\"text\">\n  <line number=\"1\">first</line>\n  <line number=\"2\"/>\n  <line number=\"3\">third</line>\n</document>\n"
        );
    }

    #[test]
    fn test_escaped_once() {
        let bytes = XmlOutputPlugin
            .render(&NormalizedText::new("<script>&</script>"))
            .unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.contains("&lt;script&gt;&amp;&lt;/script&gt;"));
        assert!(!xml.contains("&amp;lt;"));

        // The parsed text is the original line
        let mut reader = Reader::from_str(&xml);
        let mut texts = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Text(t) => {
                    let t = t.unescape().unwrap().to_string();
                    if !t.trim().is_empty() {
                        texts.push(t);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(texts, vec!["<script>&</script>"]);
    }
}
