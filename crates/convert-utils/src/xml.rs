//! XML helpers: escaping, attribute lookup and a small builder for package
//! manifests.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

/// Collect the attributes of every occurrence of a tag, in document order.
///
/// Tags and attribute keys are matched by local name, so namespace
/// prefixes are ignored. A malformed document yields what was read so far.
pub fn find_attributes(xml: &str, tag_name: &str) -> Vec<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == tag_name.as_bytes() {
                    let mut attrs = HashMap::new();
                    for attr in e.attributes().flatten() {
                        let key =
                            String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
                        let value = match attr.unescape_value() {
                            Ok(v) => v.into_owned(),
                            Err(_) => String::from_utf8_lossy(&attr.value).to_string(),
                        };
                        attrs.insert(key, value);
                    }
                    found.push(attrs);
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }
    found
}

/// Simple XML builder for generating package manifests and content files.
pub struct XmlBuilder {
    content: String,
    indent_level: usize,
}

impl XmlBuilder {
    pub fn new() -> Self {
        Self {
            content: String::from(XML_DECLARATION),
            indent_level: 0,
        }
    }

    pub fn open_tag(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.indent();
        self.start(name, attrs);
        self.content.push_str(">\n");
        self.indent_level += 1;
        self
    }

    pub fn close_tag(&mut self, name: &str) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self.indent();
        self.content.push_str("</");
        self.content.push_str(name);
        self.content.push_str(">\n");
        self
    }

    pub fn empty_tag(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.indent();
        self.start(name, attrs);
        self.content.push_str("/>\n");
        self
    }

    pub fn text_element(&mut self, name: &str, text: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.indent();
        self.start(name, attrs);
        self.content.push('>');
        self.content.push_str(&escape_xml_text(text));
        self.content.push_str("</");
        self.content.push_str(name);
        self.content.push_str(">\n");
        self
    }

    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.content.push_str(text);
        self
    }

    pub fn build(self) -> String {
        self.content
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.content.push('<');
        self.content.push_str(name);
        for (key, value) in attrs {
            self.content.push(' ');
            self.content.push_str(key);
            self.content.push_str("=\"");
            self.content.push_str(&escape_xml_attr(value));
            self.content.push('"');
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.content.push_str("  ");
        }
    }
}

impl Default for XmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// XHTML 1.1 DOCTYPE for EPUB 2 compliance.
pub const XHTML11_DOCTYPE: &str =
    "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">";

/// XML declaration, including the trailing newline.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Build a valid XHTML 1.1 document for EPUB 2.
pub fn xhtml11_document(title: &str, lang: &str, body: &str) -> String {
    let mut s = String::with_capacity(512 + body.len());
    s.push_str(XML_DECLARATION);
    s.push_str(XHTML11_DOCTYPE);
    s.push('\n');
    s.push_str("<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"");
    s.push_str(&escape_xml_attr(lang));
    s.push_str("\">\n<head>\n  <title>");
    s.push_str(&escape_xml_text(title));
    s.push_str("</title>\n</head>\n<body>\n");
    s.push_str(body);
    s.push_str("\n</body>\n</html>");
    s
}

/// One `<p>` per non-blank line and one `<br/>` per blank line, with line
/// text HTML-escaped. The result is valid as both HTML and XHTML.
pub fn paragraph_markup<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for line in lines {
        if line.trim().is_empty() {
            out.push_str("<br/>");
        } else {
            out.push_str("<p>");
            out.push_str(&escape_html(line));
            out.push_str("</p>");
        }
    }
    out
}

/// Escape special characters in XML text content.
pub fn escape_xml_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape special characters in XML attribute values.
pub fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape text for HTML body content, quotes included.
pub fn escape_html(s: &str) -> String {
    escape_xml_attr(s).replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_attributes() {
        let xml = r#"<spine><itemref idref="ch1"/><itemref idref="ch2" linear="no"/></spine>"#;
        let refs = find_attributes(xml, "itemref");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0]["idref"], "ch1");
        assert_eq!(refs[1]["linear"], "no");
    }

    #[test]
    fn test_find_attributes_ignores_prefix() {
        let xml = r#"<c:container xmlns:c="urn:x"><c:rootfile full-path="OEBPS/a&amp;b.opf"/></c:container>"#;
        let roots = find_attributes(xml, "rootfile");
        assert_eq!(roots[0]["full-path"], "OEBPS/a&b.opf");
    }

    #[test]
    fn test_xml_builder() {
        let mut builder = XmlBuilder::new();
        builder
            .open_tag("root", &[("xmlns", "http://example.com")])
            .text_element("title", "Test", &[])
            .empty_tag("meta", &[("name", "author"), ("content", "Alice")])
            .close_tag("root");

        let xml = builder.build();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("  <title>Test</title>"));
        assert!(xml.contains("xmlns=\"http://example.com\""));
        assert!(xml.contains("<meta name=\"author\" content=\"Alice\"/>"));
    }

    #[test]
    fn test_paragraph_markup() {
        let markup = paragraph_markup(["one", "", "<two>"]);
        assert_eq!(markup, "<p>one</p><br/><p>&lt;two&gt;</p>");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_xml_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_xml_attr("say \"hello\""), "say &quot;hello&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }
}
