//! XML input plugin: walks the element tree and keeps only character data.
//!
//! For every element the extracted text is its own stripped text, then for
//! each child the child's text followed by the child's stripped tail (the
//! character data between the child's end tag and the next sibling).

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::metadata::StructuralCount;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;

pub struct XmlInputPlugin;

impl InputPlugin for XmlInputPlugin {
    fn name(&self) -> &str {
        "XML Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Xml
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading XML: {}", input_path.display());
        let root = load_tree(input_path)?;
        Ok(NormalizedText::new(root.extract_text()))
    }

    fn probe(&self, input_path: &Path) -> Vec<StructuralCount> {
        match load_tree(input_path) {
            Ok(root) => vec![StructuralCount::Elements(root.element_count())],
            Err(e) => {
                log::debug!("XML probe skipped: {}", e);
                Vec::new()
            }
        }
    }
}

/// Deepest element nesting accepted. The tree is walked recursively.
const MAX_DEPTH: usize = 1024;

#[derive(Debug, Default)]
struct Element {
    text: String,
    children: Vec<Child>,
}

#[derive(Debug)]
struct Child {
    element: Element,
    tail: String,
}

impl Element {
    fn extract_text(&self) -> String {
        let mut parts = Vec::new();
        let text = self.text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
        for child in &self.children {
            parts.push(child.element.extract_text());
            let tail = child.tail.trim();
            if !tail.is_empty() {
                parts.push(tail.to_string());
            }
        }
        parts.join("\n")
    }

    fn element_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.element.element_count())
            .sum::<usize>()
    }

    /// Character data goes to the element's text until it has a child,
    /// and to the last child's tail after that.
    fn push_char_data(&mut self, data: &str) {
        match self.children.last_mut() {
            Some(last) => last.tail.push_str(data),
            None => self.text.push_str(data),
        }
    }
}

fn load_tree(path: &Path) -> Result<Element> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConvertError::parse(
            DocFormat::Xml,
            format!("Cannot read {}: {}", path.display(), e),
        )
    })?;
    build_tree(&content)
}

fn build_tree(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ConvertError::parse(
                DocFormat::Xml,
                format!("at position {}: {}", reader.buffer_position(), e),
            )
        })?;

        match event {
            Event::Start(_) => {
                if root.is_some() {
                    return Err(junk_after_root());
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(too_deep());
                }
                stack.push(Element::default());
            }
            Event::Empty(_) => {
                if root.is_some() {
                    return Err(junk_after_root());
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(too_deep());
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Child {
                        element: Element::default(),
                        tail: String::new(),
                    }),
                    None => root = Some(Element::default()),
                }
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(ConvertError::parse(DocFormat::Xml, "unexpected end tag"));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Child {
                        element,
                        tail: String::new(),
                    }),
                    None => root = Some(element),
                }
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| ConvertError::parse(DocFormat::Xml, err))?;
                match stack.last_mut() {
                    Some(current) => current.push_char_data(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(ConvertError::parse(
                            DocFormat::Xml,
                            "text outside the root element",
                        ))
                    }
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.push_char_data(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ConvertError::parse(
            DocFormat::Xml,
            "unexpected end of document: unclosed element",
        ));
    }
    root.ok_or_else(|| ConvertError::parse(DocFormat::Xml, "no root element found"))
}

fn junk_after_root() -> ConvertError {
    ConvertError::parse(DocFormat::Xml, "junk after document element")
}

fn too_deep() -> ConvertError {
    ConvertError::parse(
        DocFormat::Xml,
        format!("nesting too deep (more than {} levels)", MAX_DEPTH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_tails() {
        let root = build_tree("<r>head<a>one</a>tail-a<b> two </b>  <c/>end</r>").unwrap();
        assert_eq!(root.extract_text(), "head\none\ntail-a\ntwo\n\nend");
        assert_eq!(root.element_count(), 4);
    }

    #[test]
    fn test_nested_and_entities() {
        let xml = r#"<?xml version="1.0"?>
<!-- note -->
<doc attr="ignored">
  <p>Fish &amp; chips</p>
  <p><![CDATA[<raw>]]></p>
</doc>"#;
        let root = build_tree(xml).unwrap();
        assert_eq!(root.extract_text(), "Fish & chips\n<raw>");
    }

    #[test]
    fn test_malformed() {
        assert!(build_tree("<a><b></a>").is_err());
        assert!(build_tree("<a>").is_err());
        assert!(build_tree("").is_err());
        assert!(build_tree("<a/><b/>").is_err());
        assert!(build_tree("plain text").is_err());
    }

    fn nested(depth: usize) -> String {
        format!("{}x{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn test_depth_limit() {
        let root = build_tree(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(root.element_count(), MAX_DEPTH);
        assert_eq!(root.extract_text(), "x");

        let err = build_tree(&nested(200_000)).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { format: DocFormat::Xml, .. }));
        assert!(build_tree(&format!("<r>{}</r>", nested(MAX_DEPTH))).is_err());
    }

    #[test]
    fn test_plugin_probe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.xml");
        std::fs::write(&path, "<root><x>1</x><y><z/></y></root>").unwrap();
        assert_eq!(XmlInputPlugin.parse(&path).unwrap().as_str(), "1\n");
        assert_eq!(XmlInputPlugin.probe(&path), vec![StructuralCount::Elements(4)]);
    }
}
