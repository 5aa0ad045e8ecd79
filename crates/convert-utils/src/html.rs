//! Visible-text extraction from HTML and XHTML documents.

use scraper::{ElementRef, Html, Selector};

/// Elements whose content is never shown to a reader.
const HIDDEN: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line of text.
const BLOCK: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th",
    "thead", "tr", "ul",
];

/// Extract the readable text of `<body>` as newline-separated chunks.
///
/// Each line is trimmed and split further on runs of two spaces; empty
/// chunks are dropped.
pub fn visible_text(source: &str) -> String {
    let document = Html::parse_document(source);

    let mut raw = String::new();
    match Selector::parse("body") {
        Ok(selector) => match document.select(&selector).next() {
            Some(body) => collect_text(body, &mut raw),
            None => collect_text(document.root_element(), &mut raw),
        },
        Err(_) => collect_text(document.root_element(), &mut raw),
    }

    split_chunks(&raw).join("\n")
}

/// Count every element in the document, including the ones the parser
/// synthesizes (`html`, `head`, `body`).
pub fn element_count(source: &str) -> Option<usize> {
    let document = Html::parse_document(source);
    let selector = Selector::parse("*").ok()?;
    Some(document.select(&selector).count())
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if HIDDEN.contains(&name) {
                continue;
            }
            let is_block = BLOCK.contains(&name);
            if is_block {
                out.push('\n');
            }
            collect_text(child_element, out);
            if is_block {
                out.push('\n');
            }
        } else if let Some(text_node) = child.value().as_text() {
            let raw_text: &str = text_node;
            out.push_str(raw_text);
        }
    }
}

fn split_chunks(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}
