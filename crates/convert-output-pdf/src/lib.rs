//! PDF output plugin: lays out normalized text on A4 pages.
//!
//! Uses printpdf 0.8 with the builtin Helvetica font and Op-based page
//! construction. Each non-blank line becomes a word-wrapped paragraph, each
//! blank line a vertical spacer.

use convert_core::error::Result;
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;

use printpdf::*;

/// A4 page dimensions in mm.
const PAGE_W: Mm = Mm(210.0);
const PAGE_H: Mm = Mm(297.0);

/// Margins in mm.
const MARGIN: f32 = 25.0;

/// Body font size in pt.
const FONT_SIZE_BODY: f32 = 11.0;

/// Line height multiplier.
const LINE_HEIGHT: f32 = 1.4;

/// Approximate mm per pt.
const MM_PER_PT: f32 = 0.353;

/// Gap after each paragraph, in mm.
const PARAGRAPH_GAP: f32 = 2.0;

/// Height of the spacer emitted for a blank line (0.2 in).
const SPACER: f32 = 5.08;

const DOCUMENT_TITLE: &str = "Converted Document";

pub struct PdfOutputPlugin;

impl OutputPlugin for PdfOutputPlugin {
    fn name(&self) -> &str {
        "PDF Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Pdf
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        log::info!("Rendering PDF: {} lines", text.line_count());
        Ok(write_pdf(text))
    }
}

struct PageBuilder {
    pages: Vec<PdfPage>,
    current_ops: Vec<Op>,
    y_pos: f32, // mm from bottom
    chars_per_line: usize,
}

impl PageBuilder {
    fn new() -> Self {
        let usable_w = PAGE_W.0 - 2.0 * MARGIN;
        let chars_per_line = (usable_w / (FONT_SIZE_BODY * 0.5 * MM_PER_PT)) as usize;
        PageBuilder {
            pages: Vec::new(),
            current_ops: Vec::new(),
            y_pos: PAGE_H.0 - MARGIN,
            chars_per_line,
        }
    }

    fn new_page(&mut self) {
        let ops = std::mem::take(&mut self.current_ops);
        self.pages.push(PdfPage::new(PAGE_W, PAGE_H, ops));
        self.y_pos = PAGE_H.0 - MARGIN;
    }

    fn ensure_space(&mut self, needed_mm: f32) {
        if self.y_pos - needed_mm < MARGIN {
            self.new_page();
        }
    }

    /// One text section per line, so extractors see a break after each.
    fn write_line(&mut self, text: &str) {
        let line_h = FONT_SIZE_BODY * LINE_HEIGHT * MM_PER_PT;
        self.ensure_space(line_h);

        self.current_ops.push(Op::StartTextSection);
        self.current_ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(FONT_SIZE_BODY),
            font: BuiltinFont::Helvetica,
        });
        self.current_ops.push(Op::SetTextCursor {
            pos: Point {
                x: Mm(MARGIN).into(),
                y: Mm(self.y_pos).into(),
            },
        });
        self.current_ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font: BuiltinFont::Helvetica,
        });
        self.current_ops.push(Op::EndTextSection);

        self.y_pos -= line_h;
    }

    fn write_wrapped(&mut self, text: &str) {
        for line in wrap_words(text, self.chars_per_line) {
            self.write_line(&line);
        }
        self.y_pos -= PARAGRAPH_GAP;
    }

    fn spacer(&mut self) {
        if self.y_pos - SPACER < MARGIN {
            self.new_page();
        } else {
            self.y_pos -= SPACER;
        }
    }

    fn finish(mut self) -> Vec<PdfPage> {
        let ops = std::mem::take(&mut self.current_ops);
        if !ops.is_empty() || self.pages.is_empty() {
            self.pages.push(PdfPage::new(PAGE_W, PAGE_H, ops));
        }
        self.pages
    }
}

/// Greedy word wrap by character count. A word longer than the limit gets a
/// line of its own.
fn wrap_words(text: &str, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if !line.is_empty() && line_chars + word_chars + 1 > limit {
            lines.push(std::mem::take(&mut line));
            line_chars = 0;
        }
        if !line.is_empty() {
            line.push(' ');
            line_chars += 1;
        }
        line.push_str(word);
        line_chars += word_chars;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn layout(text: &NormalizedText) -> Vec<PdfPage> {
    let mut builder = PageBuilder::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            builder.spacer();
        } else {
            builder.write_wrapped(line);
        }
    }
    builder.finish()
}

fn write_pdf(text: &NormalizedText) -> Vec<u8> {
    let pages = layout(text);
    let mut warnings = Vec::new();
    let bytes = PdfDocument::new(DOCUMENT_TITLE)
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("printpdf reported {} warnings", warnings.len());
    }
    bytes
}
