//! Metadata records reported by file inspection.

use serde::Serialize;

/// One structural count a parser can report about a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralCount {
    Pages(usize),
    Paragraphs(usize),
    Words(usize),
    Tags(usize),
    Keys(usize),
    Items(usize),
    Rows(usize),
    Columns(usize),
    Elements(usize),
}

/// Descriptive record for an uploaded file.
///
/// Absent counts are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    pub size: u64,
    pub extension: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_count: Option<usize>,
}

impl MetadataRecord {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ..Self::default()
        }
    }

    /// Mark the record invalid with the given cause.
    pub fn fail(&mut self, error: impl std::fmt::Display) {
        self.valid = false;
        self.error = Some(error.to_string());
    }

    pub fn apply(&mut self, count: StructuralCount) {
        match count {
            StructuralCount::Pages(n) => self.page_count = Some(n),
            StructuralCount::Paragraphs(n) => self.paragraph_count = Some(n),
            StructuralCount::Words(n) => self.word_count = Some(n),
            StructuralCount::Tags(n) => self.tag_count = Some(n),
            StructuralCount::Keys(n) => self.key_count = Some(n),
            StructuralCount::Items(n) => self.item_count = Some(n),
            StructuralCount::Rows(n) => self.row_count = Some(n),
            StructuralCount::Columns(n) => self.column_count = Some(n),
            StructuralCount::Elements(n) => self.element_count = Some(n),
        }
    }
}
