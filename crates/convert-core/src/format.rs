//! Format tags shared by parsers and converters.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Supported document formats.
///
/// A single tag selects both the parser and the converter for a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    Txt,
    Pdf,
    Docx,
    Html,
    Json,
    Csv,
    Xml,
    Rtf,
    Epub,
    Odt,
}

impl DocFormat {
    /// Every format, in registry order.
    pub const ALL: [DocFormat; 10] = [
        Self::Txt,
        Self::Pdf,
        Self::Docx,
        Self::Html,
        Self::Json,
        Self::Csv,
        Self::Xml,
        Self::Rtf,
        Self::Epub,
        Self::Odt,
    ];

    /// Parse from a format tag or file extension (`"pdf"`, `".PDF"`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().trim_start_matches('.').to_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "html" => Some(Self::Html),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "xml" => Some(Self::Xml),
            "rtf" => Some(Self::Rtf),
            "epub" => Some(Self::Epub),
            "odt" => Some(Self::Odt),
            _ => None,
        }
    }

    /// Resolve the format of a file name from its last extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_tag(ext)
    }

    /// Get the canonical file extension, which is also the tag.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Html => "html",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xml => "xml",
            Self::Rtf => "rtf",
            Self::Epub => "epub",
            Self::Odt => "odt",
        }
    }

    /// Get MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Txt => "text/plain",
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Html => "text/html",
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Xml => "application/xml",
            Self::Rtf => "application/rtf",
            Self::Epub => "application/epub+zip",
            Self::Odt => "application/vnd.oasis.opendocument.text",
        }
    }
}

impl FromStr for DocFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ConvertError::UnsupportedFormat(s.to_string()))
    }
}

impl std::fmt::Display for DocFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}
