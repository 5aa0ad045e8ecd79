use thiserror::Error;

use crate::format::DocFormat;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to parse {format}: {reason}")]
    Parse { format: DocFormat, reason: String },

    #[error("Failed to render {format}: {reason}")]
    Render { format: DocFormat, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`ConvertError`], for callers that map
/// failures onto status codes or exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    Validation,
    Parse,
    Render,
    NotFound,
    Io,
}

impl ConvertError {
    pub fn parse(format: DocFormat, reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            format,
            reason: reason.to_string(),
        }
    }

    pub fn render(format: DocFormat, reason: impl std::fmt::Display) -> Self {
        Self::Render {
            format,
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Render { .. } => ErrorKind::Render,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Re-tag an error raised while parsing `format` as a parse failure.
    ///
    /// Parse and unsupported-format errors pass through untouched.
    pub fn into_parse(self, format: DocFormat) -> Self {
        match self {
            Self::Parse { .. } | Self::UnsupportedFormat(_) => self,
            other => Self::parse(format, other),
        }
    }

    /// Re-tag an error raised while rendering `format` as a render failure.
    ///
    /// Validation errors pass through so callers can tell bad input apart
    /// from a failing writer.
    pub fn into_render(self, format: DocFormat) -> Self {
        match self {
            Self::Render { .. } | Self::Validation(_) | Self::UnsupportedFormat(_) => self,
            other => Self::render(format, other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_parse_wraps_io() {
        let err = ConvertError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = err.into_parse(DocFormat::Csv);
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_into_render_keeps_validation() {
        let err = ConvertError::Validation("empty".to_string()).into_render(DocFormat::Pdf);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_display_names_format() {
        let err = ConvertError::parse(DocFormat::Json, "expected value");
        assert_eq!(err.to_string(), "Failed to parse JSON: expected value");
    }
}
