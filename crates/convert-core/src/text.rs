//! Normalized text: the line-oriented intermediate representation.
//!
//! All conversions pass through this IR: Parser → NormalizedText → Converter.
//! It carries no styling or hierarchy, only an ordered sequence of lines.

/// Plain text split into lines on `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Join lines with `\n`.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(line.as_ref());
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Iterate lines, including blank ones. A trailing `\n` yields a final
    /// empty line.
    pub fn lines(&self) -> std::str::Split<'_, char> {
        self.0.split('\n')
    }

    /// Non-blank lines with surrounding whitespace kept.
    pub fn non_blank_lines(&self) -> impl Iterator<Item = &str> {
        self.lines().filter(|l| !l.trim().is_empty())
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Count of Unicode scalar values.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for NormalizedText {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NormalizedText {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
