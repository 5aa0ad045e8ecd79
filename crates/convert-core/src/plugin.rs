//! Plugin traits for input parsers and output converters.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{ConvertError, Result};
use crate::format::DocFormat;
use crate::metadata::StructuralCount;
use crate::text::NormalizedText;

/// Input format plugin: extracts plain text from a file.
pub trait InputPlugin: Send + Sync {
    /// Human-readable name of this plugin.
    fn name(&self) -> &str;

    /// The file format this plugin reads.
    fn format(&self) -> DocFormat;

    /// Decode the whole file and flatten it to normalized text.
    ///
    /// An empty result is valid. Any failure is a parse error.
    fn parse(&self, input_path: &Path) -> Result<NormalizedText>;

    /// Best-effort structural counts for metadata inspection.
    ///
    /// A count that cannot be computed is simply left out.
    fn probe(&self, _input_path: &Path) -> Vec<StructuralCount> {
        Vec::new()
    }
}

/// Output format plugin: renders normalized text into a target file.
pub trait OutputPlugin: Send + Sync {
    /// Human-readable name of this plugin.
    fn name(&self) -> &str;

    /// The output format this plugin produces.
    fn output_format(&self) -> DocFormat;

    /// Encode text as the bytes of a complete output document.
    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>>;

    /// Render `text` and write it to `output_path`.
    ///
    /// Empty text is rejected before touching the filesystem. Bytes are
    /// written to a temporary file next to the target and moved into place
    /// only once complete, so a failed render leaves no output behind.
    fn convert(&self, text: &NormalizedText, output_path: &Path) -> Result<PathBuf> {
        if text.is_empty() {
            return Err(ConvertError::Validation(
                "No text content to convert".to_string(),
            ));
        }

        let format = self.output_format();
        let bytes = self.render(text).map_err(|e| e.into_render(format))?;
        write_atomic(output_path, &bytes).map_err(|e| ConvertError::render(format, e))?;

        debug!(
            "{} wrote {} bytes to {}",
            self.name(),
            bytes.len(),
            output_path.display()
        );
        Ok(output_path.to_path_buf())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct EchoOutput;
    impl OutputPlugin for EchoOutput {
        fn name(&self) -> &str {
            "Echo Output"
        }
        fn output_format(&self) -> DocFormat {
            DocFormat::Txt
        }
        fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
            Ok(text.as_str().as_bytes().to_vec())
        }
    }

    struct FailingOutput;
    impl OutputPlugin for FailingOutput {
        fn name(&self) -> &str {
            "Failing Output"
        }
        fn output_format(&self) -> DocFormat {
            DocFormat::Docx
        }
        fn render(&self, _text: &NormalizedText) -> Result<Vec<u8>> {
            Err(ConvertError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk on fire",
            )))
        }
    }

    #[test]
    fn test_convert_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("deeper").join("out.txt");
        let written = EchoOutput
            .convert(&NormalizedText::new("hello"), &out)
            .unwrap();
        assert_eq!(written, out);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello");
    }

    #[test]
    fn test_convert_rejects_empty_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never").join("out.txt");
        let err = EchoOutput
            .convert(&NormalizedText::default(), &out)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!dir.path().join("never").exists());
    }

    #[test]
    fn test_convert_accepts_whitespace_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        EchoOutput
            .convert(&NormalizedText::new("  \n \n"), &out)
            .unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "  \n \n");
    }

    #[test]
    fn test_failed_render_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.docx");
        let err = FailingOutput
            .convert(&NormalizedText::new("text"), &out)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
        assert!(!out.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
