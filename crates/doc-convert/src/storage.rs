//! Flat upload/output directories and file naming.
//!
//! File ids look like `{sanitizedBase}_{8 hex}.{ext}`. Ids double as file
//! names inside the storage directories and never contain path separators.

use std::fs;
use std::path::{Path, PathBuf};

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::options::ServiceOptions;

const UPLOAD_FALLBACK: &str = "upload";
const OUTPUT_FALLBACK: &str = "converted";

/// A file placed in the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_id: String,
    pub path: PathBuf,
    pub format: DocFormat,
}

#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl Storage {
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn from_options(options: &ServiceOptions) -> Self {
        Self::new(&options.upload_dir, &options.output_dir)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.upload_dir)?;
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Write uploaded bytes under a fresh id derived from `original_name`.
    pub fn store_upload(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        let format = upload_format(original_name)?;
        let file_id = unique_name(base_name(original_name), UPLOAD_FALLBACK, format);

        fs::create_dir_all(&self.upload_dir)?;
        let path = self.upload_dir.join(&file_id);
        fs::write(&path, bytes)?;
        log::debug!("Stored upload {} ({} bytes)", file_id, bytes.len());

        Ok(StoredFile {
            file_id,
            path,
            format,
        })
    }

    /// Look up an existing upload by id.
    pub fn resolve_upload(&self, file_id: &str) -> Result<StoredFile> {
        validate_file_id(file_id)?;
        let format = upload_format(file_id)?;
        let path = self.upload_dir.join(file_id);
        if !path.is_file() {
            return Err(ConvertError::NotFound(format!("File not found: {}", file_id)));
        }
        Ok(StoredFile {
            file_id: file_id.to_string(),
            path,
            format,
        })
    }

    /// Look up an existing output by name.
    pub fn resolve_output(&self, output_file: &str) -> Result<PathBuf> {
        validate_file_id(output_file)?;
        let path = self.output_dir.join(output_file);
        if !path.is_file() {
            return Err(ConvertError::NotFound(format!(
                "File not found: {}",
                output_file
            )));
        }
        Ok(path)
    }

    /// Choose a fresh output name for converting `file_id` to `format`.
    pub fn output_name(&self, file_id: &str, format: DocFormat) -> String {
        unique_name(base_name(file_id), OUTPUT_FALLBACK, format)
    }

    pub fn output_path(&self, output_file: &str) -> PathBuf {
        self.output_dir.join(output_file)
    }

    pub fn remove_upload(&self, stored: &StoredFile) {
        if let Err(e) = fs::remove_file(&stored.path) {
            log::warn!("Failed to remove upload {}: {}", stored.path.display(), e);
        }
    }
}

/// Reject ids that could escape the storage directory.
pub fn validate_file_id(file_id: &str) -> Result<()> {
    if file_id.is_empty()
        || file_id.contains("..")
        || file_id.contains('/')
        || file_id.contains('\\')
    {
        return Err(ConvertError::Validation(format!(
            "Invalid filename: {}",
            file_id
        )));
    }
    Ok(())
}

/// Keep alphanumerics, space, `-`, `_` and `.`, then trim. An empty result
/// becomes `fallback`.
pub fn sanitize(base: &str, fallback: &str) -> String {
    let kept: String = base
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect();
    let trimmed = kept.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// A client file name reduced to a safe, flat form.
///
/// Path separators and whitespace runs become `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped and leading or trailing `.` and `_` are
/// stripped. A name with nothing left becomes `upload.<ext>`.
pub fn secure_file_name(name: &str) -> String {
    let flat = name.replace(['/', '\\'], " ");
    let joined = flat.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = kept.trim_matches(['.', '_']);
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    match DocFormat::from_file_name(name) {
        Some(format) => format!("upload.{}", format.extension()),
        None => "upload".to_string(),
    }
}

fn unique_name(base: &str, fallback: &str, format: DocFormat) -> String {
    format!(
        "{}_{}.{}",
        sanitize(base, fallback),
        short_suffix(),
        format.extension()
    )
}

fn short_suffix() -> String {
    let mut simple = uuid::Uuid::new_v4().simple().to_string();
    simple.truncate(8);
    simple
}

/// File name without directories and without its last extension.
fn base_name(name: &str) -> &str {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file.rsplit_once('.') {
        Some((base, _)) => base,
        None => file,
    }
}

/// Format of an upload, from its last extension.
pub fn upload_format(name: &str) -> Result<DocFormat> {
    DocFormat::from_file_name(name).ok_or_else(|| {
        ConvertError::UnsupportedFormat(format!(
            "{} (supported: {})",
            name,
            supported_list()
        ))
    })
}

fn supported_list() -> String {
    let mut tags: Vec<&str> = DocFormat::ALL.iter().map(|f| f.extension()).collect();
    tags.sort_unstable();
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use convert_core::error::ErrorKind;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  my report (v2) ", "x"), "my report v2");
        assert_eq!(sanitize("naïve-名前_1.0", "x"), "naïve-名前_1.0");
        assert_eq!(sanitize("$$$", "converted"), "converted");
        assert_eq!(sanitize("", "upload"), "upload");
    }

    #[test]
    fn test_secure_file_name() {
        assert_eq!(secure_file_name("My Report v2.txt"), "My_Report_v2.txt");
        assert_eq!(secure_file_name("../../etc/passwd.txt"), "etc_passwd.txt");
        assert_eq!(secure_file_name("C:\\docs\\memo (1).rtf"), "C_docs_memo_1.rtf");
        assert_eq!(secure_file_name("名前.json"), "json");
        assert_eq!(secure_file_name("..."), "upload");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a.tar.gz"), "a.tar");
        assert_eq!(base_name("../../etc/passwd.txt"), "passwd");
        assert_eq!(base_name("C:\\docs\\memo.rtf"), "memo");
        assert_eq!(base_name("noext"), "noext");
    }

    #[test]
    fn test_unique_name_shape() {
        let name = unique_name("report", OUTPUT_FALLBACK, DocFormat::Pdf);
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "pdf");
        let (base, suffix) = stem.rsplit_once('_').unwrap();
        assert_eq!(base, "report");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(name, unique_name("report", OUTPUT_FALLBACK, DocFormat::Pdf));
    }

    #[test]
    fn test_store_and_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("in"), dir.path().join("out"));

        let stored = storage.store_upload("Notes.TXT", b"hello").unwrap();
        assert_eq!(stored.format, DocFormat::Txt);
        assert!(stored.file_id.starts_with("Notes_"));
        assert!(stored.file_id.ends_with(".txt"));
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"hello");

        let resolved = storage.resolve_upload(&stored.file_id).unwrap();
        assert_eq!(resolved, stored);
    }

    #[test]
    fn test_store_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("in"), dir.path().join("out"));

        let err = storage.store_upload("photo.png", b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        let err = storage.store_upload("README", b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(!dir.path().join("in").exists());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path(), dir.path());
        for id in ["../secret.txt", "a/b.txt", "a\\b.txt", ""] {
            let err = storage.resolve_upload(id).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_resolve_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path(), dir.path());
        assert_eq!(
            storage.resolve_upload("gone_12345678.txt").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            storage.resolve_output("gone_12345678.pdf").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
