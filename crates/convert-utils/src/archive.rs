//! ZIP archive utilities for reading and writing DOCX, ODT and EPUB packages.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Open a ZIP archive from disk.
pub fn open_zip(zip_path: &Path) -> io::Result<ZipArchive<File>> {
    let file = File::open(zip_path)?;
    Ok(ZipArchive::new(file)?)
}

/// Read a single entry from an open archive.
pub fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, entry_name: &str) -> io::Result<Vec<u8>> {
    let mut entry = archive.by_name(entry_name)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Read a single entry from an open archive as UTF-8 text.
pub fn read_entry_string<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    entry_name: &str,
) -> io::Result<String> {
    let bytes = read_entry(archive, entry_name)?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Builder for creating ZIP archives.
///
/// Every entry carries the same fixed timestamp, so the same entries in the
/// same order always produce the same bytes.
pub struct ZipBuilder<W: Write + Seek> {
    writer: ZipWriter<W>,
}

impl ZipBuilder<File> {
    /// Create a new ZIP file at the given path.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl ZipBuilder<Cursor<Vec<u8>>> {
    /// Build the archive in memory.
    pub fn in_memory() -> Self {
        Self::new(Cursor::new(Vec::new()))
    }

    /// Finish the archive and return its bytes.
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl<W: Write + Seek> ZipBuilder<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: ZipWriter::new(inner),
        }
    }

    fn options(method: CompressionMethod) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default())
    }

    /// Add a file entry with the given content.
    pub fn add_file(&mut self, name: &str, content: &[u8]) -> io::Result<()> {
        self.writer
            .start_file(name, Self::options(CompressionMethod::Deflated))?;
        self.writer.write_all(content)?;
        Ok(())
    }

    /// Add a file entry stored without compression (the `mimetype` entry of
    /// EPUB and ODT packages).
    pub fn add_stored(&mut self, name: &str, content: &[u8]) -> io::Result<()> {
        self.writer
            .start_file(name, Self::options(CompressionMethod::Stored))?;
        self.writer.write_all(content)?;
        Ok(())
    }

    /// Finish writing the ZIP archive.
    pub fn finish(self) -> io::Result<W> {
        Ok(self.writer.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("roundtrip.zip");

        {
            let mut builder = ZipBuilder::create(&tmp).unwrap();
            builder
                .add_stored("mimetype", b"application/epub+zip")
                .unwrap();
            builder.add_file("content.xml", b"<root/>").unwrap();
            builder.finish().unwrap();
        }

        let mut archive = open_zip(&tmp).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "mimetype");
        assert_eq!(read_entry(&mut archive, "content.xml").unwrap(), b"<root/>");
    }

    #[test]
    fn test_in_memory_is_deterministic() {
        let build = || {
            let mut builder = ZipBuilder::in_memory();
            builder.add_stored("mimetype", b"text/plain").unwrap();
            builder.add_file("a.txt", b"same bytes").unwrap();
            builder.into_bytes().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_read_entry_string_rejects_bad_utf8() {
        let mut builder = ZipBuilder::in_memory();
        builder.add_file("bad.txt", &[0xff, 0xfe, 0x00]).unwrap();
        let bytes = builder.into_bytes().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let err = read_entry_string(&mut archive, "bad.txt").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(read_entry(&mut archive, "missing.txt").is_err());
    }
}
