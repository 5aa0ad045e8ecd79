//! Single-file units of work shared by the service and the batch
//! coordinator: ingesting an upload and converting a stored file.

use serde::Serialize;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::metadata::MetadataRecord;
use convert_core::pipeline::{extract_with, Pipeline};

use crate::inspect::inspect;
use crate::registry::{converter_for, parser_for};
use crate::storage::{upload_format, Storage, StoredFile};

/// An accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub file_id: String,
    pub filename: String,
    /// Characters of text extracted from the file.
    pub size: usize,
    pub metadata: MetadataRecord,
}

pub type UploadReceipt = UploadedFile;

/// Validate, store and parse one uploaded file.
///
/// Anything stored for a rejected file is removed again.
pub fn ingest(
    storage: &Storage,
    max_bytes: u64,
    original_name: &str,
    bytes: &[u8],
) -> Result<UploadedFile> {
    if original_name.trim().is_empty() {
        return Err(ConvertError::Validation("No file selected".to_string()));
    }
    upload_format(original_name)?;
    if bytes.len() as u64 > max_bytes {
        return Err(ConvertError::Validation(format!(
            "{} is {} bytes, limit is {}",
            original_name,
            bytes.len(),
            max_bytes
        )));
    }

    let stored = storage.store_upload(original_name, bytes)?;
    let text = match extract_with(parser_for(stored.format), &stored.path) {
        Ok(text) => text,
        Err(e) => {
            storage.remove_upload(&stored);
            return Err(e);
        }
    };
    if text.is_empty() {
        storage.remove_upload(&stored);
        return Err(ConvertError::Validation(
            "File is empty or could not extract text".to_string(),
        ));
    }

    let metadata = inspect(&stored.path, stored.format.extension());
    log::info!(
        "Accepted {} as {} ({} characters)",
        original_name,
        stored.file_id,
        text.char_count()
    );

    Ok(UploadedFile {
        file_id: stored.file_id,
        filename: original_name.to_string(),
        size: text.char_count(),
        metadata,
    })
}

/// Convert a stored upload to `format`, returning the new output file name.
pub fn convert_stored(storage: &Storage, stored: &StoredFile, format: DocFormat) -> Result<String> {
    let output_file = storage.output_name(&stored.file_id, format);
    let output_path = storage.output_path(&output_file);

    Pipeline::new(parser_for(stored.format), converter_for(format))
        .run(&stored.path, &output_path)?;
    Ok(output_file)
}
