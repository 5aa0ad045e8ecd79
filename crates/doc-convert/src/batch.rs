//! Batch coordinator: groups uploads under one id, converts them together
//! and packs the results into a single zip.
//!
//! Per-file failures never fail a batch; the file is logged and left out.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::options::ServiceOptions;
use convert_utils::archive::ZipBuilder;

use crate::jobs::{convert_stored, ingest, UploadedFile};
use crate::registry::resolve_tag;
use crate::storage::{secure_file_name, Storage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedFile {
    pub original_filename: String,
    pub output_file: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub id: String,
    pub files: Vec<UploadedFile>,
    pub created_at: DateTime<Utc>,
    pub converted: Option<Vec<ConvertedFile>>,
    pub format: Option<DocFormat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReceipt {
    pub batch_id: String,
    pub files: Vec<UploadedFile>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchConversion {
    pub batch_id: String,
    pub converted_files: Vec<ConvertedFile>,
    pub count: usize,
}

/// Batch records keyed by id. Records live as long as the store.
#[derive(Debug, Default)]
pub struct BatchStore {
    batches: Mutex<HashMap<String, BatchRecord>>,
}

impl BatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest every file independently and open a batch for the survivors.
    pub fn open_batch(
        &self,
        storage: &Storage,
        options: &ServiceOptions,
        files: &[(String, Vec<u8>)],
    ) -> Result<BatchReceipt> {
        let accepted: Vec<UploadedFile> = files
            .iter()
            .filter_map(|(name, bytes)| {
                match ingest(storage, options.max_upload_bytes, name, bytes) {
                    Ok(uploaded) => Some(UploadedFile {
                        filename: secure_file_name(name),
                        ..uploaded
                    }),
                    Err(e) => {
                        log::warn!("Skipping {} in batch: {}", name, e);
                        None
                    }
                }
            })
            .collect();

        if accepted.is_empty() {
            return Err(ConvertError::Validation(
                "No valid files uploaded".to_string(),
            ));
        }

        let record = BatchRecord {
            id: uuid::Uuid::new_v4().to_string(),
            files: accepted,
            created_at: Utc::now(),
            converted: None,
            format: None,
        };
        let receipt = BatchReceipt {
            batch_id: record.id.clone(),
            count: record.files.len(),
            files: record.files.clone(),
        };
        log::info!("Opened batch {} with {} files", receipt.batch_id, receipt.count);

        self.lock().insert(record.id.clone(), record);
        Ok(receipt)
    }

    /// Convert every file of a batch to `format_tag` in parallel.
    pub fn convert_batch(
        &self,
        storage: &Storage,
        options: &ServiceOptions,
        batch_id: &str,
        format_tag: &str,
    ) -> Result<BatchConversion> {
        let files = self.get(batch_id)?.files;
        let format = resolve_tag(format_tag)?;

        let converted: Vec<ConvertedFile> = files
            .par_iter()
            .filter_map(|file| {
                let result = storage
                    .resolve_upload(&file.file_id)
                    .and_then(|stored| convert_stored(storage, &stored, format));
                match result {
                    Ok(output_file) => Some(ConvertedFile {
                        original_filename: file.filename.clone(),
                        download_url: options.download_url(&output_file),
                        output_file,
                    }),
                    Err(e) => {
                        log::warn!("Batch {}: skipping {}: {}", batch_id, file.file_id, e);
                        None
                    }
                }
            })
            .collect();

        let mut batches = self.lock();
        let record = batches
            .get_mut(batch_id)
            .ok_or_else(|| batch_not_found(batch_id))?;
        record.converted = Some(converted.clone());
        record.format = Some(format);

        log::info!(
            "Batch {}: converted {} of {} files to {}",
            batch_id,
            converted.len(),
            files.len(),
            format
        );
        Ok(BatchConversion {
            batch_id: batch_id.to_string(),
            count: converted.len(),
            converted_files: converted,
        })
    }

    /// Zip every converted file still on disk. Returns the archive name and
    /// its bytes.
    pub fn download_batch(&self, storage: &Storage, batch_id: &str) -> Result<(String, Vec<u8>)> {
        let record = self.get(batch_id)?;
        let converted = record
            .converted
            .ok_or_else(|| ConvertError::Validation("Batch not converted yet".to_string()))?;

        let mut zip = ZipBuilder::in_memory();
        for file in &converted {
            let path = storage.output_path(&file.output_file);
            match std::fs::read(&path) {
                Ok(bytes) => zip.add_file(&file.output_file, &bytes)?,
                Err(e) => log::debug!("Leaving {} out of archive: {}", path.display(), e),
            }
        }
        let bytes = zip.into_bytes()?;

        let short_id = batch_id.get(..8).unwrap_or(batch_id);
        Ok((format!("converted_files_{}.zip", short_id), bytes))
    }

    pub fn get(&self, batch_id: &str) -> Result<BatchRecord> {
        self.lock()
            .get(batch_id)
            .cloned()
            .ok_or_else(|| batch_not_found(batch_id))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, BatchRecord>> {
        self.batches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn batch_not_found(batch_id: &str) -> ConvertError {
    ConvertError::NotFound(format!("Batch not found: {}", batch_id))
}
