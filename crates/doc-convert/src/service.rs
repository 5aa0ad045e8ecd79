//! In-process service facade: the operations a route layer calls.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use convert_core::error::Result;
use convert_core::format::DocFormat;
use convert_core::metadata::MetadataRecord;
use convert_core::options::ServiceOptions;

use crate::batch::{BatchConversion, BatchReceipt, BatchStore};
use crate::inspect::inspect;
use crate::jobs::{convert_stored, ingest, UploadReceipt};
use crate::ledger::{HistoryEntry, Ledger};
use crate::reaper::{Reaper, ReaperHandle};
use crate::registry::{self, resolve_tag};
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReceipt {
    pub output_file: String,
    pub download_url: String,
    pub history_id: String,
}

/// A registry entry as listed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatInfo {
    pub id: DocFormat,
    pub name: String,
    pub extension: &'static str,
}

impl From<DocFormat> for FormatInfo {
    fn from(format: DocFormat) -> Self {
        Self {
            id: format,
            name: format.to_string(),
            extension: format.extension(),
        }
    }
}

pub struct ConvertService {
    options: ServiceOptions,
    storage: Storage,
    ledger: Ledger,
    batches: BatchStore,
}

impl ConvertService {
    /// Create the service and its storage directories.
    pub fn new(options: ServiceOptions) -> Result<Self> {
        let storage = Storage::from_options(&options);
        storage.ensure_dirs()?;
        Ok(Self {
            ledger: Ledger::new(options.history_capacity, options.history_read_limit),
            batches: BatchStore::new(),
            storage,
            options,
        })
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn upload(&self, original_name: &str, bytes: &[u8]) -> Result<UploadReceipt> {
        ingest(
            &self.storage,
            self.options.max_upload_bytes,
            original_name,
            bytes,
        )
    }

    /// Convert an uploaded file and record it in the ledger.
    pub fn convert(&self, file_id: &str, format_tag: &str) -> Result<ConversionReceipt> {
        let format = resolve_tag(format_tag)?;
        let stored = self.storage.resolve_upload(file_id)?;

        let output_file = convert_stored(&self.storage, &stored, format)?;
        let download_url = self.options.download_url(&output_file);

        let entry = HistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            input_file: stored.file_id.clone(),
            input_filename: stem(&stored.file_id).to_string(),
            input_format: stored.format,
            output_file: output_file.clone(),
            output_format: format,
            timestamp: Utc::now(),
            download_url: download_url.clone(),
        };
        let history_id = entry.id.clone();
        self.ledger.record(entry);

        log::info!("Converted {} to {}", stored.file_id, output_file);
        Ok(ConversionReceipt {
            output_file,
            download_url,
            history_id,
        })
    }

    pub fn file_info(&self, file_id: &str) -> Result<MetadataRecord> {
        let stored = self.storage.resolve_upload(file_id)?;
        Ok(inspect(&stored.path, stored.format.extension()))
    }

    /// The most recent conversions, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.ledger.read_recent(self.options.history_read_limit)
    }

    pub fn clear_history(&self) {
        self.ledger.clear();
    }

    pub fn batch_upload(&self, files: &[(String, Vec<u8>)]) -> Result<BatchReceipt> {
        self.batches.open_batch(&self.storage, &self.options, files)
    }

    pub fn batch_convert(&self, batch_id: &str, format_tag: &str) -> Result<BatchConversion> {
        self.batches
            .convert_batch(&self.storage, &self.options, batch_id, format_tag)
    }

    pub fn batch_download(&self, batch_id: &str) -> Result<(String, Vec<u8>)> {
        self.batches.download_batch(&self.storage, batch_id)
    }

    /// Path of a downloadable output file.
    pub fn output_path(&self, output_file: &str) -> Result<PathBuf> {
        self.storage.resolve_output(output_file)
    }

    pub fn input_formats(&self) -> Vec<FormatInfo> {
        registry::input_formats().into_iter().map(FormatInfo::from).collect()
    }

    pub fn output_formats(&self) -> Vec<FormatInfo> {
        registry::output_formats().into_iter().map(FormatInfo::from).collect()
    }

    /// A reaper over both storage directories using the configured
    /// retention window.
    pub fn reaper(&self) -> Reaper {
        Reaper::new(
            vec![
                self.storage.upload_dir().to_path_buf(),
                self.storage.output_dir().to_path_buf(),
            ],
            Duration::from_secs(self.options.retention_secs),
        )
    }

    /// Run [`reaper`](Self::reaper) every `reap_interval_secs` (at least one
    /// second) until the handle is stopped or dropped.
    pub fn start_reaper(&self) -> std::io::Result<ReaperHandle> {
        let interval = Duration::from_secs(self.options.reap_interval_secs.max(1));
        log::info!("Starting reaper, sweeping every {:?}", interval);
        self.reaper().spawn(interval)
    }
}

fn stem(file_id: &str) -> &str {
    Path::new(file_id)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_id)
}
