//! Service options shared by the library facade and the CLI.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// All options controlling storage, retention and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceOptions {
    // -- Storage --
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub max_upload_bytes: u64,

    // -- Retention --
    pub retention_secs: u64,
    pub reap_interval_secs: u64,

    // -- History --
    pub history_capacity: usize,
    pub history_read_limit: usize,

    // -- Links --
    pub download_prefix: String,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("outputs"),
            max_upload_bytes: 16 * 1024 * 1024,
            retention_secs: 3600,
            reap_interval_secs: 3600,
            history_capacity: 100,
            history_read_limit: 50,
            download_prefix: "/api/download".to_string(),
        }
    }
}

impl ServiceOptions {
    /// Download reference for a file in the outputs directory.
    pub fn download_url(&self, output_file: &str) -> String {
        format!(
            "{}/{}",
            self.download_prefix.trim_end_matches('/'),
            output_file
        )
    }
}
