//! doc-convert: upload, inspect and convert documents between formats.
//!
//! Every input is flattened to [`NormalizedText`] by a format parser and
//! re-rendered by a format converter. [`ConvertService`] owns the storage
//! directories, the conversion ledger and the batch store.

pub mod batch;
pub mod inspect;
pub mod jobs;
pub mod ledger;
pub mod reaper;
pub mod registry;
pub mod service;
pub mod storage;

pub use batch::{BatchConversion, BatchReceipt, BatchRecord, BatchStore, ConvertedFile};
pub use convert_core::{ConvertError, DocFormat, ErrorKind, MetadataRecord, NormalizedText, Result};
pub use inspect::inspect;
pub use jobs::{UploadReceipt, UploadedFile};
pub use ledger::{HistoryEntry, Ledger};
pub use reaper::{Clock, Reaper, ReaperHandle, SweepReport, SystemClock};
pub use service::{ConversionReceipt, ConvertService, FormatInfo};
pub use storage::{Storage, StoredFile};
