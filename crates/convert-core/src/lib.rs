//! Core types for document conversion: format tags, the normalized text IR,
//! plugin traits and the extraction/rendering pipeline.

pub mod error;
pub mod format;
pub mod metadata;
pub mod options;
pub mod pipeline;
pub mod plugin;
pub mod text;

pub use error::{ConvertError, ErrorKind, Result};
pub use format::DocFormat;
pub use metadata::{MetadataRecord, StructuralCount};
pub use options::ServiceOptions;
pub use pipeline::Pipeline;
pub use plugin::{InputPlugin, OutputPlugin};
pub use text::NormalizedText;
