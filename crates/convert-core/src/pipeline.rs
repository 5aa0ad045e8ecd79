//! Pipeline orchestrator: extraction followed by rendering.
//!
//! The pipeline runs in two steps:
//!   1. Input plugin → NormalizedText
//!   2. Output plugin → target file

use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::plugin::{InputPlugin, OutputPlugin};
use crate::text::NormalizedText;

/// A parser paired with a converter.
pub struct Pipeline<'a> {
    input_plugin: &'a dyn InputPlugin,
    output_plugin: &'a dyn OutputPlugin,
}

impl<'a> Pipeline<'a> {
    pub fn new(input_plugin: &'a dyn InputPlugin, output_plugin: &'a dyn OutputPlugin) -> Self {
        Self {
            input_plugin,
            output_plugin,
        }
    }

    /// Run only the extraction step.
    ///
    /// Whatever the plugin fails with is reported as a parse error.
    pub fn extract(&self, input_path: &Path) -> Result<NormalizedText> {
        extract_with(self.input_plugin, input_path)
    }

    /// Run the full conversion and return the written path.
    pub fn run(&self, input_path: &Path, output_path: &Path) -> Result<PathBuf> {
        let text = self.extract(input_path)?;

        info!("Running {} output plugin...", self.output_plugin.name());
        let written = self.output_plugin.convert(&text, output_path)?;

        info!(
            "{} output written to {}",
            self.output_plugin.output_format(),
            written.display()
        );
        Ok(written)
    }
}

/// Run one parser over a file, tagging any failure as a parse error.
pub fn extract_with(plugin: &dyn InputPlugin, input_path: &Path) -> Result<NormalizedText> {
    info!(
        "Running {} input plugin on {}",
        plugin.name(),
        input_path.display()
    );
    plugin
        .parse(input_path)
        .map_err(|e| e.into_parse(plugin.format()))
}
