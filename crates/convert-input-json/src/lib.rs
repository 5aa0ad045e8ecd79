//! JSON input plugin: flattens every scalar leaf into one line of text.
//!
//! Key names are discarded. Leaves come out in document order, which
//! `serde_json`'s `preserve_order` feature keeps for objects.

use std::path::Path;

use serde_json::Value;

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::metadata::StructuralCount;
use convert_core::plugin::InputPlugin;
use convert_core::text::NormalizedText;

pub struct JsonInputPlugin;

impl InputPlugin for JsonInputPlugin {
    fn name(&self) -> &str {
        "JSON Input"
    }

    fn format(&self) -> DocFormat {
        DocFormat::Json
    }

    fn parse(&self, input_path: &Path) -> Result<NormalizedText> {
        log::info!("Reading JSON: {}", input_path.display());
        let value = load_json(input_path)?;

        let mut lines = Vec::new();
        collect_leaves(&value, &mut lines);
        Ok(NormalizedText::from_lines(lines))
    }

    fn probe(&self, input_path: &Path) -> Vec<StructuralCount> {
        match load_json(input_path) {
            Ok(Value::Object(map)) => vec![StructuralCount::Keys(map.len())],
            Ok(Value::Array(items)) => vec![StructuralCount::Items(items.len())],
            Ok(_) => Vec::new(),
            Err(e) => {
                log::debug!("JSON probe skipped: {}", e);
                Vec::new()
            }
        }
    }
}

fn load_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConvertError::parse(
            DocFormat::Json,
            format!("Cannot read {}: {}", path.display(), e),
        )
    })?;
    serde_json::from_str(&content).map_err(|e| ConvertError::parse(DocFormat::Json, e))
}

/// Pre-order walk pushing one line per scalar.
fn collect_leaves(value: &Value, lines: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for child in map.values() {
                collect_leaves(child, lines);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_leaves(child, lines);
            }
        }
        Value::String(s) => lines.push(s.clone()),
        scalar => lines.push(scalar.to_string()),
    }
}
