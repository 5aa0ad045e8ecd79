//! CSV output plugin: one numbered row per line, blank lines included.

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;

pub struct CsvOutputPlugin;

impl OutputPlugin for CsvOutputPlugin {
    fn name(&self) -> &str {
        "CSV Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Csv
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        log::info!("Rendering CSV: {} rows", text.line_count());
        let err = |e: csv::Error| ConvertError::render(DocFormat::Csv, e);

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        writer.write_record(["Line Number", "Content"]).map_err(err)?;
        for (idx, line) in text.lines().enumerate() {
            let number = (idx + 1).to_string();
            writer.write_record([number.as_str(), line]).map_err(err)?;
        }

        writer
            .into_inner()
            .map_err(|e| ConvertError::render(DocFormat::Csv, e.error()))
    }
}
