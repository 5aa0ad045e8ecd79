//! TXT output plugin: writes normalized text unchanged.

use convert_core::error::Result;
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;

pub struct TxtOutputPlugin;

impl OutputPlugin for TxtOutputPlugin {
    fn name(&self) -> &str {
        "TXT Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Txt
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        log::info!("Rendering TXT: {} characters", text.char_count());
        Ok(text.as_str().as_bytes().to_vec())
    }
}
