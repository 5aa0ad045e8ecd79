//! Parser and converter registries.
//!
//! Both are exhaustive matches over [`DocFormat`], so adding a format
//! without wiring its plugins is a compile error.

use convert_core::error::{ConvertError, Result};
use convert_core::format::DocFormat;
use convert_core::plugin::{InputPlugin, OutputPlugin};

pub fn parser_for(format: DocFormat) -> &'static dyn InputPlugin {
    match format {
        DocFormat::Txt => &convert_input_txt::TxtInputPlugin,
        DocFormat::Pdf => &convert_input_pdf::PdfInputPlugin,
        DocFormat::Docx => &convert_input_docx::DocxInputPlugin,
        DocFormat::Html => &convert_input_html::HtmlInputPlugin,
        DocFormat::Json => &convert_input_json::JsonInputPlugin,
        DocFormat::Csv => &convert_input_csv::CsvInputPlugin,
        DocFormat::Xml => &convert_input_xml::XmlInputPlugin,
        DocFormat::Rtf => &convert_input_rtf::RtfInputPlugin,
        DocFormat::Epub => &convert_input_epub::EpubInputPlugin,
        DocFormat::Odt => &convert_input_odt::OdtInputPlugin,
    }
}

pub fn converter_for(format: DocFormat) -> &'static dyn OutputPlugin {
    match format {
        DocFormat::Txt => &convert_output_txt::TxtOutputPlugin,
        DocFormat::Pdf => &convert_output_pdf::PdfOutputPlugin,
        DocFormat::Docx => &convert_output_docx::DocxOutputPlugin,
        DocFormat::Html => &convert_output_html::HtmlOutputPlugin,
        DocFormat::Json => &convert_output_json::JsonOutputPlugin,
        DocFormat::Csv => &convert_output_csv::CsvOutputPlugin,
        DocFormat::Xml => &convert_output_xml::XmlOutputPlugin,
        DocFormat::Rtf => &convert_output_rtf::RtfOutputPlugin,
        DocFormat::Epub => &convert_output_epub::EpubOutputPlugin,
        DocFormat::Odt => &convert_output_odt::OdtOutputPlugin,
    }
}

/// Resolve a format tag, failing with `UnsupportedFormat` for anything
/// outside the registry.
pub fn resolve_tag(tag: &str) -> Result<DocFormat> {
    DocFormat::from_tag(tag).ok_or_else(|| ConvertError::UnsupportedFormat(tag.to_string()))
}

pub fn parser_for_tag(tag: &str) -> Result<&'static dyn InputPlugin> {
    resolve_tag(tag).map(parser_for)
}

pub fn converter_for_tag(tag: &str) -> Result<&'static dyn OutputPlugin> {
    resolve_tag(tag).map(converter_for)
}

/// Formats with a registered parser, in registry order.
pub fn input_formats() -> Vec<DocFormat> {
    DocFormat::ALL.to_vec()
}

/// Formats with a registered converter, in registry order.
pub fn output_formats() -> Vec<DocFormat> {
    DocFormat::ALL.to_vec()
}
