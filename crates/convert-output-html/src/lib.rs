//! HTML output plugin: renders each line as an HTML5 paragraph.

use convert_core::error::Result;
use convert_core::format::DocFormat;
use convert_core::plugin::OutputPlugin;
use convert_core::text::NormalizedText;
use convert_utils::xml::paragraph_markup;

pub struct HtmlOutputPlugin;

const TITLE: &str = "Converted Document";

const STYLE: &str = r#"        body {
            font-family: Arial, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }"#;

impl OutputPlugin for HtmlOutputPlugin {
    fn name(&self) -> &str {
        "HTML Output"
    }

    fn output_format(&self) -> DocFormat {
        DocFormat::Html
    }

    fn render(&self, text: &NormalizedText) -> Result<Vec<u8>> {
        log::info!("Rendering HTML: {} lines", text.line_count());
        Ok(build_page(text).into_bytes())
    }
}

fn build_page(text: &NormalizedText) -> String {
    let body = paragraph_markup(text.lines());
    let mut html = String::with_capacity(body.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("    <title>{}</title>\n", TITLE));
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("\n    </style>\n</head>\n<body>\n");
    html.push_str(&body);
    html.push_str("\n</body>\n</html>");
    html
}
