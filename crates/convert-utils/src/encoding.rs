//! Character encoding detection and conversion.

use encoding_rs::Encoding;

/// Detect encoding from a byte string and decode to UTF-8.
/// Tries BOM detection first, then strict UTF-8, then Windows-1252.
pub fn decode_to_utf8(bytes: &[u8]) -> (String, &'static str) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (result, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (result.into_owned(), encoding.name());
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), "UTF-8"),
        Err(_) => {
            // Older RTF writers emit cp1252 without declaring it
            let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            (result.into_owned(), "windows-1252")
        }
    }
}

/// Decode bytes using a specific encoding label.
pub fn decode_with_encoding(bytes: &[u8], encoding_name: &str) -> Option<String> {
    let encoding = Encoding::for_label(encoding_name.as_bytes())?;
    let (result, _, _) = encoding.decode(bytes);
    Some(result.into_owned())
}
