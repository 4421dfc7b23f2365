use crate::error::{ReportError, Result};
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::path::Path;
use tracing::warn;

/// Read a source file into text.
///
/// UTF-8 is expected and a leading BOM is dropped. Files that are not valid
/// UTF-8 are decoded as Windows-1252, which is what spreadsheet exports of
/// these tables tend to produce.
pub fn read_source_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| ReportError::ingest(path.display().to_string(), e.to_string()))?;
    Ok(decode_source_bytes(&bytes, &path.display().to_string()))
}

pub fn decode_source_bytes(bytes: &[u8], source_name: &str) -> String {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return text.into_owned();
    }

    warn!(
        source = source_name,
        "source is not valid UTF-8, decoding as Windows-1252"
    );
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}
