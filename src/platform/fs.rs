// LogTally - platform/fs.rs
//
// Filesystem helpers used by the import layer.

use std::io;
use std::path::Path;

/// UTF-8 encoding of U+FEFF.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read the full content of a file as a string.
///
/// A leading UTF-8 byte-order mark is removed. For files with invalid UTF-8,
/// uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let mut bytes = std::fs::read(path)?;
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    let content = String::from_utf8(bytes).unwrap_or_else(|e| {
        tracing::debug!(path = %path.display(), "Invalid UTF-8; decoding lossily");
        String::from_utf8_lossy(e.as_bytes()).into_owned()
    });
    Ok(content)
}
