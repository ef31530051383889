// LogTally - app/import.rs
//
// Batch import: read a log file, parse it line by line, and append the
// resulting records to a store.
//
// - Parse failures never abort the import; they are skipped (and reported
//   as diagnostics under the strict policy).
// - Records are appended in batches of IMPORT_BATCH_SIZE, in line order.
// - Store failures are fatal and propagate to the caller.

use crate::app::store::RecordStore;
use crate::core::model::ParsePolicy;
use crate::core::parser;
use crate::platform::fs::read_file_lossy;
use crate::util::constants::IMPORT_BATCH_SIZE;
use crate::util::error::{AppError, ParseError, Result};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

/// Outcome of one import.
#[derive(Debug, Default)]
pub struct ImportSummary {
    /// Lines read from the input.
    pub lines_read: u64,
    /// Records parsed and appended to the store.
    pub records_imported: usize,
    /// Lines that did not produce a record.
    pub lines_skipped: u64,
    /// Per-line diagnostics (strict policy only).
    pub diagnostics: Vec<ParseError>,
    /// Wall-clock import duration.
    pub duration: Duration,
}

/// Import every parseable line of `content` into `store`.
pub fn import_content(
    store: &mut dyn RecordStore,
    content: &str,
    policy: ParsePolicy,
) -> Result<ImportSummary> {
    let started = Instant::now();
    let parsed = parser::parse_content(content, policy);

    let records_imported = parsed.entries.len();
    let mut batches = 0usize;
    let mut entries = parsed.entries.into_iter().peekable();
    while entries.peek().is_some() {
        let batch: Vec<_> = entries.by_ref().take(IMPORT_BATCH_SIZE).collect();
        store.append_all(batch)?;
        batches += 1;
    }

    let summary = ImportSummary {
        lines_read: parsed.lines_processed,
        records_imported,
        lines_skipped: parsed.lines_skipped,
        diagnostics: parsed.errors,
        duration: started.elapsed(),
    };

    tracing::info!(
        lines = summary.lines_read,
        imported = summary.records_imported,
        skipped = summary.lines_skipped,
        batches,
        policy = ?policy,
        duration_ms = summary.duration.as_millis() as u64,
        "Import complete"
    );

    Ok(summary)
}

/// Read `path` and import it into `store`.
///
/// Invalid UTF-8 is replaced rather than rejected. A missing file is
/// `AppError::InputNotFound`.
pub fn import_file(
    store: &mut dyn RecordStore,
    path: &Path,
    policy: ParsePolicy,
) -> Result<ImportSummary> {
    tracing::info!(file = %path.display(), "Importing log file");

    let content = read_file_lossy(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            AppError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AppError::Io {
                path: path.to_path_buf(),
                operation: "read",
                source: e,
            }
        }
    })?;

    import_content(store, &content, policy)
}
