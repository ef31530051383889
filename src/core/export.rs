// LogTally - core/export.rs
//
// CSV and JSON export of record sets.
// Core layer: writes to any Write trait object.

use crate::core::model::LogRecord;
use crate::util::constants::MAX_EXPORT_RECORDS;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

fn check_size(records: &[LogRecord]) -> Result<(), ExportError> {
    if records.len() > MAX_EXPORT_RECORDS {
        return Err(ExportError::TooManyRecords {
            count: records.len(),
            max: MAX_EXPORT_RECORDS,
        });
    }
    Ok(())
}

/// Export records to CSV format.
///
/// Writes: timestamp (RFC 3339), level, message. `export_path` is only used
/// for error context. Returns the number of rows written.
pub fn export_csv<W: Write>(
    records: &[LogRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(records)?;

    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["timestamp", "level", "message"])
        .map_err(csv_err)?;

    let mut count = 0;
    for record in records {
        csv_writer
            .write_record([
                record.timestamp().to_rfc3339().as_str(),
                record.level(),
                record.message(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %export_path.display(), rows = count, "CSV export written");
    Ok(count)
}

/// Export records to JSON format (array of objects).
pub fn export_json<W: Write>(
    records: &[LogRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(records)?;

    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %export_path.display(), records = records.len(), "JSON export written");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_line;

    fn records() -> Vec<LogRecord> {
        [
            "2024-01-01 10:00:00|ERROR|disk full, retrying",
            "2024-01-01 10:00:01|INFO|a \"quoted\" message",
        ]
        .iter()
        .filter_map(|l| parse_line(l))
        .collect()
    }

    #[test]
    fn test_csv_export() {
        let mut buf = Vec::new();
        let count = export_csv(&records(), &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("timestamp,level,message"));
        assert_eq!(
            lines.next(),
            Some("2024-01-01T10:00:00+00:00,ERROR,\"disk full, retrying\"")
        );
        assert!(output.contains("\"a \"\"quoted\"\" message\""));
    }

    #[test]
    fn test_csv_export_empty_writes_header_only() {
        let mut buf = Vec::new();
        let count = export_csv(&[], &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(buf).unwrap(), "timestamp,level,message\n");
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        let count = export_json(&records(), &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 2);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["level"], "ERROR");
        assert_eq!(array[0]["message"], "disk full, retrying");
        assert_eq!(array[0]["timestamp"], "2024-01-01T10:00:00Z");
    }
}
