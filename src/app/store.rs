// LogTally - app/store.rs
//
// Record storage behind a small bulk-read / append trait.
//
// Two implementations:
// - `MemoryStore`: a Vec, used when nothing needs to outlive the process.
// - `JsonLinesStore`: one JSON object per line in a file. Appends never
//   rewrite earlier lines, and records accumulate across runs.
//
// Both preserve insertion order, which the first-occurrence and top-errors
// queries depend on. No durability or transaction guarantees are made.

use crate::core::model::LogRecord;
use crate::util::error::StoreError;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Bulk-read / append access to a record collection.
pub trait RecordStore {
    /// Every stored record, in insertion order.
    fn read_all(&self) -> Result<Vec<LogRecord>, StoreError>;

    /// Append one record.
    fn append(&mut self, record: LogRecord) -> Result<(), StoreError> {
        self.append_all(vec![record])
    }

    /// Append records, keeping their order.
    fn append_all(&mut self, records: Vec<LogRecord>) -> Result<(), StoreError>;

    /// Number of stored records.
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process store backed by a Vec.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<LogRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<LogRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn append_all(&mut self, records: Vec<LogRecord>) -> Result<(), StoreError> {
        self.records.extend(records);
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }
}

// =============================================================================
// JsonLinesStore
// =============================================================================

/// File-backed store holding one serialised record per line.
#[derive(Debug, Clone)]
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    /// Open a store at `path`. The file (and its parent directory) is created
    /// on the first append; a missing file reads as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::debug!(path = %path.display(), "Record store opened");
        Self { path }
    }

    fn io_err(&self, operation: &'static str) -> impl FnOnce(io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            path: self.path.clone(),
            operation,
            source,
        }
    }

    fn open_reader(&self) -> Result<Option<BufReader<File>>, StoreError> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_err("open")(e)),
        }
    }
}

impl RecordStore for JsonLinesStore {
    fn read_all(&self) -> Result<Vec<LogRecord>, StoreError> {
        let Some(reader) = self.open_reader()? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(self.io_err("read"))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: LogRecord = serde_json::from_str(&line).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                line_number: (idx as u64) + 1,
                source: e,
            })?;
            records.push(record);
        }

        tracing::debug!(path = %self.path.display(), records = records.len(), "Store read");
        Ok(records)
    }

    fn append_all(&mut self, records: Vec<LogRecord>) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(self.io_err("create directory"))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(self.io_err("open for append"))?;
        let mut writer = BufWriter::new(file);

        for record in &records {
            serde_json::to_writer(&mut writer, record).map_err(|e| StoreError::Serialize {
                path: self.path.clone(),
                source: e,
            })?;
            writer.write_all(b"\n").map_err(self.io_err("append"))?;
        }
        writer.flush().map_err(self.io_err("flush"))?;

        tracing::debug!(path = %self.path.display(), appended = records.len(), "Store append");
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let Some(reader) = self.open_reader()? else {
            return Ok(0);
        };
        let mut count = 0;
        for line in reader.lines() {
            if !line.map_err(self.io_err("read"))?.trim().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }
}

// =============================================================================
// Unit tests
// =============================================================================
