// LogTally - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Log Record (output of parsing)
// =============================================================================

/// A single parsed log line.
///
/// Only the parser (and the store, when reading back records the parser
/// produced earlier) constructs these. Fields are private so a record cannot
/// change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    timestamp: DateTime<Utc>,
    level: String,
    message: String,
}

impl LogRecord {
    pub(crate) fn new(timestamp: DateTime<Utc>, level: String, message: String) -> Self {
        Self {
            timestamp,
            level,
            message,
        }
    }

    /// When the event was logged. Source timestamps without an offset are
    /// taken as UTC.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Severity label exactly as written in the source (trimmed, case kept).
    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the level is "ERROR" in any letter case.
    pub fn is_error(&self) -> bool {
        self.level
            .eq_ignore_ascii_case(crate::util::constants::ERROR_LEVEL)
    }
}

// =============================================================================
// Parse policy
// =============================================================================

/// How a batch parse treats lines that do not produce a record.
///
/// Neither policy aborts the batch: a bad line never invalidates the lines
/// around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Drop rejected lines silently; only the skip count is kept.
    #[default]
    Lenient,

    /// Drop rejected lines but record a diagnostic for each one.
    Strict,
}

// =============================================================================
// Line rejection
// =============================================================================

/// Why a single line did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRejection {
    /// The line matches neither the delimited nor the structured-text format.
    NoMatch,

    /// The line has a recognised shape but its timestamp is not a valid
    /// calendar date-time.
    InvalidTimestamp { raw: String },
}

// =============================================================================
// Query results
// =============================================================================

/// One row of the top-errors ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorFrequency {
    pub message: String,
    pub count: usize,
}
