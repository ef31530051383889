// LogTally - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogTally operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum AppError {
    /// Record store read or append failed.
    Store(StoreError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// The log file to import does not exist.
    InputNotFound { path: PathBuf },

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Store error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::InputNotFound { path } => {
                write!(f, "The file '{}' does not exist", path.display())
            }
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::InputNotFound { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// A single rejected line, recorded as a diagnostic under the strict policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line matched neither accepted format.
    LineParse { line_number: u64, reason: String },

    /// The line had the right shape but its timestamp is not a valid date-time.
    TimestampParse {
        line_number: u64,
        raw_timestamp: String,
    },
}

impl ParseError {
    /// 1-based line number of the rejected line.
    pub fn line_number(&self) -> u64 {
        match self {
            Self::LineParse { line_number, .. } | Self::TimestampParse { line_number, .. } => {
                *line_number
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineParse {
                line_number,
                reason,
            } => write!(f, "line {line_number}: {reason}"),
            Self::TimestampParse {
                line_number,
                raw_timestamp,
            } => write!(
                f,
                "line {line_number}: cannot parse timestamp '{raw_timestamp}'"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors raised by a record store.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or appending to the store file.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// A record could not be serialised for appending.
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A stored line could not be decoded back into a record.
    Corrupt {
        path: PathBuf,
        line_number: u64,
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on store '{}': {source}",
                path.display()
            ),
            Self::Serialize { path, source } => write!(
                f,
                "Cannot serialise record for store '{}': {source}",
                path.display()
            ),
            Self::Corrupt {
                path,
                line_number,
                source,
            } => write!(
                f,
                "Store '{}' line {line_number} is corrupt: {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
            Self::Corrupt { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum record count.
    TooManyRecords { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyRecords { count, max } => write!(
                f,
                "Export of {count} records exceeds maximum of {max}. \
                 Narrow the date range to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::TooManyRecords { .. } => None,
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogTally results.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_parse_error_display_includes_line_number() {
        let err = ParseError::TimestampParse {
            line_number: 7,
            raw_timestamp: "2024-13-40 99:99:99".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "line 7: cannot parse timestamp '2024-13-40 99:99:99'"
        );
        assert_eq!(err.line_number(), 7);
    }

    #[test]
    fn test_store_error_chain_preserved() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = StoreError::Io {
            path: PathBuf::from("records.jsonl"),
            operation: "append",
            source: io,
        }
        .into();

        let store = err.source().expect("AppError::Store should expose a source");
        assert!(store.source().is_some(), "io::Error must stay in the chain");
        assert!(err.to_string().contains("records.jsonl"));
    }

    #[test]
    fn test_subsystem_errors_convert_with_source() {
        let export: AppError = ExportError::TooManyRecords { count: 9, max: 5 }.into();
        assert!(matches!(export, AppError::Export(_)));
        assert!(export.source().is_some());

        let config: AppError = ConfigError::Io {
            path: PathBuf::from("config.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert!(matches!(config, AppError::Config(_)));
        assert!(config.to_string().starts_with("Configuration error:"));

        // Rejected lines are diagnostics only and carry no further cause.
        let diagnostic = ParseError::LineParse {
            line_number: 2,
            reason: "no match".to_string(),
        };
        assert!(diagnostic.source().is_none());
    }

    #[test]
    fn test_input_not_found_message() {
        let err = AppError::InputNotFound {
            path: PathBuf::from("missing.log"),
        };
        assert_eq!(err.to_string(), "The file 'missing.log' does not exist");
        assert!(err.source().is_none());
    }
}
