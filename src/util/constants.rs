// LogTally - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogTally";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogTally";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Parsing
// =============================================================================

/// Field delimiter of the primary line format.
pub const FIELD_DELIMITER: char = '|';

/// Maximum number of segments the primary format is split into. The last
/// segment keeps any further delimiters as part of the message.
pub const DELIMITED_SEGMENTS: usize = 3;

/// Level string (compared case-insensitively) that classifies a record as an error.
pub const ERROR_LEVEL: &str = "ERROR";

/// Maximum number of per-line diagnostics kept by a strict-mode parse.
pub const MAX_PARSE_DIAGNOSTICS: usize = 1_000;

// =============================================================================
// Import
// =============================================================================

/// Number of parsed records accumulated before they are appended to the store.
pub const IMPORT_BATCH_SIZE: usize = 500;

// =============================================================================
// Analysis
// =============================================================================

/// Default number of entries returned by the top-errors query.
pub const DEFAULT_TOP_ERRORS: usize = 5;

/// Minimum user-configurable top-errors count.
pub const MIN_TOP_ERRORS: usize = 1;

/// Maximum user-configurable top-errors count.
pub const MAX_TOP_ERRORS: usize = 1_000;

/// Record count above which level counting is spread across the rayon pool.
/// Below this the single-threaded fold is faster than the split overhead.
pub const PARALLEL_COUNT_THRESHOLD: usize = 100_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Export
// =============================================================================

/// Maximum number of records that can be exported in a single operation.
pub const MAX_EXPORT_RECORDS: usize = 5_000_000;

// =============================================================================
// Configuration and storage
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default record store file name (stored in the platform data directory).
pub const STORE_FILE_NAME: &str = "records.jsonl";
