// LogTally - core/parser.rs
//
// Line-to-record parsing for the two accepted line formats.
// Core layer: accepts strings, never touches the filesystem directly.
//
// Formats, tried in this order:
//   1. Delimited:       TIMESTAMP|LEVEL|MESSAGE  (message may contain '|')
//   2. Structured text: YYYY-MM-DD HH:MM:SS LEVEL: MESSAGE
//
// Every rejected line is skipped; nothing here aborts a batch.

use crate::core::model::{LineRejection, LogRecord, ParsePolicy};
use crate::util::constants::{DELIMITED_SEGMENTS, FIELD_DELIMITER, MAX_PARSE_DIAGNOSTICS};
use crate::util::error::ParseError;
use crate::util::logging::preview;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// chrono format of the timestamp captured by the structured-text pattern.
const STRUCTURED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date-time formats accepted in the timestamp segment of a delimited line,
/// tried in order after RFC 3339. `%.f` also accepts a missing fraction.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Date-only formats accepted in the timestamp segment (midnight UTC).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// UTF-8 byte-order mark, tolerated at the start of a line.
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// chrono represents a `:60` seconds field as a leap second (nanoseconds past
/// one billion). Such values are not calendar times and are rejected.
fn reject_leap_second<T: Timelike>(value: T) -> Option<T> {
    (value.nanosecond() < 1_000_000_000).then_some(value)
}

fn structured_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) (\w+): (.+)$")
            .expect("structured line pattern is a valid regex")
    })
}

/// Parse one raw line into a record.
///
/// Returns `None` for any line that does not produce a record, whatever
/// the reason.
pub fn parse_line(raw_line: &str) -> Option<LogRecord> {
    try_parse_line(raw_line).ok()
}

/// Parse one raw line, reporting why it was rejected.
///
/// A line that splits into exactly three delimited segments is decided by
/// the delimited format alone: a bad timestamp there is `InvalidTimestamp`
/// and the structured-text pattern is not consulted.
pub fn try_parse_line(raw_line: &str) -> Result<LogRecord, LineRejection> {
    let raw_line = raw_line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw_line);
    let segments: Vec<&str> = raw_line
        .splitn(DELIMITED_SEGMENTS, FIELD_DELIMITER)
        .collect();

    if let [raw_ts, level, message] = segments[..] {
        let timestamp =
            parse_timestamp(raw_ts).ok_or_else(|| LineRejection::InvalidTimestamp {
                raw: raw_ts.trim().to_string(),
            })?;
        return Ok(LogRecord::new(
            timestamp,
            level.trim().to_string(),
            message.trim().to_string(),
        ));
    }

    let Some(caps) = structured_pattern().captures(raw_line) else {
        return Err(LineRejection::NoMatch);
    };

    let raw_ts = &caps[1];
    let timestamp = NaiveDateTime::parse_from_str(raw_ts, STRUCTURED_TIMESTAMP_FORMAT)
        .ok()
        .and_then(reject_leap_second)
        .map(|ndt| ndt.and_utc())
        .ok_or_else(|| LineRejection::InvalidTimestamp {
            raw: raw_ts.to_string(),
        })?;

    Ok(LogRecord::new(
        timestamp,
        caps[2].to_string(),
        caps[3].to_string(),
    ))
}

/// Parse a date-time as written in the timestamp segment of a delimited line.
///
/// Leading and trailing whitespace is ignored. Tries RFC 3339 (with offset,
/// converted to UTC), then the naive date-time formats, then date-only
/// formats (midnight). Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return reject_leap_second(dt).map(Into::into);
    }

    for format in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return reject_leap_second(ndt).map(|ndt| ndt.and_utc());
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(|nd| nd.and_hms_opt(0, 0, 0))
            .map(|ndt| ndt.and_utc())
    })
}

/// Result of parsing a block of text.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Successfully parsed records, in line order.
    pub entries: Vec<LogRecord>,
    /// Diagnostics for rejected lines (strict policy only, capped at
    /// `MAX_PARSE_DIAGNOSTICS`).
    pub errors: Vec<ParseError>,
    /// Total lines processed.
    pub lines_processed: u64,
    /// Lines that did not produce a record.
    pub lines_skipped: u64,
}

/// Parse every line of `content` in order.
///
/// Rejected lines are always skipped. Under `ParsePolicy::Strict` each
/// rejection is also recorded in `errors` with its 1-based line number.
pub fn parse_content(content: &str, policy: ParsePolicy) -> ParseResult {
    let mut result = ParseResult::default();

    for (line_idx, line) in content.lines().enumerate() {
        let line_number = (line_idx as u64) + 1;
        result.lines_processed += 1;

        match try_parse_line(line) {
            Ok(record) => result.entries.push(record),
            Err(rejection) => {
                result.lines_skipped += 1;
                tracing::debug!(
                    line = line_number,
                    reason = ?rejection,
                    text = preview(line),
                    "Line skipped"
                );
                if policy == ParsePolicy::Strict && result.errors.len() < MAX_PARSE_DIAGNOSTICS {
                    result.errors.push(diagnostic(line_number, rejection));
                }
            }
        }
    }

    tracing::debug!(
        records = result.entries.len(),
        skipped = result.lines_skipped,
        lines = result.lines_processed,
        "Parsing complete"
    );

    result
}

fn diagnostic(line_number: u64, rejection: LineRejection) -> ParseError {
    match rejection {
        LineRejection::NoMatch => ParseError::LineParse {
            line_number,
            reason: "Line matches neither the delimited nor the structured format".to_string(),
        },
        LineRejection::InvalidTimestamp { raw } => ParseError::TimestampParse {
            line_number,
            raw_timestamp: raw,
        },
    }
}
