// LogTally - core/filter.rs
//
// Date-range and text filters applied to a record set before analysis.
// All active filters are AND-combined.
// Core layer: pure logic, no I/O.

use crate::core::analyzer::{contains_ignore_case, fold_case};
use crate::core::model::LogRecord;
use chrono::{DateTime, Utc};

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Start of time range (inclusive). None = no lower bound.
    pub time_start: Option<DateTime<Utc>>,

    /// End of time range (inclusive). None = no upper bound.
    pub time_end: Option<DateTime<Utc>>,

    /// Substring text search on the message (case-insensitive). Empty = no filter.
    pub text_search: String,
}

impl RecordFilter {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.time_start.is_none() && self.time_end.is_none() && self.text_search.is_empty()
    }

    /// Filter on an inclusive time range only.
    pub fn time_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            time_start: start,
            time_end: end,
            ..Default::default()
        }
    }
}

/// Records matching every active filter, in input order.
///
/// A start bound later than the end bound matches nothing.
pub fn apply_filter(records: &[LogRecord], filter: &RecordFilter) -> Vec<LogRecord> {
    if filter.is_empty() {
        return records.to_vec();
    }

    let text_folded = fold_case(&filter.text_search);

    records
        .iter()
        .filter(|record| matches_all(record, filter, &text_folded))
        .cloned()
        .collect()
}

/// Records whose message contains `term`, ignoring case, in input order.
pub fn search(records: &[LogRecord], term: &str) -> Vec<LogRecord> {
    apply_filter(
        records,
        &RecordFilter {
            text_search: term.to_string(),
            ..Default::default()
        },
    )
}

fn matches_all(record: &LogRecord, filter: &RecordFilter, text_folded: &str) -> bool {
    if let Some(start) = filter.time_start {
        if record.timestamp() < start {
            return false;
        }
    }
    if let Some(end) = filter.time_end {
        if record.timestamp() > end {
            return false;
        }
    }

    if !text_folded.is_empty() && !contains_ignore_case(record.message(), text_folded) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_record(hour: u32, message: &str) -> LogRecord {
        LogRecord::new(
            Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap(),
            "INFO".to_string(),
            message.to_string(),
        )
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let records = vec![make_record(1, "a"), make_record(2, "b")];
        assert_eq!(apply_filter(&records, &RecordFilter::default()), records);
    }

    #[test]
    fn test_time_range_is_inclusive() {
        let records = vec![
            make_record(1, "before"),
            make_record(2, "start"),
            make_record(3, "middle"),
            make_record(4, "end"),
            make_record(5, "after"),
        ];
        let result = apply_filter(&records, &RecordFilter::time_range(Some(at(2)), Some(at(4))));
        let messages: Vec<_> = result.iter().map(|r| r.message()).collect();
        assert_eq!(messages, vec!["start", "middle", "end"]);
    }

    #[test]
    fn test_open_ended_ranges() {
        let records = vec![make_record(1, "a"), make_record(5, "b")];
        assert_eq!(
            apply_filter(&records, &RecordFilter::time_range(Some(at(3)), None)).len(),
            1
        );
        assert_eq!(
            apply_filter(&records, &RecordFilter::time_range(None, Some(at(3)))).len(),
            1
        );
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let records = vec![make_record(3, "a")];
        let result = apply_filter(&records, &RecordFilter::time_range(Some(at(4)), Some(at(2))));
        assert!(result.is_empty());
    }

    #[test]
    fn test_search_case_insensitive_keeps_order() {
        let records = vec![
            make_record(1, "Connection FAILED"),
            make_record(2, "Connection succeeded"),
            make_record(3, "retry failed again"),
        ];
        let result = search(&records, "failed");
        let messages: Vec<_> = result.iter().map(|r| r.message()).collect();
        assert_eq!(messages, vec!["Connection FAILED", "retry failed again"]);
    }

    #[test]
    fn test_combined_filters() {
        let records = vec![
            make_record(1, "Database connection failed"),
            make_record(3, "Database query ok"),
            make_record(3, "Network timeout"),
        ];
        let filter = RecordFilter {
            time_start: Some(at(2)),
            text_search: "database".to_string(),
            ..Default::default()
        };
        let result = apply_filter(&records, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].message(), "Database query ok");
    }
}
