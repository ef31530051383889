// LogTally - app/report.rs
//
// Runs every analyzer query over one record set and bundles the results
// for output, either as text or as JSON.

use crate::core::analyzer;
use crate::core::filter;
use crate::core::model::{ErrorFrequency, LogRecord};
use crate::util::constants::{DEFAULT_TOP_ERRORS, PARALLEL_COUNT_THRESHOLD};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

/// What to include in a report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Length limit of the top-errors list.
    pub top: usize,
    /// Optional term for the first-occurrence lookup and message search.
    pub search_term: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP_ERRORS,
            search_term: None,
        }
    }
}

/// Count of one level, as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: String,
    pub count: usize,
}

/// Search section of a report.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub term: String,
    pub first_occurrence: Option<DateTime<Utc>>,
    pub matches: Vec<LogRecord>,
}

/// All query results for one record set.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub total_records: usize,
    /// Level counts, highest count first, then by level name.
    pub level_counts: Vec<LevelCount>,
    pub error_count: usize,
    /// Requested length limit of `top_errors`.
    pub top: usize,
    pub top_errors: Vec<ErrorFrequency>,
    pub error_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchResult>,
}

impl AnalysisReport {
    pub fn build(records: &[LogRecord], options: &ReportOptions) -> Self {
        let counts = if records.len() > PARALLEL_COUNT_THRESHOLD {
            analyzer::count_levels_parallel(records)
        } else {
            analyzer::count_levels(records)
        };

        let mut level_counts: Vec<LevelCount> = counts
            .into_iter()
            .map(|(level, count)| LevelCount { level, count })
            .collect();
        level_counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.level.cmp(&b.level)));

        let search = options.search_term.as_ref().map(|term| SearchResult {
            term: term.clone(),
            first_occurrence: analyzer::find_first_occurrence(records, term),
            matches: filter::search(records, term),
        });

        let report = Self {
            total_records: records.len(),
            level_counts,
            error_count: analyzer::find_errors(records).len(),
            top: options.top,
            top_errors: analyzer::top_errors(records, options.top),
            error_rate: analyzer::error_rate(records),
            search,
        };

        tracing::debug!(
            records = report.total_records,
            levels = report.level_counts.len(),
            errors = report.error_count,
            "Report built"
        );

        report
    }

    /// Human-readable rendering.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "Records analysed: {}", self.total_records);

        let _ = writeln!(out, "\nLog level counts");
        if self.level_counts.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for lc in &self.level_counts {
            let _ = writeln!(out, "  {:<12} {:>8}", lc.level, lc.count);
        }

        let _ = writeln!(out, "\nTop {} errors", self.top);
        if self.top_errors.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for (rank, e) in self.top_errors.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {:>6}  {}", rank + 1, e.count, e.message);
        }

        let _ = writeln!(
            out,
            "\nError rate: {:.2}% ({} of {})",
            self.error_rate * 100.0,
            self.error_count,
            self.total_records
        );

        if let Some(ref search) = self.search {
            let _ = writeln!(out, "\nSearch results for '{}'", search.term);
            match search.first_occurrence {
                Some(ts) => {
                    let _ = writeln!(out, "  First occurrence: {}", ts.format("%Y-%m-%d %H:%M:%S"));
                }
                None => {
                    let _ = writeln!(out, "  No matching records");
                }
            }
            for r in &search.matches {
                let _ = writeln!(
                    out,
                    "  {}  {:<8} {}",
                    r.timestamp().format("%Y-%m-%d %H:%M:%S"),
                    r.level(),
                    r.message()
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_line;

    fn scenario() -> Vec<LogRecord> {
        [
            "2024-01-01 10:00:00|ERROR|disk full",
            "2024-01-01 10:00:01|INFO|ok",
            "2024-01-01 10:00:02|ERROR|disk full",
        ]
        .iter()
        .filter_map(|l| parse_line(l))
        .collect()
    }

    #[test]
    fn test_report_scenario() {
        let report = AnalysisReport::build(&scenario(), &ReportOptions::default());
        assert_eq!(report.total_records, 3);
        assert_eq!(
            report.level_counts,
            vec![
                LevelCount {
                    level: "ERROR".to_string(),
                    count: 2
                },
                LevelCount {
                    level: "INFO".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(report.error_count, 2);
        assert_eq!(report.top_errors.len(), 1);
        assert_eq!(report.top_errors[0].count, 2);
        assert!((report.error_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!(report.search.is_none());
    }

    #[test]
    fn test_report_level_ties_sorted_by_name() {
        let records: Vec<_> = [
            "2024-01-01 10:00:00|WARN|a",
            "2024-01-01 10:00:01|DEBUG|b",
            "2024-01-01 10:00:02|INFO|c",
        ]
        .iter()
        .filter_map(|l| parse_line(l))
        .collect();
        let report = AnalysisReport::build(&records, &ReportOptions::default());
        let levels: Vec<_> = report.level_counts.iter().map(|l| l.level.as_str()).collect();
        assert_eq!(levels, vec!["DEBUG", "INFO", "WARN"]);
    }

    #[test]
    fn test_report_search_section() {
        let options = ReportOptions {
            search_term: Some("DISK".to_string()),
            ..Default::default()
        };
        let records = scenario();
        let report = AnalysisReport::build(&records, &options);
        let search = report.search.expect("search section requested");
        assert_eq!(search.first_occurrence, Some(records[0].timestamp()));
        assert_eq!(search.matches.len(), 2);
    }

    #[test]
    fn test_report_empty_records() {
        let report = AnalysisReport::build(&[], &ReportOptions::default());
        assert_eq!(report.total_records, 0);
        assert_eq!(report.error_rate, 0.0);
        assert!(report.level_counts.is_empty());
        let text = report.render_text();
        assert!(text.contains("Error rate: 0.00% (0 of 0)"));
    }

    #[test]
    fn test_render_text_and_json() {
        let options = ReportOptions {
            search_term: Some("ok".to_string()),
            ..Default::default()
        };
        let report = AnalysisReport::build(&scenario(), &options);

        let text = report.render_text();
        assert!(text.contains("Records analysed: 3"));
        assert!(text.contains("Error rate: 66.67% (2 of 3)"));
        assert!(text.contains("First occurrence: 2024-01-01 10:00:01"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_records"], 3);
        assert_eq!(json["top_errors"][0]["message"], "disk full");
        assert_eq!(json["search"]["matches"][0]["level"], "INFO");
    }
}
