// LogTally - core/analyzer.rs
//
// Read-only statistics over a record set.
// Core layer: pure functions, no I/O, no state between calls.
//
// Each query re-scans the slice it is given.
//
// Level matching is asymmetric: `count_levels` groups by the
// exact level string, while the error queries match "ERROR" in any case.

use crate::core::model::{ErrorFrequency, LogRecord};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::HashMap;

/// Count records per level, grouping by the exact, case-preserved string.
///
/// The counts always sum to `records.len()`.
pub fn count_levels(records: &[LogRecord]) -> HashMap<String, usize> {
    records.iter().fold(HashMap::new(), |mut counts, record| {
        *counts.entry(record.level().to_string()).or_insert(0) += 1;
        counts
    })
}

/// Same result as [`count_levels`], computed on the rayon pool.
///
/// Each worker folds its chunk into a private map and the maps are merged by
/// summing counts, which is associative and commutative, so the split does
/// not affect the result.
pub fn count_levels_parallel(records: &[LogRecord]) -> HashMap<String, usize> {
    records
        .par_iter()
        .fold(HashMap::new, |mut counts: HashMap<String, usize>, record| {
            *counts.entry(record.level().to_string()).or_insert(0) += 1;
            counts
        })
        .reduce(HashMap::new, |mut merged, partial| {
            for (level, count) in partial {
                *merged.entry(level).or_insert(0) += count;
            }
            merged
        })
}

/// Records whose level is "ERROR" in any letter case, in input order.
pub fn find_errors(records: &[LogRecord]) -> Vec<LogRecord> {
    records.iter().filter(|r| r.is_error()).cloned().collect()
}

/// Timestamp of the first record whose message contains `search_term`,
/// ignoring case. `None` when nothing matches.
///
/// An empty term matches every message, so it returns the first record's
/// timestamp.
pub fn find_first_occurrence(records: &[LogRecord], search_term: &str) -> Option<DateTime<Utc>> {
    let term_folded = fold_case(search_term);
    records
        .iter()
        .find(|r| contains_ignore_case(r.message(), &term_folded))
        .map(LogRecord::timestamp)
}

/// The `top` most frequent error messages with their counts.
///
/// Only error records are considered (see [`find_errors`]). Messages are
/// grouped exactly, ranked by count descending, and groups with equal counts
/// keep the order in which their message first appeared. Never longer than
/// `top`; `top == 0` gives an empty list.
pub fn top_errors(records: &[LogRecord], top: usize) -> Vec<ErrorFrequency> {
    let mut groups: Vec<ErrorFrequency> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.is_error()) {
        match index.get(record.message()) {
            Some(&slot) => groups[slot].count += 1,
            None => {
                index.insert(record.message(), groups.len());
                groups.push(ErrorFrequency {
                    message: record.message().to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable: ties stay in first-occurrence order.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(top);
    groups
}

/// Fraction of records that are errors, in `[0.0, 1.0]`.
///
/// An empty record set has a rate of `0.0`.
pub fn error_rate(records: &[LogRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let errors = records.iter().filter(|r| r.is_error()).count();
    errors as f64 / records.len() as f64
}

/// Per-character simple upper-case folding.
///
/// A character whose upper case expands to several characters (such as 'ß')
/// is kept unchanged, so "k" does not match the Kelvin sign and "i" does not
/// match 'İ'.
pub(crate) fn fold_case(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// `haystack` contains `needle_folded` (already passed through
/// [`fold_case`]), ignoring case.
pub(crate) fn contains_ignore_case(haystack: &str, needle_folded: &str) -> bool {
    fold_case(haystack).contains(needle_folded)
}
