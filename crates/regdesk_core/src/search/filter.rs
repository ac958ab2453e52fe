//! Admin listing filter.
//!
//! # Responsibility
//! - Select the records matching dropdown filters and a free-text query.
//!
//! # Invariants
//! - Blank predicates never constrain the result.
//! - Dropdown predicates are exact, case-sensitive matches.
//! - The query matches name, mobile or class as a case-insensitive substring.
//! - Output is the ordered subsequence of the input.

use crate::model::student::StudentRecord;

/// Filter predicates of the admin listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Exact class, blank for all.
    pub class: String,
    /// Exact course, blank for all.
    pub course: String,
    /// Exact board, blank for all.
    pub board: String,
    /// Free-text search over name / mobile / class.
    pub query: String,
}

impl StudentFilter {
    /// Whether every predicate is blank.
    pub fn is_blank(&self) -> bool {
        [&self.class, &self.course, &self.board, &self.query]
            .iter()
            .all(|value| value.trim().is_empty())
    }

    /// Whether one record passes every predicate.
    pub fn matches(&self, record: &StudentRecord) -> bool {
        exact_or_blank(&self.class, &record.student_class)
            && exact_or_blank(&self.course, &record.course)
            && exact_or_blank(&self.board, &record.board)
            && self.matches_query(record)
    }

    /// Returns matching records in input order.
    pub fn apply<'a>(&self, records: &'a [StudentRecord]) -> Vec<&'a StudentRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    fn matches_query(&self, record: &StudentRecord) -> bool {
        if self.query.trim().is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        [&record.name, &record.mobile, &record.student_class]
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

fn exact_or_blank(predicate: &str, value: &str) -> bool {
    predicate.trim().is_empty() || predicate == value
}
