//! Pull request records produced by the fetch stage.
//!
//! A [`PullRequestRecord`] is immutable once built. The only later addition
//! is the AI summary, attached exactly once by converting the record into a
//! [`SummarizedRecord`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use crate::error::DigestError;

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    /// Still open for review.
    Open,
    /// Closed, whether merged or not.
    Closed,
}

impl PullRequestState {
    /// Lowercase wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Capitalised label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PullRequestState {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(DigestError::Csv {
                message: format!("unknown pull request state '{other}'"),
            }),
        }
    }
}

/// Added and deleted line counts for a pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineChanges {
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
}

impl LineChanges {
    /// Creates a line change count.
    #[must_use]
    pub const fn new(additions: u64, deletions: u64) -> Self {
        Self {
            additions,
            deletions,
        }
    }

    /// Sum of additions and deletions.
    #[must_use]
    pub const fn total(self) -> u64 {
        self.additions.saturating_add(self.deletions)
    }
}

/// Descriptive fields of a pull request record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordContent {
    /// Canonical web link.
    pub url: String,
    /// Pull request title.
    pub title: String,
    /// Extracted description text.
    pub description: String,
    /// Creation time in UTC.
    pub created_at: DateTime<Utc>,
    /// Open or closed.
    pub state: PullRequestState,
    /// Whether the pull request was merged.
    pub merged: bool,
    /// URLs linked or embedded in the body.
    pub attachments: BTreeSet<String>,
}

/// One fetched pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    content: RecordContent,
    changes: LineChanges,
    lines_changed: u64,
}

impl PullRequestRecord {
    /// Builds a record, fixing `lines_changed` to `additions + deletions`.
    #[must_use]
    pub const fn new(content: RecordContent, changes: LineChanges) -> Self {
        Self {
            content,
            changes,
            lines_changed: changes.total(),
        }
    }

    /// Canonical web link.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.content.url
    }

    /// Pull request title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.content.title
    }

    /// Extracted description text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.content.description
    }

    /// Lines added.
    #[must_use]
    pub const fn additions(&self) -> u64 {
        self.changes.additions
    }

    /// Lines deleted.
    #[must_use]
    pub const fn deletions(&self) -> u64 {
        self.changes.deletions
    }

    /// Total lines changed.
    #[must_use]
    pub const fn lines_changed(&self) -> u64 {
        self.lines_changed
    }

    /// Creation time in UTC.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.content.created_at
    }

    /// Open or closed.
    #[must_use]
    pub const fn state(&self) -> PullRequestState {
        self.content.state
    }

    /// Whether the pull request was merged.
    #[must_use]
    pub const fn merged(&self) -> bool {
        self.content.merged
    }

    /// URLs linked or embedded in the body.
    #[must_use]
    pub const fn attachments(&self) -> &BTreeSet<String> {
        &self.content.attachments
    }

    /// Attaches the AI summary, consuming the record.
    #[must_use]
    pub fn with_summary(self, ai_summary: impl Into<String>) -> SummarizedRecord {
        SummarizedRecord {
            record: self,
            ai_summary: ai_summary.into(),
        }
    }
}

/// A pull request record with its AI summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizedRecord {
    record: PullRequestRecord,
    ai_summary: String,
}

impl SummarizedRecord {
    /// The underlying pull request record.
    #[must_use]
    pub const fn record(&self) -> &PullRequestRecord {
        &self.record
    }

    /// Summary text, or the error text stored when summarisation failed.
    #[must_use]
    pub fn ai_summary(&self) -> &str {
        &self.ai_summary
    }
}

/// Aggregate line statistics over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTotals {
    /// Number of records.
    pub count: usize,
    /// Sum of `lines_changed` across records.
    pub lines_changed: u64,
}

impl LineTotals {
    /// Computes totals over the given records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PullRequestRecord>) -> Self {
        records.into_iter().fold(Self::default(), |totals, record| Self {
            count: totals.count.saturating_add(1),
            lines_changed: totals.lines_changed.saturating_add(record.lines_changed()),
        })
    }

    /// Mean lines changed per record, zero for an empty set.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "average is only displayed with one decimal place"
    )]
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.lines_changed as f64 / self.count as f64
    }
}


#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::test_support::record;
    use super::{LineChanges, LineTotals, PullRequestState};

    #[rstest]
    #[case(0, 0)]
    #[case(10, 5)]
    #[case(u64::MAX, 1)]
    fn lines_changed_is_frozen_sum(#[case] additions: u64, #[case] deletions: u64) {
        let pr = record("Sum", additions, deletions);

        assert_eq!(pr.lines_changed(), additions.saturating_add(deletions));
        assert_eq!(pr.lines_changed(), LineChanges::new(additions, deletions).total());
    }

    #[rstest]
    fn summary_is_attached_once_by_conversion() {
        let summarized = record("Add cache", 3, 1).with_summary("Adds a cache.");

        assert_eq!(summarized.ai_summary(), "Adds a cache.");
        assert_eq!(summarized.record().title(), "Add cache");
    }

    #[rstest]
    fn totals_average_over_records() {
        let records = [record("A", 10, 0), record("B", 3, 2)];

        let totals = LineTotals::from_records(&records);

        assert_eq!(totals.count, 2);
        assert_eq!(totals.lines_changed, 15);
        assert!((totals.average() - 7.5).abs() < f64::EPSILON);
    }

    #[rstest]
    fn empty_totals_average_to_zero() {
        assert!(LineTotals::default().average().abs() < f64::EPSILON);
    }

    #[rstest]
    #[case("open", PullRequestState::Open)]
    #[case("Closed", PullRequestState::Closed)]
    fn state_parses_case_insensitively(#[case] raw: &str, #[case] expected: PullRequestState) {
        assert_eq!(raw.parse::<PullRequestState>(), Ok(expected));
    }

    #[rstest]
    fn unknown_state_is_rejected() {
        assert!("draft".parse::<PullRequestState>().is_err());
    }
}
