//! Markdown report for a summarised batch of pull requests.
//!
//! The report opens with batch totals, follows with the pattern analysis,
//! and ends with one section per pull request in file order.

use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;

use crate::error::DigestError;
use crate::extract::ticket_project;
use crate::record::{LineTotals, PullRequestState, SummarizedRecord};

/// Inputs rendered into a report.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// Period label shown in the header.
    pub period: &'a str,
    /// Pattern analysis text, or the error text that replaced it.
    pub analysis: &'a str,
    /// Summarised records in file order.
    pub records: &'a [SummarizedRecord],
}

/// Writes the report to `path`.
///
/// # Errors
///
/// Returns [`DigestError::Io`] if the file cannot be created or written.
pub fn write_report_file(path: &Utf8Path, report: &Report<'_>) -> Result<(), DigestError> {
    let file =
        File::create(path).map_err(|error| DigestError::io(&format!("create '{path}'"), &error))?;
    let mut writer = BufWriter::new(file);
    write_report(&mut writer, report)?;
    writer.flush().map_err(|e| io_error(&e))
}

/// Writes the report in Markdown to the given writer.
///
/// # Errors
///
/// Returns [`DigestError::Io`] if writing to the output fails.
pub fn write_report<W: Write>(writer: &mut W, report: &Report<'_>) -> Result<(), DigestError> {
    write_header(writer, report)?;
    write_analysis(writer, report.analysis)?;

    writeln!(writer, "## 📋 Individual PR Summaries").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for (index, summarized) in report.records.iter().enumerate() {
        write_record_section(writer, index.saturating_add(1), summarized)?;
    }

    Ok(())
}

fn write_header<W: Write>(writer: &mut W, report: &Report<'_>) -> Result<(), DigestError> {
    let totals = LineTotals::from_records(report.records.iter().map(SummarizedRecord::record));

    writeln!(writer, "# GitHub PR Analysis Report").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Period:** {}  ", report.period).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Total PRs:** {}  ", totals.count).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "**Total Lines Changed:** {}  ",
        group_thousands(totals.lines_changed)
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer, "**Average Lines per PR:** {:.1}  ", totals.average())
        .map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

fn write_analysis<W: Write>(writer: &mut W, analysis: &str) -> Result<(), DigestError> {
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "## 📊 Development Activity Analysis").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{analysis}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

fn write_record_section<W: Write>(
    writer: &mut W,
    position: usize,
    summarized: &SummarizedRecord,
) -> Result<(), DigestError> {
    let record = summarized.record();

    writeln!(writer, "### {position}. {}", record.title()).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Project:** `{}`  ", ticket_project(record.title()))
        .map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "**Lines Changed:** {} (+{}, -{})  ",
        record.lines_changed(),
        record.additions(),
        record.deletions()
    )
    .map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "**Status:** {} {}  ",
        record.state().label(),
        status_marker(record.state(), record.merged())
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer, "**URL:** {}", record.url()).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Summary:** {}", summarized.ai_summary()).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Merged wins over state; an unmerged closed pull request is a rejection.
const fn status_marker(state: PullRequestState, merged: bool) -> &'static str {
    match (merged, state) {
        (true, _) => "✅",
        (false, PullRequestState::Open) => "🔄",
        (false, PullRequestState::Closed) => "❌",
    }
}

/// Formats an integer with comma thousands separators.
fn group_thousands(value: u64) -> String {
    let mut reversed = String::new();
    let mut run = 0_u8;
    for digit in value.to_string().chars().rev() {
        if run == 3 {
            reversed.push(',');
            run = 0;
        }
        reversed.push(digit);
        run = run.saturating_add(1);
    }
    reversed.chars().rev().collect()
}

fn io_error(error: &std::io::Error) -> DigestError {
    DigestError::io("write report", error)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::record::test_support::record;

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1_000, "1,000")]
    #[case(12_345, "12,345")]
    #[case(1_234_567, "1,234,567")]
    fn thousands_are_grouped(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(group_thousands(value), expected);
    }

    #[rstest]
    #[case(PullRequestState::Closed, true, "✅")]
    #[case(PullRequestState::Open, false, "🔄")]
    #[case(PullRequestState::Closed, false, "❌")]
    fn status_marker_prefers_merged(
        #[case] state: PullRequestState,
        #[case] merged: bool,
        #[case] expected: &str,
    ) {
        assert_eq!(status_marker(state, merged), expected);
    }

    #[rstest]
    fn report_lists_totals_analysis_and_records() {
        let records = vec![
            record("[CS-1] Roles: add admin check", 1_200, 34).with_summary("Adds a check."),
            record("Fix typo", 1, 1).with_summary("Error: timeout"),
        ];
        let report = Report {
            period: "2025-03-01 to 2025-03-15",
            analysis: "Mostly role work.",
            records: &records,
        };
        let mut buffer = Vec::new();

        write_report(&mut buffer, &report).expect("report renders");
        let output = String::from_utf8(buffer).expect("UTF-8 output");

        let expected_header = "# GitHub PR Analysis Report\n\n\
            **Period:** 2025-03-01 to 2025-03-15  \n\
            **Total PRs:** 2  \n\
            **Total Lines Changed:** 1,236  \n\
            **Average Lines per PR:** 618.0  \n\n\
            ---\n\n\
            ## 📊 Development Activity Analysis\n\n\
            Mostly role work.\n\n\
            ---\n\n\
            ## 📋 Individual PR Summaries\n\n";
        assert!(output.starts_with(expected_header), "header mismatch:\n{output}");
        assert!(output.contains(
            "### 1. [CS-1] Roles: add admin check\n\n\
             **Project:** `Roles`  \n\
             **Lines Changed:** 1234 (+1200, -34)  \n\
             **Status:** Closed ✅  \n"
        ));
        assert!(output.contains("### 2. Fix typo\n\n**Project:** `Uncategorized`  \n"));
        assert!(output.contains("**Summary:** Error: timeout\n\n---\n\n"));
    }

    #[rstest]
    fn empty_report_averages_to_zero() {
        let report = Report {
            period: "Development Period",
            analysis: "",
            records: &[],
        };
        let mut buffer = Vec::new();

        write_report(&mut buffer, &report).expect("report renders");
        let output = String::from_utf8(buffer).expect("UTF-8 output");

        assert!(output.contains("**Total PRs:** 0  \n"));
        assert!(output.contains("**Average Lines per PR:** 0.0  \n"));
    }
}
