//! Unit tests for CSV reading and writing.

use std::collections::BTreeSet;

use rstest::rstest;

use super::*;
use crate::record::PullRequestState;
use crate::record::test_support::record;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn record_with_attachments() -> PullRequestRecord {
    let base = record("[CS-1] Roles: add \"admin\", check", 12, 3);
    let attachments: BTreeSet<String> = [
        "https://cdn.example.com/a.png".to_owned(),
        "https://docs.example.com/b".to_owned(),
    ]
    .into_iter()
    .collect();

    PullRequestRecord::new(
        RecordContent {
            url: base.url().to_owned(),
            title: base.title().to_owned(),
            description: "Description: line one\nline two".to_owned(),
            created_at: base.created_at(),
            state: PullRequestState::Open,
            merged: false,
            attachments,
        },
        LineChanges::new(12, 3),
    )
}

#[rstest]
fn detailed_csv_quotes_every_field() -> TestResult {
    let mut buffer = Vec::new();
    write_detailed(&mut buffer, &[record("Fix", 1, 2)])?;

    let output = String::from_utf8(buffer)?;
    let mut lines = output.lines();

    assert_eq!(
        lines.next(),
        Some(
            "\"pr_url\",\"title\",\"description\",\"lines_of_code_changes\",\"additions\",\
             \"deletions\",\"created_at\",\"state\",\"merged\",\"attachments\""
        )
    );
    assert_eq!(
        lines.next(),
        Some(
            "\"https://github.com/octo/repo/pull/3\",\"Fix\",\"Description: Fix\",\"3\",\"1\",\
             \"2\",\"2025-03-10T12:00:00+00:00\",\"closed\",\"True\",\"\""
        )
    );
    Ok(())
}

#[rstest]
fn round_trip_preserves_every_field() -> TestResult {
    let records = vec![record_with_attachments(), record("Plain", 0, 0)];
    let mut buffer = Vec::new();

    write_detailed(&mut buffer, &records)?;
    let parsed = read_records_from(buffer.as_slice())?;

    assert_eq!(parsed, records);
    Ok(())
}

#[rstest]
fn reader_ignores_summary_column() -> TestResult {
    let summarized = vec![record("Summarised", 5, 5).with_summary("Adds things, carefully.")];
    let mut buffer = Vec::new();

    write_summarized(&mut buffer, &summarized)?;
    let output = String::from_utf8(buffer.clone())?;
    let parsed = read_records_from(buffer.as_slice())?;

    assert!(output.starts_with(
        "pr_url,title,description,lines_of_code_changes,additions,deletions,created_at,\
         state,merged,attachments,ai_summary"
    ));
    assert!(output.contains("\"Adds things, carefully.\""));
    assert_eq!(parsed, vec![record("Summarised", 5, 5)]);
    Ok(())
}

#[rstest]
fn reader_accepts_pandas_style_values() -> TestResult {
    let csv = concat!(
        "pr_url,title,description,lines_of_code_changes,additions,deletions,created_at,state,merged,attachments\n",
        "https://github.com/o/r/pull/1,Title,Desc,7,4,3,2025-01-02T03:04:05Z,open,false,https://a.example; https://b.example\n",
    );

    let parsed = read_records_from(csv.as_bytes())?;
    let first = parsed.first().ok_or("expected one record")?;

    assert_eq!(first.lines_changed(), 7);
    assert_eq!(first.state(), PullRequestState::Open);
    assert!(!first.merged());
    assert_eq!(first.attachments().len(), 2);
    Ok(())
}

#[rstest]
fn reader_recomputes_inconsistent_line_totals() -> TestResult {
    let csv = concat!(
        "pr_url,title,description,lines_of_code_changes,additions,deletions,created_at,state,merged,attachments\n",
        "u,t,d,999,1,1,2025-01-02T03:04:05+00:00,closed,True,\n",
    );

    let parsed = read_records_from(csv.as_bytes())?;

    assert_eq!(parsed.first().map(PullRequestRecord::lines_changed), Some(2));
    Ok(())
}

#[rstest]
#[case::bad_timestamp("u,t,d,2,1,1,yesterday,closed,True,\n")]
#[case::bad_state("u,t,d,2,1,1,2025-01-02T03:04:05Z,draft,True,\n")]
#[case::bad_merged("u,t,d,2,1,1,2025-01-02T03:04:05Z,closed,maybe,\n")]
#[case::bad_number("u,t,d,2,one,1,2025-01-02T03:04:05Z,closed,True,\n")]
fn malformed_rows_are_csv_errors(#[case] row: &str) {
    let csv = format!(
        "pr_url,title,description,lines_of_code_changes,additions,deletions,created_at,state,merged,attachments\n{row}"
    );

    let result = read_records_from(csv.as_bytes());

    assert!(
        matches!(result, Err(DigestError::Csv { .. })),
        "expected Csv error, got {result:?}"
    );
}

#[rstest]
fn missing_file_is_an_io_error() {
    let result = read_records(Utf8Path::new("/nonexistent/prdigest/none.csv"));

    assert!(
        matches!(result, Err(DigestError::Io { .. })),
        "expected Io error, got {result:?}"
    );
}
