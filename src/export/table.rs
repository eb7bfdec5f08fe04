//! CSV reading and writing for pull request records.
//!
//! The detailed CSV written by the fetch stage quotes every field. The
//! summarised CSV adds an `ai_summary` column and uses minimal quoting.

use std::fs::File;
use std::io::{Read, Write};

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::Deserialize;

use crate::error::DigestError;
use crate::extract::{join_attachments, split_attachments};
use crate::record::{LineChanges, PullRequestRecord, RecordContent, SummarizedRecord};

/// Column names of the detailed CSV, in order.
pub const DETAILED_COLUMNS: [&str; 10] = [
    "pr_url",
    "title",
    "description",
    "lines_of_code_changes",
    "additions",
    "deletions",
    "created_at",
    "state",
    "merged",
    "attachments",
];

/// Extra column appended by the summarisation stage.
pub const SUMMARY_COLUMN: &str = "ai_summary";

#[derive(Debug, Deserialize)]
struct DetailedRow {
    pr_url: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    lines_of_code_changes: Option<u64>,
    additions: u64,
    deletions: u64,
    created_at: String,
    state: String,
    merged: String,
    #[serde(default)]
    attachments: String,
}

impl TryFrom<DetailedRow> for PullRequestRecord {
    type Error = DigestError;

    fn try_from(row: DetailedRow) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(row.created_at.trim())
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(|error| DigestError::Csv {
                message: format!("invalid created_at '{}': {error}", row.created_at),
            })?;
        let changes = LineChanges::new(row.additions, row.deletions);

        if let Some(stored) = row.lines_of_code_changes
            && stored != changes.total()
        {
            tracing::warn!(
                url = %row.pr_url,
                stored,
                recomputed = changes.total(),
                "lines_of_code_changes disagrees with additions + deletions; using the sum"
            );
        }

        Ok(Self::new(
            RecordContent {
                url: row.pr_url,
                title: row.title,
                description: row.description,
                created_at,
                state: row.state.parse()?,
                merged: parse_merged(&row.merged)?,
                attachments: split_attachments(&row.attachments),
            },
            changes,
        ))
    }
}

/// Writes the detailed CSV to `path`, quoting every field.
///
/// # Errors
///
/// Returns [`DigestError::Io`] when the file cannot be created and
/// [`DigestError::Csv`] when a row cannot be written.
pub fn write_detailed_csv(path: &Utf8Path, records: &[PullRequestRecord]) -> Result<(), DigestError> {
    let file = File::create(path)
        .map_err(|error| DigestError::io(&format!("create '{path}'"), &error))?;
    write_detailed(file, records)
}

/// Writes the detailed CSV to any writer, quoting every field.
///
/// # Errors
///
/// Returns [`DigestError::Csv`] when a row cannot be written or flushed.
pub fn write_detailed<W: Write>(writer: W, records: &[PullRequestRecord]) -> Result<(), DigestError> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    csv_writer
        .write_record(DETAILED_COLUMNS)
        .map_err(|error| DigestError::csv("write header", &error))?;

    for record in records {
        csv_writer
            .write_record(detailed_fields(record))
            .map_err(|error| DigestError::csv("write row", &error))?;
    }

    csv_writer
        .flush()
        .map_err(|error| DigestError::io("flush CSV", &error))
}

/// Writes the summarised CSV to `path`.
///
/// # Errors
///
/// Returns [`DigestError::Io`] when the file cannot be created and
/// [`DigestError::Csv`] when a row cannot be written.
pub fn write_summarized_csv(
    path: &Utf8Path,
    records: &[SummarizedRecord],
) -> Result<(), DigestError> {
    let file = File::create(path)
        .map_err(|error| DigestError::io(&format!("create '{path}'"), &error))?;
    write_summarized(file, records)
}

/// Writes the summarised CSV to any writer.
///
/// # Errors
///
/// Returns [`DigestError::Csv`] when a row cannot be written or flushed.
pub fn write_summarized<W: Write>(
    writer: W,
    records: &[SummarizedRecord],
) -> Result<(), DigestError> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);

    let header = DETAILED_COLUMNS.iter().chain([&SUMMARY_COLUMN]);
    csv_writer
        .write_record(header)
        .map_err(|error| DigestError::csv("write header", &error))?;

    for summarized in records {
        let fields = detailed_fields(summarized.record());
        let row = fields
            .iter()
            .map(String::as_str)
            .chain([summarized.ai_summary()]);
        csv_writer
            .write_record(row)
            .map_err(|error| DigestError::csv("write row", &error))?;
    }

    csv_writer
        .flush()
        .map_err(|error| DigestError::io("flush CSV", &error))
}

/// Reads pull request records from a CSV file.
///
/// Extra columns, such as `ai_summary`, are ignored.
///
/// # Errors
///
/// Returns [`DigestError::Io`] when the file cannot be opened and
/// [`DigestError::Csv`] when a row is malformed.
pub fn read_records(path: &Utf8Path) -> Result<Vec<PullRequestRecord>, DigestError> {
    let file =
        File::open(path).map_err(|error| DigestError::io(&format!("open '{path}'"), &error))?;
    read_records_from(file)
}

/// Reads pull request records from any reader.
///
/// # Errors
///
/// Returns [`DigestError::Csv`] when the header or a row is malformed.
pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<PullRequestRecord>, DigestError> {
    ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader)
        .deserialize::<DetailedRow>()
        .enumerate()
        .map(|(index, row)| {
            row.map_err(|error| DigestError::csv(&format!("read row {}", index + 1), &error))
                .and_then(PullRequestRecord::try_from)
        })
        .collect()
}

fn detailed_fields(record: &PullRequestRecord) -> [String; 10] {
    [
        record.url().to_owned(),
        record.title().to_owned(),
        record.description().to_owned(),
        record.lines_changed().to_string(),
        record.additions().to_string(),
        record.deletions().to_string(),
        record.created_at().to_rfc3339(),
        record.state().as_str().to_owned(),
        merged_label(record.merged()).to_owned(),
        join_attachments(record.attachments()),
    ]
}

const fn merged_label(merged: bool) -> &'static str {
    if merged { "True" } else { "False" }
}

fn parse_merged(raw: &str) -> Result<bool, DigestError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(DigestError::Csv {
            message: format!("invalid merged flag '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
