//! Output file naming.
//!
//! The fetch stage writes `pr_<start>_<end>_detailed.csv`. Summarisation
//! derives `pr_<start>_<end>_summarized.csv` and `pr_<start>_<end>_summary.md`
//! from it, and the report's period label is recovered from the same name.

use std::time::SystemTime;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::DigestError;
use crate::window::FetchWindow;

const PREFIX: &str = "pr_";
const CSV_EXTENSION: &str = ".csv";
const DETAILED_SUFFIX: &str = "_detailed";
const SUMMARIZED_SUFFIX: &str = "_summarized.csv";
const REPORT_SUFFIX: &str = "_summary.md";

/// Label used when the period cannot be recovered from a file name.
pub const DEFAULT_PERIOD: &str = "Development Period";

/// Path of the detailed CSV for `window` inside `output_dir`.
#[must_use]
pub fn detailed_csv_path(output_dir: &Utf8Path, window: &FetchWindow) -> Utf8PathBuf {
    output_dir.join(window.detailed_csv_name())
}

/// Path of the summarised CSV derived from `input`.
///
/// Inputs named `pr_<range>[_detailed].csv` map to
/// `<output_dir>/pr_<range>_summarized.csv`. Any other input maps to
/// `<input stem>_summarized.csv` beside the input.
#[must_use]
pub fn summarized_csv_path(input: &Utf8Path, output_dir: &Utf8Path) -> Utf8PathBuf {
    let range = input.file_name().and_then(|name| {
        name.strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_suffix(CSV_EXTENSION))
    });

    range.map_or_else(
        || with_stem_suffix(input, SUMMARIZED_SUFFIX),
        |range_text| {
            let trimmed = range_text.strip_suffix(DETAILED_SUFFIX).unwrap_or(range_text);
            output_dir.join(format!("{PREFIX}{trimmed}{SUMMARIZED_SUFFIX}"))
        },
    )
}

/// Path of the Markdown report that accompanies a summarised CSV.
#[must_use]
pub fn report_path(summarized: &Utf8Path) -> Utf8PathBuf {
    let replaced = summarized.file_name().and_then(|name| {
        name.strip_suffix(SUMMARIZED_SUFFIX)
            .map(|stem| summarized.with_file_name(format!("{stem}{REPORT_SUFFIX}")))
    });
    replaced.unwrap_or_else(|| with_stem_suffix(summarized, REPORT_SUFFIX))
}

/// Reporting period recovered from a summarised CSV name.
///
/// `pr_2025-03-01_2025-03-15_summarized.csv` yields
/// `2025-03-01 to 2025-03-15`; anything else yields [`DEFAULT_PERIOD`].
#[must_use]
pub fn period_label(summarized: &Utf8Path) -> String {
    summarized
        .file_name()
        .and_then(|name| name.strip_prefix(PREFIX))
        .and_then(|rest| rest.strip_suffix(SUMMARIZED_SUFFIX))
        .filter(|range| !range.is_empty())
        .map_or_else(|| DEFAULT_PERIOD.to_owned(), |range| range.replace('_', " to "))
}

/// Finds the most recently modified unsummarised `pr_*.csv` in `directory`.
///
/// # Errors
///
/// Returns [`DigestError::NoCsvFound`] when the directory is missing or
/// holds no candidate files, and [`DigestError::Io`] when it cannot be read.
pub fn find_latest_csv(directory: &Utf8Path) -> Result<Utf8PathBuf, DigestError> {
    if !directory.is_dir() {
        return Err(no_csv_found(directory));
    }

    let entries = directory
        .read_dir_utf8()
        .map_err(|error| DigestError::io(&format!("read '{directory}'"), &error))?;

    let mut newest: Option<(SystemTime, Utf8PathBuf)> = None;
    for entry_result in entries {
        let entry = entry_result.map_err(|error| DigestError::io(&format!("read '{directory}'"), &error))?;
        if !is_candidate(entry.file_name()) {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|metadata| metadata.modified())
            .map_err(|error| DigestError::io(&format!("stat '{}'", entry.path()), &error))?;
        if newest.as_ref().is_none_or(|(current, _)| modified > *current) {
            newest = Some((modified, entry.into_path()));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| no_csv_found(directory))
}

fn is_candidate(file_name: &str) -> bool {
    file_name.starts_with(PREFIX)
        && file_name.ends_with(CSV_EXTENSION)
        && !file_name.contains("summarized")
}

fn no_csv_found(directory: &Utf8Path) -> DigestError {
    DigestError::NoCsvFound {
        directory: directory.to_string(),
    }
}

fn with_stem_suffix(path: &Utf8Path, suffix: &str) -> Utf8PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}"))
}
