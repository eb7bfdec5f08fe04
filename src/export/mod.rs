//! Output files produced by the fetch and summarisation stages.
//!
//! # Files
//!
//! - **Detailed CSV**: one fully quoted row per fetched pull request
//! - **Summarised CSV**: the detailed columns plus `ai_summary`
//! - **Markdown report**: batch totals, pattern analysis, and per-PR sections

mod naming;
mod report;
mod table;

pub use naming::{
    DEFAULT_PERIOD, detailed_csv_path, find_latest_csv, period_label, report_path,
    summarized_csv_path,
};
pub use report::{Report, write_report, write_report_file};
pub use table::{
    DETAILED_COLUMNS, SUMMARY_COLUMN, read_records, read_records_from, write_detailed,
    write_detailed_csv, write_summarized, write_summarized_csv,
};
