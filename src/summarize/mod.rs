//! Summarisation stage.
//!
//! Reads a fetched CSV, asks the completion service for a short summary of
//! each pull request and one cross-project analysis, then writes the
//! summarised CSV and its Markdown report. Completion failures never abort
//! the batch; their error text is stored in place of the reply.

mod prompts;

use std::io::Write;
use std::thread;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};

use crate::ai::{CompletionRequest, CompletionService, complete_or_error_text};
use crate::error::DigestError;
use crate::export::{
    Report, period_label, read_records, report_path, summarized_csv_path, write_report_file,
    write_summarized_csv,
};
use crate::extract::classify_project;
use crate::record::{LineTotals, PullRequestRecord, SummarizedRecord};

use self::prompts::{BreakdownLine, Prompts, SummaryLine};

pub use self::prompts::SYSTEM_PROMPT;

/// Token limit for a single pull request summary.
pub const SUMMARY_MAX_TOKENS: u32 = 150;

/// Token limit for the pattern analysis.
pub const ANALYSIS_MAX_TOKENS: u32 = 800;

/// Sampling temperature for every request.
pub const TEMPERATURE: f32 = 0.3;

/// Pause between consecutive summary requests unless configured otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Records included in the analysis prompt's summary list.
pub const ANALYSIS_SAMPLE_SIZE: usize = 20;

const TITLE_PREVIEW_CHARS: usize = 50;

/// Records sharing a project label, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectGroup<'a> {
    /// Project label derived from titles.
    pub project: String,
    /// Members of the group in file order.
    pub records: Vec<&'a PullRequestRecord>,
}

impl ProjectGroup<'_> {
    /// Line totals across the group.
    #[must_use]
    pub fn totals(&self) -> LineTotals {
        LineTotals::from_records(self.records.iter().copied())
    }
}

/// Groups records by [`classify_project`], keeping first-seen order.
#[must_use]
pub fn group_by_project<'a>(
    records: impl IntoIterator<Item = &'a PullRequestRecord>,
) -> Vec<ProjectGroup<'a>> {
    let mut groups: Vec<ProjectGroup<'a>> = Vec::new();
    for record in records {
        let project = classify_project(record.title());
        if let Some(group) = groups.iter_mut().find(|group| group.project == project) {
            group.records.push(record);
            continue;
        }
        groups.push(ProjectGroup {
            project,
            records: vec![record],
        });
    }
    groups
}

/// Where summarisation output goes and how requests are paced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeOptions {
    /// Explicit summarised CSV path; derived from the input when absent.
    pub output: Option<Utf8PathBuf>,
    /// Directory for derived output paths.
    pub output_dir: Utf8PathBuf,
    /// Pause between consecutive summary requests.
    pub delay: Duration,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            output: None,
            output_dir: Utf8PathBuf::from("output"),
            delay: DEFAULT_DELAY,
        }
    }
}

/// Produces summaries and the pattern analysis through a completion
/// service.
#[derive(Debug)]
pub struct Summarizer<'service> {
    service: &'service dyn CompletionService,
    prompts: Prompts,
    delay: Duration,
}

impl<'service> Summarizer<'service> {
    /// Creates a summariser pausing `delay` between summary requests.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Configuration`] if the prompt templates fail
    /// to compile.
    pub fn new(service: &'service dyn CompletionService, delay: Duration) -> Result<Self, DigestError> {
        Ok(Self {
            service,
            prompts: Prompts::new()?,
            delay,
        })
    }

    /// One- or two-sentence summary of a pull request.
    ///
    /// # Errors
    ///
    /// Returns an error only if the prompt cannot be rendered; completion
    /// failures become `"Error: <message>"` text.
    pub fn summarize(&self, title: &str, description: &str) -> Result<String, DigestError> {
        let prompt = self.prompts.summary(title, description)?;
        let request = CompletionRequest::new(SYSTEM_PROMPT, prompt, SUMMARY_MAX_TOKENS, TEMPERATURE);
        Ok(complete_or_error_text(self.service, &request))
    }

    /// Summarises every record in order, writing progress to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if a prompt cannot be rendered or progress cannot be
    /// written.
    pub fn summarize_all<W: Write>(
        &self,
        records: Vec<PullRequestRecord>,
        out: &mut W,
    ) -> Result<Vec<SummarizedRecord>, DigestError> {
        let total = records.len();
        let mut summarized = Vec::with_capacity(total);
        for (index, record) in records.into_iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            writeln!(
                out,
                "Processing PR {}/{total}: {}...",
                index.saturating_add(1),
                title_preview(record.title())
            )
            .map_err(|e| transcript_error(&e))?;
            let summary = self.summarize(record.title(), record.description())?;
            summarized.push(record.with_summary(summary));
        }
        Ok(summarized)
    }

    /// Cross-project analysis of summarised records.
    ///
    /// # Errors
    ///
    /// Returns an error only if the prompt cannot be rendered; completion
    /// failures become `"Error: <message>"` text.
    pub fn analyze(&self, records: &[SummarizedRecord]) -> Result<String, DigestError> {
        let groups = group_by_project(records.iter().map(SummarizedRecord::record));
        let breakdown: Vec<BreakdownLine<'_>> = groups
            .iter()
            .map(|group| {
                let totals = group.totals();
                BreakdownLine {
                    project: &group.project,
                    count: totals.count,
                    lines_changed: totals.lines_changed,
                }
            })
            .collect();
        let summaries: Vec<SummaryLine<'_>> = records
            .iter()
            .take(ANALYSIS_SAMPLE_SIZE)
            .map(|summarized| SummaryLine {
                project: classify_project(summarized.record().title()),
                summary: summarized.ai_summary(),
            })
            .collect();

        let prompt = self.prompts.analysis(&breakdown, &summaries)?;
        let request =
            CompletionRequest::new(SYSTEM_PROMPT, prompt, ANALYSIS_MAX_TOKENS, TEMPERATURE);
        Ok(complete_or_error_text(self.service, &request))
    }
}

/// Runs the summarisation stage over `input`.
///
/// The CSV is read before any completion request is made. Returns the path
/// of the summarised CSV; the report is written beside it.
///
/// # Errors
///
/// Returns an error when the input cannot be read, an output file cannot be
/// written, or progress cannot be written to `out`.
pub fn process_csv<W: Write>(
    input: &Utf8Path,
    options: &SummarizeOptions,
    service: &dyn CompletionService,
    out: &mut W,
) -> Result<Utf8PathBuf, DigestError> {
    let records = read_records(input)?;
    writeln!(out, "📊 Loaded {} PRs from {input}", records.len())
        .map_err(|e| transcript_error(&e))?;

    let summarizer = Summarizer::new(service, options.delay)?;
    writeln!(out, "🤖 Generating AI summaries...").map_err(|e| transcript_error(&e))?;
    let summarized = summarizer.summarize_all(records, out)?;

    writeln!(out, "🔍 Analyzing patterns...").map_err(|e| transcript_error(&e))?;
    let analysis = summarizer.analyze(&summarized)?;

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| summarized_csv_path(input, &options.output_dir));
    ensure_parent(&output)?;
    write_summarized_csv(&output, &summarized)?;
    writeln!(out, "💾 Saved summarized data to {output}").map_err(|e| transcript_error(&e))?;

    let report = report_path(&output);
    let period = period_label(&output);
    write_report_file(
        &report,
        &Report {
            period: &period,
            analysis: &analysis,
            records: &summarized,
        },
    )?;
    writeln!(out, "📝 Saved pattern analysis to {report}").map_err(|e| transcript_error(&e))?;

    writeln!(out, "\n🎯 QUICK ANALYSIS").map_err(|e| transcript_error(&e))?;
    writeln!(out, "{}", "=".repeat(50)).map_err(|e| transcript_error(&e))?;
    writeln!(out, "{analysis}").map_err(|e| transcript_error(&e))?;

    Ok(output)
}

fn ensure_parent(path: &Utf8Path) -> Result<(), DigestError> {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .map_or(Ok(()), |parent| {
            std::fs::create_dir_all(parent)
                .map_err(|error| DigestError::io(&format!("create '{parent}'"), &error))
        })
}

fn title_preview(title: &str) -> String {
    title.chars().take(TITLE_PREVIEW_CHARS).collect()
}

fn transcript_error(error: &std::io::Error) -> DigestError {
    DigestError::io("write progress", error)
}
