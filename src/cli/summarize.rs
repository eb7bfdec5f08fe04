//! Summarise operation: AI summaries and a report for an existing CSV.

use std::io::{self, Write};

use camino::Utf8PathBuf;
use prdigest::export::find_latest_csv;
use prdigest::{
    CompletionService, DigestError, OpenAiCompletionService, OpenAiConfig, PrDigestConfig,
    process_csv,
};

use super::output::io_error;

/// Summarises the configured CSV, or the newest one in the output directory.
///
/// # Errors
///
/// Returns [`DigestError`] if no CSV can be found, the completion client is
/// misconfigured, or reading or writing files fails.
pub async fn run(config: &PrDigestConfig) -> Result<Utf8PathBuf, DigestError> {
    let input = resolve_input(config, &mut io::stdout())?;
    summarize_in_background(input, config).await
}

/// Returns the configured CSV path, or auto-detects the newest unsummarised
/// `pr_*.csv` in the output directory.
///
/// # Errors
///
/// Returns [`DigestError::NoCsvFound`] when auto-detection finds nothing.
pub fn resolve_input<W: Write>(
    config: &PrDigestConfig,
    writer: &mut W,
) -> Result<Utf8PathBuf, DigestError> {
    if let Some(path) = config.csv_file() {
        return Ok(path);
    }
    let found = find_latest_csv(&config.output_dir())?;
    writeln!(writer, "🔍 Auto-detected CSV file: {found}").map_err(|e| io_error(&e))?;
    Ok(found)
}

/// Runs the blocking summarisation stage off the async runtime with the
/// OpenAI-compatible completion client.
///
/// # Errors
///
/// Returns the stage's error, or [`DigestError::Io`] if the blocking task
/// panicked.
pub async fn summarize_in_background(
    input: Utf8PathBuf,
    config: &PrDigestConfig,
) -> Result<Utf8PathBuf, DigestError> {
    summarize_with_service(input, config, OpenAiCompletionService::new).await
}

/// Runs the blocking summarisation stage with a service from
/// `build_service`.
///
/// The service is built on the blocking thread because the OpenAI client
/// owns its own runtime.
///
/// # Errors
///
/// Returns the stage's error, or [`DigestError::Io`] if the blocking task
/// panicked.
pub async fn summarize_with_service<S, F>(
    input: Utf8PathBuf,
    config: &PrDigestConfig,
    build_service: F,
) -> Result<Utf8PathBuf, DigestError>
where
    S: CompletionService + 'static,
    F: FnOnce(OpenAiConfig) -> Result<S, DigestError> + Send + 'static,
{
    let openai = config.openai_config();
    let options = config.summarize_options();
    tokio::task::spawn_blocking(move || {
        tracing::debug!(model = %openai.model, %input, "summarising CSV");
        let service = build_service(openai)?;
        process_csv(&input, &options, &service, &mut io::stdout())
    })
    .await
    .map_err(|error| DigestError::Io {
        message: format!("summarisation task failed: {error}"),
    })?
}
