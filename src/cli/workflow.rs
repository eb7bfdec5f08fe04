//! Full workflow: fetch, then summarise the fetched CSV.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use prdigest::export::report_path;
use prdigest::{
    CompletionService, DigestError, OctocrabGateway, OpenAiCompletionService, OpenAiConfig,
    PersonalAccessToken, PrDigestConfig, PullRequestGateway, RepositoryLocator,
};

use super::output::{io_error, write_rule};
use super::{fetch, summarize};

/// Runs both stages against GitHub and the configured completion endpoint.
///
/// # Errors
///
/// Returns [`DigestError`] when the fetch stage fails.
pub async fn run(config: &PrDigestConfig) -> Result<ExitCode, DigestError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with_builders(
        config,
        OctocrabGateway::for_token,
        OpenAiCompletionService::new,
        &mut stdin.lock(),
        &mut stdout,
    )
    .await
}

/// Runs both stages with injected gateway and completion service builders.
///
/// A fetch that finds nothing exits unsuccessfully. A summarisation failure
/// after a successful fetch is reported but still exits successfully, since
/// the detailed CSV remains usable.
///
/// # Errors
///
/// Returns [`DigestError`] when the fetch stage fails.
pub async fn run_with_builders<G, F, S, B, R, W>(
    config: &PrDigestConfig,
    build_gateway: F,
    build_service: B,
    input: &mut R,
    writer: &mut W,
) -> Result<ExitCode, DigestError>
where
    G: PullRequestGateway,
    F: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<G, DigestError>,
    S: CompletionService + 'static,
    B: FnOnce(OpenAiConfig) -> Result<S, DigestError> + Send + 'static,
    R: BufRead,
    W: Write,
{
    writeln!(writer, "🚀 Starting GitHub PR Analytics Suite").map_err(|e| io_error(&e))?;
    write_rule(writer)?;
    writeln!(writer, "📊 Step 1: Fetching PRs from GitHub...").map_err(|e| io_error(&e))?;

    let fetched = fetch::run_with_gateway_builder(config, build_gateway, input, writer).await?;
    let Some(csv_file) = fetched else {
        writeln!(writer, "❌ PR fetching failed. Stopping workflow.").map_err(|e| io_error(&e))?;
        return Ok(ExitCode::FAILURE);
    };

    writeln!(writer, "✅ PR data saved to: {csv_file}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "🤖 Step 2: Generating AI summaries...").map_err(|e| io_error(&e))?;

    match summarize::summarize_with_service(csv_file.clone(), config, build_service).await {
        Ok(summarized) => {
            writeln!(writer).map_err(|e| io_error(&e))?;
            writeln!(writer, "🎉 WORKFLOW COMPLETE!").map_err(|e| io_error(&e))?;
            write_rule(writer)?;
            writeln!(writer, "📁 Detailed PR data: {csv_file}").map_err(|e| io_error(&e))?;
            writeln!(writer, "🤖 AI summarized data: {summarized}").map_err(|e| io_error(&e))?;
            writeln!(writer, "📝 Pattern analysis: {}", report_path(&summarized))
                .map_err(|e| io_error(&e))?;
        }
        Err(error) => {
            tracing::warn!(%error, "summarisation failed after a successful fetch");
            writeln!(
                writer,
                "⚠️  PR fetching completed, but AI summarization failed: {error}"
            )
            .map_err(|e| io_error(&e))?;
            writeln!(writer, "📁 You can still use the detailed PR data: {csv_file}")
                .map_err(|e| io_error(&e))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
