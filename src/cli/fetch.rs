//! Fetch operation: pull requests into a detailed CSV.

use std::io::{self, BufRead, Write};

use camino::Utf8PathBuf;
use prdigest::{
    DigestError, FetchRequest, FetchWindow, OctocrabGateway, PersonalAccessToken,
    PrDigestConfig, PullRequestFetcher, PullRequestGateway, RepositoryLocator, fetch_to_csv,
};

use super::confirm::confirm_long_window;

/// Fetches pull requests and writes the detailed CSV.
///
/// Returns `Ok(None)` when nothing matched.
///
/// # Errors
///
/// Returns [`DigestError`] if configuration is incomplete, the operator
/// declines a long window, or fetching or writing fails.
pub async fn run(config: &PrDigestConfig) -> Result<Option<Utf8PathBuf>, DigestError> {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    run_with_gateway_builder(config, OctocrabGateway::for_token, &mut stdin, &mut stdout).await
}

/// Fetches pull requests using a custom gateway builder.
///
/// This function is exposed for testing with stub gateways.
pub async fn run_with_gateway_builder<G, F, R, W>(
    config: &PrDigestConfig,
    build_gateway: F,
    input: &mut R,
    writer: &mut W,
) -> Result<Option<Utf8PathBuf>, DigestError>
where
    G: PullRequestGateway,
    F: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<G, DigestError>,
    R: BufRead,
    W: Write,
{
    let token = config.resolve_token()?;
    let locator = config.resolve_repository()?;
    let days = config.resolve_days()?;
    let window = FetchWindow::ending_now(days)?;
    if days.requires_confirmation() && !config.assume_yes {
        confirm_long_window(days, input, writer)?;
    }

    let gateway = build_gateway(&token, &locator)?;
    let fetcher = PullRequestFetcher::new(&gateway);
    let request = FetchRequest::new(locator, config.resolve_author(), window);
    fetch_to_csv(&fetcher, &request, &config.output_dir(), writer).await
}
