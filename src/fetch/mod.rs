//! Pull request fetch stage.
//!
//! Retrieves the target author's pull requests inside a [`FetchWindow`],
//! preferring the issue search API and falling back to a newest-first scan
//! of the repository listing when search fails. Both strategies apply the
//! same window and author post-filter, and both resolve each kept pull
//! request's details to obtain line counts.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};

use crate::error::DigestError;
use crate::export::{detailed_csv_path, write_detailed_csv};
use crate::extract::{extract_attachments, extract_description};
use crate::github::{PullRequestGateway, PullRequestSnapshot, RepositoryLocator};
use crate::record::{LineChanges, LineTotals, PullRequestRecord, RecordContent};
use crate::window::FetchWindow;

/// Search hits processed between progress lines.
const SEARCH_PROGRESS_INTERVAL: usize = 5;

/// Listing entries scanned between progress lines.
const LISTING_PROGRESS_INTERVAL: usize = 50;

/// What to fetch: repository, author, and creation window.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    locator: RepositoryLocator,
    author: Option<String>,
    window: FetchWindow,
}

impl FetchRequest {
    /// Creates a request. A missing author means the authenticated caller.
    #[must_use]
    pub const fn new(
        locator: RepositoryLocator,
        author: Option<String>,
        window: FetchWindow,
    ) -> Self {
        Self {
            locator,
            author,
            window,
        }
    }

    /// Repository to fetch from.
    #[must_use]
    pub const fn locator(&self) -> &RepositoryLocator {
        &self.locator
    }

    /// Explicit author login, if configured.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Creation-date window.
    #[must_use]
    pub const fn window(&self) -> &FetchWindow {
        &self.window
    }
}

/// Fetches pull request records through a gateway.
///
/// # Example
///
/// ```ignore
/// let gateway = OctocrabGateway::for_token(&token, &locator)?;
/// let fetcher = PullRequestFetcher::new(&gateway);
/// let records = fetcher.fetch(&request, &mut std::io::stdout()).await?;
/// ```
pub struct PullRequestFetcher<'client, Gateway>
where
    Gateway: PullRequestGateway,
{
    client: &'client Gateway,
}

impl<'client, Gateway> PullRequestFetcher<'client, Gateway>
where
    Gateway: PullRequestGateway,
{
    /// Creates a fetcher over `client`.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Returns the configured author, or the authenticated login when none
    /// is configured.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures while resolving the authenticated user.
    pub async fn resolve_author(&self, requested: Option<&str>) -> Result<String, DigestError> {
        if let Some(login) = requested.map(str::trim).filter(|login| !login.is_empty()) {
            return Ok(login.to_owned());
        }
        self.client.authenticated_login().await
    }

    /// Fetches every record matching `request`, newest first.
    ///
    /// Progress lines are written to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error when the author cannot be resolved, when the listing
    /// fallback fails or is not sorted newest first, or when writing
    /// progress fails. Search failures trigger the fallback instead.
    pub async fn fetch<W: Write>(
        &self,
        request: &FetchRequest,
        out: &mut W,
    ) -> Result<Vec<PullRequestRecord>, DigestError> {
        let login = self.resolve_author(request.author()).await?;
        let window = request.window();
        let locator = request.locator();

        writeln!(out, "Searching for PRs created by: {login}").map_err(|e| transcript_error(&e))?;
        writeln!(
            out,
            "Time range: {} to {}",
            window.start_date(),
            window.end_date()
        )
        .map_err(|e| transcript_error(&e))?;
        writeln!(
            out,
            "Fetching PRs from {} created by '{login}' after {}...",
            locator.full_name(),
            window.start_date()
        )
        .map_err(|e| transcript_error(&e))?;

        let query = format!(
            "repo:{} is:pr author:{login} {}",
            locator.full_name(),
            window.search_qualifier()
        );
        match self.collect_search_hits(&query).await {
            Ok((total_count, hits)) => {
                writeln!(out, "Found {total_count} PRs matching criteria")
                    .map_err(|e| transcript_error(&e))?;
                self.resolve_search_hits(request, &login, total_count, hits, out)
                    .await
            }
            Err(error) => {
                tracing::warn!(%error, "pull request search failed; scanning repository listing");
                writeln!(out, "Error searching for PRs: {error}")
                    .map_err(|e| transcript_error(&e))?;
                writeln!(out, "Using fallback method - this may be slower...")
                    .map_err(|e| transcript_error(&e))?;
                self.scan_listing(request, &login, out).await
            }
        }
    }

    async fn collect_search_hits(
        &self,
        query: &str,
    ) -> Result<(u64, Vec<PullRequestSnapshot>), DigestError> {
        let mut hits = Vec::new();
        let mut page = 1_u32;
        loop {
            let results = self.client.search_pull_requests(query, page).await?;
            let total_count = results.total_count;
            if results.items.is_empty() {
                return Ok((total_count, hits));
            }
            hits.extend(results.items);
            let collected = u64::try_from(hits.len()).unwrap_or(u64::MAX);
            if collected >= total_count {
                return Ok((total_count, hits));
            }
            page = page.saturating_add(1);
        }
    }

    async fn resolve_search_hits<W: Write>(
        &self,
        request: &FetchRequest,
        login: &str,
        total_count: u64,
        hits: Vec<PullRequestSnapshot>,
        out: &mut W,
    ) -> Result<Vec<PullRequestRecord>, DigestError> {
        let mut progress = Progress::every(SEARCH_PROGRESS_INTERVAL);
        let mut records = Vec::with_capacity(hits.len());
        for hit in hits {
            if progress.tick() {
                writeln!(out, "Processed {}/{total_count} PRs...", progress.count())
                    .map_err(|e| transcript_error(&e))?;
            }
            if !request.window().contains(hit.created_at) || !hit.is_authored_by(login) {
                continue;
            }
            let record = self.resolve_record(request.locator(), hit).await;
            announce(out, &record)?;
            records.push(record);
        }
        Ok(records)
    }

    async fn scan_listing<W: Write>(
        &self,
        request: &FetchRequest,
        login: &str,
        out: &mut W,
    ) -> Result<Vec<PullRequestRecord>, DigestError> {
        let mut progress = Progress::every(LISTING_PROGRESS_INTERVAL);
        let mut ordering = NewestFirst::default();
        let mut records = Vec::new();
        let mut page = 1_u32;
        loop {
            let listing = self
                .client
                .list_pull_requests(request.locator(), page)
                .await?;
            if listing.items.is_empty() {
                break;
            }
            for pull_request in listing.items {
                ordering.check(&pull_request)?;
                if progress.tick() {
                    writeln!(out, "Processed {} PRs...", progress.count())
                        .map_err(|e| transcript_error(&e))?;
                }
                if !request.window().contains(pull_request.created_at) {
                    return Ok(records);
                }
                if !pull_request.is_authored_by(login) {
                    continue;
                }
                let record = self.resolve_record(request.locator(), pull_request).await;
                announce(out, &record)?;
                records.push(record);
            }
            if !listing.has_next {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(records)
    }

    /// Loads full details for `summary`, degrading to zero line counts when
    /// the detail request fails or omits them.
    async fn resolve_record(
        &self,
        locator: &RepositoryLocator,
        summary: PullRequestSnapshot,
    ) -> PullRequestRecord {
        let number = summary.number;
        let snapshot = self
            .client
            .pull_request(locator, number)
            .await
            .unwrap_or_else(|error| {
                tracing::warn!(number, %error, "could not load pull request details; line counts default to 0");
                summary
            });
        let changes = snapshot.changes.unwrap_or_else(|| {
            tracing::warn!(number, "pull request has no line counts; defaulting to 0");
            LineChanges::default()
        });
        build_record(snapshot, changes)
    }
}

/// Converts an API snapshot into a record, extracting description text and
/// attachment URLs from the body.
fn build_record(snapshot: PullRequestSnapshot, changes: LineChanges) -> PullRequestRecord {
    let content = RecordContent {
        description: extract_description(&snapshot.body),
        attachments: extract_attachments(&snapshot.body),
        url: snapshot.html_url,
        title: snapshot.title,
        created_at: snapshot.created_at,
        state: snapshot.state,
        merged: snapshot.merged,
    };
    PullRequestRecord::new(content, changes)
}

/// Runs the fetch stage end to end.
///
/// Writes the detailed CSV under `output_dir` and prints a short summary.
/// Returns `Ok(None)` when no pull requests matched; no file is written in
/// that case.
///
/// # Errors
///
/// Returns an error when fetching fails or the CSV cannot be written.
pub async fn fetch_to_csv<Gateway, W>(
    fetcher: &PullRequestFetcher<'_, Gateway>,
    request: &FetchRequest,
    output_dir: &Utf8Path,
    out: &mut W,
) -> Result<Option<Utf8PathBuf>, DigestError>
where
    Gateway: PullRequestGateway,
    W: Write,
{
    let records = fetcher.fetch(request, out).await?;
    if records.is_empty() {
        writeln!(out, "No PRs found matching the criteria.").map_err(|e| transcript_error(&e))?;
        return Ok(None);
    }

    std::fs::create_dir_all(output_dir)
        .map_err(|error| DigestError::io(&format!("create '{output_dir}'"), &error))?;
    let path = detailed_csv_path(output_dir, request.window());
    write_detailed_csv(&path, &records)?;
    writeln!(out, "Exported {} PRs to {path}", records.len()).map_err(|e| transcript_error(&e))?;

    let totals = LineTotals::from_records(&records);
    writeln!(out, "\nSummary:").map_err(|e| transcript_error(&e))?;
    writeln!(out, "Total PRs found: {}", totals.count).map_err(|e| transcript_error(&e))?;
    writeln!(out, "Total lines changed: {}", totals.lines_changed)
        .map_err(|e| transcript_error(&e))?;
    writeln!(out, "Average lines per PR: {:.1}", totals.average())
        .map_err(|e| transcript_error(&e))?;
    Ok(Some(path))
}

fn announce<W: Write>(out: &mut W, record: &PullRequestRecord) -> Result<(), DigestError> {
    writeln!(
        out,
        "Added PR: {} ({} lines changed)",
        record.title(),
        record.lines_changed()
    )
    .map_err(|e| transcript_error(&e))
}

fn transcript_error(error: &std::io::Error) -> DigestError {
    DigestError::io("write progress", error)
}

/// Counts processed items and signals every `interval`th one.
#[derive(Debug)]
struct Progress {
    interval: usize,
    count: usize,
    since_report: usize,
}

impl Progress {
    const fn every(interval: usize) -> Self {
        Self {
            interval,
            count: 0,
            since_report: 0,
        }
    }

    fn tick(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.since_report = self.since_report.saturating_add(1);
        if self.since_report < self.interval {
            return false;
        }
        self.since_report = 0;
        true
    }

    const fn count(&self) -> usize {
        self.count
    }
}

/// Verifies that listing entries arrive with non-increasing creation times.
#[derive(Debug, Default)]
struct NewestFirst {
    previous: Option<DateTime<Utc>>,
}

impl NewestFirst {
    fn check(&mut self, pull_request: &PullRequestSnapshot) -> Result<(), DigestError> {
        if self
            .previous
            .is_some_and(|previous| pull_request.created_at > previous)
        {
            return Err(DigestError::UnorderedListing {
                number: pull_request.number,
                created_at: pull_request.created_at.to_rfc3339(),
            });
        }
        self.previous = Some(pull_request.created_at);
        Ok(())
    }
}
