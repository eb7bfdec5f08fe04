//! Shared test utilities for CLI tests.

use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use prdigest::ai::CompletionRequest;
use prdigest::github::{PullRequestPage, SearchPage};
use prdigest::record::LineChanges;
use prdigest::{
    CompletionService, DigestError, PullRequestGateway, PullRequestSnapshot, PullRequestState,
    RepositoryLocator,
};
use tempfile::TempDir;

/// A gateway that serves fixed search hits and echoes them as details.
#[derive(Clone)]
pub struct StubGateway {
    hits: Arc<Vec<PullRequestSnapshot>>,
}

impl StubGateway {
    /// Serves `hits` from a single search page.
    pub fn with_search_hits(hits: Vec<PullRequestSnapshot>) -> Self {
        Self {
            hits: Arc::new(hits),
        }
    }
}

#[async_trait]
impl PullRequestGateway for StubGateway {
    async fn authenticated_login(&self) -> Result<String, DigestError> {
        Ok("alice".to_owned())
    }

    async fn search_pull_requests(
        &self,
        _query: &str,
        _page: u32,
    ) -> Result<SearchPage, DigestError> {
        Ok(SearchPage {
            total_count: u64::try_from(self.hits.len()).expect("hit count fits in u64"),
            items: self.hits.as_ref().clone(),
        })
    }

    async fn pull_request(
        &self,
        _locator: &RepositoryLocator,
        number: u64,
    ) -> Result<PullRequestSnapshot, DigestError> {
        let mut found = self
            .hits
            .iter()
            .find(|hit| hit.number == number)
            .cloned()
            .expect("details requested for a served hit");
        found.changes = Some(LineChanges::new(10, 2));
        Ok(found)
    }

    async fn list_pull_requests(
        &self,
        _locator: &RepositoryLocator,
        _page: u32,
    ) -> Result<PullRequestPage, DigestError> {
        Ok(PullRequestPage {
            items: Vec::new(),
            has_next: false,
        })
    }
}

/// A completion service that answers every request with the same text.
#[derive(Debug)]
pub struct CannedService {
    reply: String,
}

impl CannedService {
    /// Replies with `reply` to every request.
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_owned(),
        }
    }
}

impl CompletionService for CannedService {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, DigestError> {
        Ok(self.reply.clone())
    }
}

/// Builds a search hit created at `created_at`.
pub fn snapshot(number: u64, author: &str, created_at: DateTime<Utc>) -> PullRequestSnapshot {
    PullRequestSnapshot {
        number,
        title: format!("[CS-{number}] Roles: change {number}"),
        body: "## Description\nAdds a check".to_owned(),
        html_url: format!("https://github.com/octo/repo/pull/{number}"),
        author: Some(author.to_owned()),
        created_at,
        state: PullRequestState::Closed,
        merged: true,
        changes: None,
    }
}

/// Creates a temporary directory and returns it with its `output` child.
pub fn temp_output_dir() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().expect("temp dir");
    let output_dir = camino::Utf8Path::from_path(temp.path())
        .expect("UTF-8 temp path")
        .join("output");
    (temp, output_dir)
}
