//! Pull request data returned by the GitHub API.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into public domain types. Search hits, list entries, and the
//! single pull request endpoint share one payload shape; only the detail
//! endpoint carries `additions`, `deletions`, and `merged`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::record::{LineChanges, PullRequestState};

/// A pull request as seen through one of the GitHub endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSnapshot {
    /// Pull request number.
    pub number: u64,
    /// Title, empty when absent.
    pub title: String,
    /// Raw Markdown body, empty when absent.
    pub body: String,
    /// HTML URL for displaying to a user.
    pub html_url: String,
    /// Author login if present.
    pub author: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Open or closed.
    pub state: PullRequestState,
    /// Whether the pull request was merged.
    pub merged: bool,
    /// Line counts, present only on detail responses.
    pub changes: Option<LineChanges>,
}

impl PullRequestSnapshot {
    /// Whether `login` authored this pull request.
    #[must_use]
    pub fn is_authored_by(&self, login: &str) -> bool {
        self.author
            .as_deref()
            .is_some_and(|author| author.eq_ignore_ascii_case(login))
    }
}

/// One page of issue search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Total hits across all pages.
    pub total_count: u64,
    /// Hits on this page.
    pub items: Vec<PullRequestSnapshot>,
}

/// One page of the repository pull request listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestPage {
    /// Pull requests on this page, in API order.
    pub items: Vec<PullRequestSnapshot>,
    /// Whether GitHub advertised a following page.
    pub has_next: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequestLinks {
    pub(super) merged_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) body: Option<String>,
    pub(super) state: Option<String>,
    pub(super) html_url: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) merged: Option<bool>,
    pub(super) merged_at: Option<String>,
    pub(super) additions: Option<u64>,
    pub(super) deletions: Option<u64>,
    /// Present on search hits that are pull requests rather than issues.
    pub(super) pull_request: Option<ApiPullRequestLinks>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiSearchResults {
    pub(super) total_count: u64,
    #[serde(default)]
    pub(super) items: Vec<ApiPullRequest>,
}

impl From<ApiPullRequest> for PullRequestSnapshot {
    fn from(value: ApiPullRequest) -> Self {
        let merged_at = value
            .merged_at
            .or_else(|| value.pull_request.and_then(|links| links.merged_at));
        let state = match value.state.as_deref() {
            Some(state) if state.eq_ignore_ascii_case("open") => PullRequestState::Open,
            _ => PullRequestState::Closed,
        };
        let changes = value
            .additions
            .zip(value.deletions)
            .map(|(additions, deletions)| LineChanges::new(additions, deletions));

        Self {
            number: value.number,
            title: value.title.unwrap_or_default(),
            body: value.body.unwrap_or_default(),
            html_url: value.html_url.unwrap_or_default(),
            author: value.user.and_then(|user| user.login),
            created_at: value.created_at,
            state,
            merged: value.merged.unwrap_or(merged_at.is_some()),
            changes,
        }
    }
}

impl From<ApiSearchResults> for SearchPage {
    fn from(value: ApiSearchResults) -> Self {
        Self {
            total_count: value.total_count,
            items: value.items.into_iter().map(PullRequestSnapshot::from).collect(),
        }
    }
}
