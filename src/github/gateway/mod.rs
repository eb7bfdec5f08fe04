//! Gateway for reading pull requests through Octocrab.
//!
//! The trait keeps the fetch stage independent of HTTP so it can be driven
//! by mocks in tests, while [`OctocrabGateway`] performs real requests.

mod error_mapping;
mod pull_request;

pub use pull_request::{OctocrabGateway, PER_PAGE};

use async_trait::async_trait;

use crate::error::DigestError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{PullRequestPage, PullRequestSnapshot, SearchPage};

/// Read-only access to a repository's pull requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Login of the user the token belongs to.
    async fn authenticated_login(&self) -> Result<String, DigestError>;

    /// One page (1-based) of issue search results for `query`, newest first.
    async fn search_pull_requests(&self, query: &str, page: u32)
    -> Result<SearchPage, DigestError>;

    /// Full details, including line counts, of one pull request.
    async fn pull_request(
        &self,
        locator: &RepositoryLocator,
        number: u64,
    ) -> Result<PullRequestSnapshot, DigestError>;

    /// One page (1-based) of all pull requests in the repository, newest
    /// first.
    async fn list_pull_requests(
        &self,
        locator: &RepositoryLocator,
        page: u32,
    ) -> Result<PullRequestPage, DigestError>;
}
