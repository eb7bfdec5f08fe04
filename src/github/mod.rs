//! GitHub pull request retrieval.
//!
//! This module wraps Octocrab to resolve the authenticated user, search and
//! list a repository's pull requests, and load per-PR line counts. Errors are
//! mapped into [`DigestError`](crate::DigestError) variants so callers never
//! see Octocrab internals.

pub mod gateway;
pub mod locator;
pub mod models;
pub mod rate_limit;

pub use gateway::{OctocrabGateway, PER_PAGE, PullRequestGateway};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{PullRequestPage, PullRequestSnapshot, SearchPage};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockPullRequestGateway;
