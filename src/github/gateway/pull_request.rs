//! Octocrab implementation of the pull request gateway.

use async_trait::async_trait;
use http::Uri;
use octocrab::{Octocrab, Page};

use crate::error::DigestError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};
use crate::github::models::{
    ApiPullRequest, ApiSearchResults, ApiUser, PullRequestPage, PullRequestSnapshot, SearchPage,
};
use crate::github::rate_limit::RateLimitInfo;

use super::PullRequestGateway;
use super::error_mapping::{FailureKind, classify, map_octocrab_error};

/// Page size requested from every paginated endpoint.
pub const PER_PAGE: u8 = 100;

const SEARCH_PATH: &str = "/search/issues";
const USER_PATH: &str = "/user";

/// Octocrab-backed gateway.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a gateway talking to the API that serves `locator`.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidUrl`] when the base URI cannot be parsed
    /// or [`DigestError::Api`] when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &RepositoryLocator,
    ) -> Result<Self, DigestError> {
        let api_base = locator.api_base().as_str();
        let base_uri = api_base
            .parse::<Uri>()
            .map_err(|error| DigestError::InvalidUrl(format!("{api_base}: {error}")))?;

        let client = Octocrab::builder()
            .personal_token(token.value())
            .base_uri(base_uri)
            .map_err(|error| DigestError::Api {
                message: format!("GitHub API base '{api_base}' rejected: {error}"),
            })?
            .build()
            .map_err(|error| map_octocrab_error("build GitHub client", &error))?;
        Ok(Self::new(client))
    }

    async fn map_error_with_rate_limit(
        &self,
        operation: &str,
        error: &octocrab::Error,
    ) -> DigestError {
        let octocrab::Error::GitHub { source, .. } = error else {
            return map_octocrab_error(operation, error);
        };
        if classify(error) != FailureKind::RateLimited {
            return map_octocrab_error(operation, error);
        }

        let rate_limit = self.fetch_rate_limit_info().await;
        let reset_hint = rate_limit
            .as_ref()
            .map(|info| format!(" ({info})"))
            .unwrap_or_default();
        DigestError::RateLimitExceeded {
            message: format!("{operation} failed: {}{reset_hint}", source.message),
            rate_limit,
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        RateLimitInfo::from_rate(&rate)
    }
}

#[async_trait]
impl PullRequestGateway for OctocrabGateway {
    async fn authenticated_login(&self) -> Result<String, DigestError> {
        let user = match self
            .client
            .get::<ApiUser, _, _>(USER_PATH, None::<&()>)
            .await
        {
            Ok(user) => user,
            Err(error) => return Err(self.map_error_with_rate_limit("current user", &error).await),
        };

        user.login.ok_or_else(|| DigestError::Api {
            message: "current user response did not include a login".to_owned(),
        })
    }

    async fn search_pull_requests(
        &self,
        query: &str,
        page: u32,
    ) -> Result<SearchPage, DigestError> {
        let page_str = page.to_string();
        let per_page_str = PER_PAGE.to_string();
        let query_params = [
            ("q", query),
            ("sort", "created"),
            ("order", "desc"),
            ("per_page", per_page_str.as_str()),
            ("page", page_str.as_str()),
        ];

        tracing::debug!(query, page, "searching pull requests");
        match self
            .client
            .get::<ApiSearchResults, _, _>(SEARCH_PATH, Some(&query_params))
            .await
        {
            Ok(results) => Ok(results.into()),
            Err(error) => Err(self.map_error_with_rate_limit("search pulls", &error).await),
        }
    }

    async fn pull_request(
        &self,
        locator: &RepositoryLocator,
        number: u64,
    ) -> Result<PullRequestSnapshot, DigestError> {
        tracing::debug!(number, "fetching pull request details");
        match self
            .client
            .get::<ApiPullRequest, _, _>(locator.pull_request_path(number), None::<&()>)
            .await
        {
            Ok(pull_request) => Ok(pull_request.into()),
            Err(error) => Err(self.map_error_with_rate_limit("pull request", &error).await),
        }
    }

    async fn list_pull_requests(
        &self,
        locator: &RepositoryLocator,
        page: u32,
    ) -> Result<PullRequestPage, DigestError> {
        let page_str = page.to_string();
        let per_page_str = PER_PAGE.to_string();
        let query_params = [
            ("state", "all"),
            ("sort", "created"),
            ("direction", "desc"),
            ("per_page", per_page_str.as_str()),
            ("page", page_str.as_str()),
        ];

        tracing::debug!(page, "listing pull requests");
        let page_result: Page<ApiPullRequest> = match self
            .client
            .get(locator.pulls_path(), Some(&query_params))
            .await
        {
            Ok(page_result) => page_result,
            Err(error) => return Err(self.map_error_with_rate_limit("list pulls", &error).await),
        };

        let has_next = page_result.next.is_some();
        Ok(PullRequestPage {
            items: page_result
                .items
                .into_iter()
                .map(PullRequestSnapshot::from)
                .collect(),
            has_next,
        })
    }
}

#[cfg(test)]
#[path = "pull_request_tests.rs"]
mod tests;
