//! Error types shared by the fetch and summarisation stages.

use thiserror::Error;

use crate::github::rate_limit::RateLimitInfo;

/// Errors surfaced while configuring, fetching, summarising, or writing
/// output files.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DigestError {
    /// No repository identifier was configured.
    #[error("repository is required (use --repo, PRDIGEST_REPO, or GITHUB_REPO)")]
    MissingRepository,

    /// The repository identifier is not `owner/repo` or a repository URL.
    #[error("repository must be 'owner/repo' or a repository URL, got '{0}'")]
    InvalidRepository(String),

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was missing.
    #[error("personal access token is required (use --token, PRDIGEST_TOKEN, or GITHUB_TOKEN)")]
    MissingToken,

    /// The fetch window length is not a positive integer.
    #[error("days must be a positive integer, got '{value}'")]
    InvalidWindow {
        /// The rejected value as supplied.
        value: String,
    },

    /// The operator declined to continue with a very long fetch window.
    #[error("fetch of {days} days was not confirmed")]
    WindowNotConfirmed {
        /// Requested window length in days.
        days: u32,
    },

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// An upstream API returned a non-authentication error.
    #[error("API error: {message}")]
    Api {
        /// Response detail describing the failure.
        message: String,
    },

    /// Networking failed while calling an upstream API.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if it could be queried after the failure.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// The pull request listing was not sorted newest first, so an early
    /// exit could silently drop pull requests.
    #[error(
        "pull request listing is not sorted by creation date (#{number} created at \
         {created_at} follows an older pull request)"
    )]
    UnorderedListing {
        /// Number of the out-of-order pull request.
        number: u64,
        /// Its creation timestamp.
        created_at: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A CSV file could not be read or written.
    #[error("CSV error: {message}")]
    Csv {
        /// Error detail from the CSV reader or writer.
        message: String,
    },

    /// No pull request CSV was available for summarisation.
    #[error("no pull request CSV files found in '{directory}'; run the fetch stage first")]
    NoCsvFound {
        /// Directory that was searched.
        directory: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl DigestError {
    /// Wraps an I/O error with a short description of the failed operation.
    #[must_use]
    pub fn io(operation: &str, error: &std::io::Error) -> Self {
        Self::Io {
            message: format!("{operation}: {error}"),
        }
    }

    /// Wraps a CSV error with a short description of the failed operation.
    #[must_use]
    pub fn csv(operation: &str, error: &csv::Error) -> Self {
        Self::Csv {
            message: format!("{operation}: {error}"),
        }
    }
}
