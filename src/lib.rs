//! prdigest library crate: pull request retrieval and AI summaries.
//!
//! The library fetches a contributor's pull requests from GitHub within a
//! creation window, extracts the meaningful parts of each description,
//! writes them to CSV, and turns that CSV into per-PR summaries plus a
//! Markdown activity report through an OpenAI-compatible completion API.

pub mod ai;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod github;
pub mod record;
pub mod summarize;
pub mod window;

pub use ai::{CompletionService, OpenAiCompletionService, OpenAiConfig};
pub use config::{OperationMode, PrDigestConfig};
pub use error::DigestError;
pub use fetch::{FetchRequest, PullRequestFetcher, fetch_to_csv};
pub use github::{
    OctocrabGateway, PersonalAccessToken, PullRequestGateway, PullRequestSnapshot,
    RepositoryLocator,
};
pub use record::{PullRequestRecord, PullRequestState, SummarizedRecord};
pub use summarize::{SummarizeOptions, process_csv};
pub use window::{FetchWindow, WindowDays};
