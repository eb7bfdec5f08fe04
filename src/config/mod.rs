//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prdigest.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRDIGEST_REPO`, `PRDIGEST_TOKEN`, and so
//!    on, with the legacy names `GITHUB_REPO`, `GITHUB_TOKEN`,
//!    `GITHUB_USERNAME`, `DAYS`, `OPENAI_API_KEY`, and `OPENAI_MODEL` as
//!    fallbacks
//! 4. **Command-line arguments** – `--repo`/`-r`, `--token`/`-t`, and so on
//!
//! # Configuration File
//!
//! Place `.prdigest.toml` in the current directory, home directory, or
//! XDG config directory with:
//!
//! ```toml
//! repo = "octocat/hello-world"
//! token = "ghp_example"
//! author = "octocat"
//! days = 30
//! ai_model = "gpt-4o-mini"
//! output_dir = "output"
//! ```

use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::ai::OpenAiConfig;
use crate::ai::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::error::DigestError;
use crate::github::{PersonalAccessToken, RepositoryLocator};
use crate::summarize::SummarizeOptions;
use crate::window::WindowDays;

const DEFAULT_SUMMARY_DELAY_MILLIS: u64 = 100;
const DEFAULT_OUTPUT_DIR: &str = "output";

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Fetch pull requests, then summarise the resulting CSV.
    Workflow,
    /// Fetch pull requests and stop after writing the detailed CSV.
    FetchOnly,
    /// Summarise an existing CSV without contacting GitHub.
    Summarize,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use prdigest::PrDigestConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = PrDigestConfig::load().expect("failed to load configuration");
/// let locator = config.resolve_repository().expect("repository required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRDIGEST",
    discovery(
        dotfile_name = ".prdigest.toml",
        config_file_name = "prdigest.toml",
        app_name = "prdigest"
    )
)]
pub struct PrDigestConfig {
    /// Repository as `owner/repo` or a repository URL.
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `PRDIGEST_REPO` or `GITHUB_REPO` (legacy)
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PRDIGEST_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Login whose pull requests are fetched; defaults to the token owner.
    ///
    /// Can be provided via:
    /// - CLI: `--author <LOGIN>` or `-a <LOGIN>`
    /// - Environment: `PRDIGEST_AUTHOR` or `GITHUB_USERNAME` (legacy)
    /// - Config file: `author = "..."`
    #[ortho_config(cli_short = 'a')]
    pub author: Option<String>,

    /// Fetch window length in days; defaults to 14.
    ///
    /// Can be provided via:
    /// - CLI: `--days <N>` or `-d <N>`
    /// - Environment: `PRDIGEST_DAYS` or `DAYS` (legacy)
    /// - Config file: `days = 14`
    #[ortho_config(cli_short = 'd')]
    pub days: Option<u32>,

    /// Chat-completions model identifier.
    ///
    /// Can be provided via:
    /// - CLI: `--ai-model <MODEL>`
    /// - Environment: `PRDIGEST_AI_MODEL` or `OPENAI_MODEL` (legacy)
    /// - Config file: `ai_model = "..."`
    #[ortho_config()]
    pub ai_model: Option<String>,

    /// API key for the chat-completions endpoint.
    ///
    /// Can be provided via:
    /// - CLI: `--ai-api-key <KEY>`
    /// - Environment: `PRDIGEST_AI_API_KEY` or `OPENAI_API_KEY` (legacy)
    /// - Config file: `ai_api_key = "..."`
    #[ortho_config()]
    pub ai_api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    #[ortho_config()]
    pub ai_base_url: Option<String>,

    /// Timeout for each completion request, in seconds.
    #[ortho_config()]
    pub ai_timeout_seconds: u64,

    /// Pause between consecutive summary requests, in milliseconds.
    ///
    /// Can be provided via:
    /// - CLI: `--summary-delay-millis <MS>` or `-w <MS>`
    /// - Environment: `PRDIGEST_SUMMARY_DELAY_MILLIS`
    /// - Config file: `summary_delay_millis = 100`
    #[ortho_config(cli_short = 'w')]
    pub summary_delay_millis: u64,

    /// Directory for generated CSV and Markdown files.
    ///
    /// Can be provided via:
    /// - CLI: `--output-dir <DIR>` or `-O <DIR>`
    /// - Environment: `PRDIGEST_OUTPUT_DIR`
    /// - Config file: `output_dir = "output"`
    #[ortho_config(cli_short = 'O')]
    pub output_dir: String,

    /// CSV to summarise; the newest `pr_*.csv` in `output_dir` when absent.
    #[ortho_config(cli_short = 'c')]
    pub csv_file: Option<String>,

    /// Explicit path for the summarised CSV.
    ///
    /// Can be provided via:
    /// - CLI: `--output <PATH>` or `-o <PATH>`
    #[ortho_config(cli_short = 'o')]
    pub output: Option<String>,

    /// Summarises an existing CSV without fetching.
    ///
    /// Can be provided via:
    /// - CLI: `--summarize` / `-s`
    /// - Config file: `summarize = true`
    #[ortho_config(cli_short = 's')]
    pub summarize: bool,

    /// Fetches pull requests without summarising them.
    ///
    /// Can be provided via:
    /// - CLI: `--fetch-only` / `-f`
    /// - Config file: `fetch_only = true`
    #[ortho_config(cli_short = 'f')]
    pub fetch_only: bool,

    /// Skips the confirmation prompt for windows longer than two years.
    ///
    /// Note: environment variables are not consulted for boolean flags
    /// because `ortho_config` does not load boolean values from the
    /// environment.
    #[ortho_config(cli_short = 'y')]
    pub assume_yes: bool,
}

impl Default for PrDigestConfig {
    fn default() -> Self {
        Self {
            repo: None,
            token: None,
            author: None,
            days: None,
            ai_model: None,
            ai_api_key: None,
            ai_base_url: None,
            ai_timeout_seconds: DEFAULT_TIMEOUT_SECS,
            summary_delay_millis: DEFAULT_SUMMARY_DELAY_MILLIS,
            output_dir: DEFAULT_OUTPUT_DIR.to_owned(),
            csv_file: None,
            output: None,
            summarize: false,
            fetch_only: false,
            assume_yes: false,
        }
    }
}

impl PrDigestConfig {
    /// Rejects contradictory mode flags.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Configuration`] when both `summarize` and
    /// `fetch_only` are set.
    pub fn validate(&self) -> Result<(), DigestError> {
        if self.summarize && self.fetch_only {
            return Err(DigestError::Configuration {
                message: "--summarize and --fetch-only cannot be used together".to_owned(),
            });
        }
        Ok(())
    }

    /// Determines the operation mode based on provided configuration.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.summarize {
            OperationMode::Summarize
        } else if self.fetch_only {
            OperationMode::FetchOnly
        } else {
            OperationMode::Workflow
        }
    }

    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, DigestError> {
        let value = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(DigestError::MissingToken)?;
        PersonalAccessToken::new(value)
    }

    /// Resolves the repository from configuration or the legacy
    /// `GITHUB_REPO` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::MissingRepository`] when no repository is
    /// configured, or a parse error when it is malformed.
    pub fn resolve_repository(&self) -> Result<RepositoryLocator, DigestError> {
        let value = self
            .repo
            .clone()
            .or_else(|| env::var("GITHUB_REPO").ok())
            .filter(|repo| !repo.trim().is_empty())
            .ok_or(DigestError::MissingRepository)?;
        RepositoryLocator::parse(&value)
    }

    /// Author login from configuration or the legacy `GITHUB_USERNAME`
    /// environment variable. `None` means the authenticated user.
    #[must_use]
    pub fn resolve_author(&self) -> Option<String> {
        self.author
            .clone()
            .or_else(|| env::var("GITHUB_USERNAME").ok())
            .filter(|author| !author.trim().is_empty())
    }

    /// Window length from configuration or the legacy `DAYS` environment
    /// variable, defaulting to 14.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidWindow`] when the value is zero or, for
    /// `DAYS`, not an integer.
    pub fn resolve_days(&self) -> Result<WindowDays, DigestError> {
        self.days.map_or_else(
            || {
                env::var("DAYS")
                    .ok()
                    .map_or_else(|| Ok(WindowDays::default()), |raw| WindowDays::parse(&raw))
            },
            WindowDays::new,
        )
    }

    /// Completion client settings, with `OPENAI_API_KEY` and `OPENAI_MODEL`
    /// as legacy fallbacks.
    #[must_use]
    pub fn openai_config(&self) -> OpenAiConfig {
        let model = self
            .ai_model
            .clone()
            .or_else(|| env::var("OPENAI_MODEL").ok())
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        let api_key = self
            .ai_api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok());
        let base_url = self
            .ai_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        OpenAiConfig::new(
            base_url,
            model,
            api_key,
            Duration::from_secs(self.ai_timeout_seconds),
        )
    }

    /// Directory for generated files.
    #[must_use]
    pub fn output_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(&self.output_dir)
    }

    /// Explicitly configured CSV to summarise.
    #[must_use]
    pub fn csv_file(&self) -> Option<Utf8PathBuf> {
        self.csv_file.as_deref().map(Utf8PathBuf::from)
    }

    /// Summarisation output settings.
    #[must_use]
    pub fn summarize_options(&self) -> SummarizeOptions {
        SummarizeOptions {
            output: self.output.as_deref().map(Utf8PathBuf::from),
            output_dir: self.output_dir(),
            delay: Duration::from_millis(self.summary_delay_millis),
        }
    }
}

#[cfg(test)]
mod tests;
