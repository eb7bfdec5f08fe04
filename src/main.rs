//! prdigest CLI entrypoint: fetch pull requests, then summarise them.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prdigest::{DigestError, OperationMode, PrDigestConfig};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(code) => code,
        Err(error) => {
            if writeln!(io::stderr().lock(), "Error: {error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, DigestError> {
    let config = load_config()?;
    config.validate()?;

    match config.operation_mode() {
        OperationMode::Workflow => cli::workflow::run(&config).await,
        OperationMode::FetchOnly => cli::fetch::run(&config).await.map(|_| ExitCode::SUCCESS),
        OperationMode::Summarize => cli::summarize::run(&config)
            .await
            .map(|_| ExitCode::SUCCESS),
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to
/// warnings.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`DigestError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrDigestConfig, DigestError> {
    PrDigestConfig::load().map_err(|error| DigestError::Configuration {
        message: error.to_string(),
    })
}
