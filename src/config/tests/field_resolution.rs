//! Tests for legacy environment fallbacks and derived settings.

use std::time::Duration;

use rstest::rstest;

use crate::PrDigestConfig;
use crate::error::DigestError;

#[rstest]
fn resolve_token_prefers_configured_value() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("legacy-token"))]);
    let config = PrDigestConfig {
        token: Some("my-token".to_owned()),
        ..Default::default()
    };

    let token = config.resolve_token().expect("token should resolve");
    assert_eq!(token.value(), "my-token");
}

#[rstest]
fn resolve_token_falls_back_to_github_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("legacy-token"))]);
    let config = PrDigestConfig::default();

    let token = config.resolve_token().expect("legacy token should resolve");
    assert_eq!(token.value(), "legacy-token");
}

#[rstest]
fn resolve_token_returns_error_when_none() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = PrDigestConfig::default();

    assert_eq!(
        config.resolve_token().map(|token| token.value().to_owned()),
        Err(DigestError::MissingToken)
    );
}

#[rstest]
fn resolve_repository_falls_back_to_github_repo() {
    let _guard = env_lock::lock_env([("GITHUB_REPO", Some("facebook/react"))]);
    let config = PrDigestConfig::default();

    let locator = config
        .resolve_repository()
        .expect("legacy repository should resolve");
    assert_eq!(locator.full_name(), "facebook/react");
}

#[rstest]
fn resolve_repository_requires_a_value() {
    let _guard = env_lock::lock_env([("GITHUB_REPO", None::<&str>)]);
    let config = PrDigestConfig::default();

    assert!(matches!(
        config.resolve_repository(),
        Err(DigestError::MissingRepository)
    ));
}

#[rstest]
fn resolve_author_falls_back_to_github_username() {
    let _guard = env_lock::lock_env([("GITHUB_USERNAME", Some("octocat"))]);
    let config = PrDigestConfig::default();

    assert_eq!(config.resolve_author().as_deref(), Some("octocat"));
}

#[rstest]
fn resolve_author_is_none_without_sources() {
    let _guard = env_lock::lock_env([("GITHUB_USERNAME", None::<&str>)]);
    let config = PrDigestConfig::default();

    assert_eq!(config.resolve_author(), None);
}

#[rstest]
#[case::configured(Some(30), None, Ok(30))]
#[case::legacy(None, Some("45"), Ok(45))]
#[case::configured_wins(Some(7), Some("45"), Ok(7))]
#[case::default(None, None, Ok(14))]
#[case::zero(Some(0), None, Err("0"))]
#[case::legacy_not_integer(None, Some("two weeks"), Err("two weeks"))]
#[case::legacy_negative(None, Some("-3"), Err("-3"))]
fn resolve_days_validates_sources(
    #[case] configured: Option<u32>,
    #[case] legacy: Option<&str>,
    #[case] expected: Result<u32, &str>,
) {
    let _guard = env_lock::lock_env([("DAYS", legacy)]);
    let config = PrDigestConfig {
        days: configured,
        ..Default::default()
    };

    let result = config.resolve_days().map(crate::window::WindowDays::get);

    match expected {
        Ok(days) => assert_eq!(result, Ok(days)),
        Err(value) => assert_eq!(
            result,
            Err(DigestError::InvalidWindow {
                value: value.to_owned()
            })
        ),
    }
}

#[rstest]
fn openai_config_uses_legacy_fallbacks() {
    let _guard = env_lock::lock_env([
        ("OPENAI_API_KEY", Some("sk-legacy")),
        ("OPENAI_MODEL", Some("gpt-legacy")),
    ]);
    let config = PrDigestConfig {
        ai_timeout_seconds: 5,
        ..Default::default()
    };

    let openai = config.openai_config();

    assert_eq!(openai.api_key.as_deref(), Some("sk-legacy"));
    assert_eq!(openai.model, "gpt-legacy");
    assert_eq!(openai.base_url, "https://api.openai.com/v1");
    assert_eq!(openai.timeout, Duration::from_secs(5));
}

#[rstest]
fn openai_config_defaults_model() {
    let _guard = env_lock::lock_env([
        ("OPENAI_API_KEY", None::<&str>),
        ("OPENAI_MODEL", None::<&str>),
    ]);
    let config = PrDigestConfig {
        ai_api_key: Some("sk-configured".to_owned()),
        ..Default::default()
    };

    let openai = config.openai_config();

    assert_eq!(openai.model, "gpt-4o-mini");
    assert_eq!(openai.api_key.as_deref(), Some("sk-configured"));
}

#[rstest]
fn summarize_options_follow_output_settings() {
    let config = PrDigestConfig {
        output_dir: "reports".to_owned(),
        output: Some("custom.csv".to_owned()),
        summary_delay_millis: 0,
        ..Default::default()
    };

    let options = config.summarize_options();

    assert_eq!(options.output_dir.as_str(), "reports");
    assert_eq!(options.output.as_deref().map(camino::Utf8Path::as_str), Some("custom.csv"));
    assert_eq!(options.delay, Duration::ZERO);
}
