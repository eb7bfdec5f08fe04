//! Chat-completion requests and the service contract behind them.

use std::fmt::Debug;

use crate::error::DigestError;

/// A single system + user chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    system: String,
    user: String,
    max_tokens: u32,
    temperature: f32,
}

impl CompletionRequest {
    /// Creates a request from its prompts and sampling limits.
    #[must_use]
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens,
            temperature,
        }
    }

    /// System prompt.
    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    /// User prompt.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Upper bound on generated tokens.
    #[must_use]
    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// Completion provider used by the summarisation stage.
pub trait CompletionService: Send + Sync + Debug {
    /// Returns the assistant's trimmed, non-empty reply.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError`] when the provider call fails or yields no text.
    fn complete(&self, request: &CompletionRequest) -> Result<String, DigestError>;
}

/// Runs a completion and degrades any failure to `"Error: <message>"`.
///
/// The error text is returned in place of the reply so that one failed call
/// never aborts a batch.
#[must_use]
pub fn complete_or_error_text(
    service: &dyn CompletionService,
    request: &CompletionRequest,
) -> String {
    service.complete(request).map_or_else(
        |error| {
            tracing::warn!(%error, "completion request failed");
            format!("Error: {error}")
        },
        |text| text.trim().to_owned(),
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{CompletionRequest, CompletionService, complete_or_error_text};
    use crate::error::DigestError;

    #[derive(Debug)]
    struct StubService {
        response: Result<String, DigestError>,
    }

    impl CompletionService for StubService {
        fn complete(&self, _request: &CompletionRequest) -> Result<String, DigestError> {
            self.response.clone()
        }
    }

    fn sample_request() -> CompletionRequest {
        CompletionRequest::new("system", "user", 150, 0.3)
    }

    #[rstest]
    fn successful_reply_is_trimmed() {
        let service = StubService {
            response: Ok("  Adds caching.\n".to_owned()),
        };

        assert_eq!(
            complete_or_error_text(&service, &sample_request()),
            "Adds caching."
        );
    }

    #[rstest]
    fn failure_becomes_error_text() {
        let service = StubService {
            response: Err(DigestError::Network {
                message: "timeout".to_owned(),
            }),
        };

        assert_eq!(
            complete_or_error_text(&service, &sample_request()),
            "Error: network error: timeout"
        );
    }
}
