//! Translation of Octocrab failures into [`DigestError`] values.

use http::StatusCode;

use crate::error::DigestError;

/// How a failed GitHub call is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FailureKind {
    /// The primary or secondary rate limit was hit.
    RateLimited,
    /// The token was missing, invalid, or lacks access.
    Unauthorized,
    /// GitHub answered with any other error status.
    Rejected,
    /// The request never produced a response.
    Transport,
    /// Decoding or client-side failures.
    Other,
}

/// Classifies an error response from its status, message, and
/// documentation link.
///
/// A 403 counts as a rate limit only when the message or link says so.
pub(super) fn classify_response(
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
) -> FailureKind {
    let mentions_rate_limit = message.to_lowercase().contains("rate limit")
        || documentation_url.is_some_and(|url| url.contains("rate-limit"));

    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if mentions_rate_limit => {
            FailureKind::RateLimited
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureKind::Unauthorized,
        _ => FailureKind::Rejected,
    }
}

/// Classifies any Octocrab error.
pub(super) fn classify(error: &octocrab::Error) -> FailureKind {
    match error {
        octocrab::Error::GitHub { source, .. } => classify_response(
            source.status_code,
            &source.message,
            source.documentation_url.as_deref(),
        ),
        octocrab::Error::Http { .. }
        | octocrab::Error::Hyper { .. }
        | octocrab::Error::Service { .. } => FailureKind::Transport,
        _ => FailureKind::Other,
    }
}

/// Maps an Octocrab error into a [`DigestError`] naming the failed operation.
///
/// Rate limits surface as [`DigestError::Api`] here; the gateway upgrades
/// them to [`DigestError::RateLimitExceeded`] once it has queried the reset
/// time.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> DigestError {
    let kind = classify(error);
    if let octocrab::Error::GitHub { source, .. } = error {
        let status = source.status_code;
        let message = &source.message;
        if kind == FailureKind::Unauthorized {
            return DigestError::Authentication {
                message: format!("{operation} failed: GitHub returned {status} {message}"),
            };
        }
        return DigestError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        };
    }

    if kind == FailureKind::Transport {
        return DigestError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    DigestError::Api {
        message: format!("{operation} failed: {error}"),
    }
}
