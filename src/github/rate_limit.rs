//! Rate limit state reported by GitHub after a throttled request.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use octocrab::models::Rate;

/// Core rate limit window queried after a 403/429 rate limit response.
///
/// # Example
///
/// ```
/// use prdigest::github::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 0, 1_700_000_000);
/// assert!(info.is_exhausted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit snapshot.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Converts Octocrab's rate payload, rejecting counts that do not fit.
    #[must_use]
    pub fn from_rate(rate: &Rate) -> Option<Self> {
        let limit = u32::try_from(rate.limit).ok()?;
        let remaining = u32::try_from(rate.remaining).ok()?;
        Some(Self::new(limit, remaining, rate.reset))
    }

    /// Maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Unix timestamp at which the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Whether no requests remain.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Seconds until the window resets, zero once it has passed.
    #[must_use]
    pub fn seconds_until_reset(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_secs());

        self.reset_at.saturating_sub(now)
    }
}

impl fmt::Display for RateLimitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exhausted() {
            write!(f, "quota of {} exhausted", self.limit())?;
        } else {
            write!(f, "{} of {} requests left", self.remaining(), self.limit())?;
        }
        write!(
            f,
            ", resets at {} in {}s",
            self.reset_at(),
            self.seconds_until_reset()
        )
    }
}
