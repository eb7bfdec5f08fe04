//! Fetch window derivation.
//!
//! A fetch window ends at invocation time and starts a whole number of days
//! earlier. It drives both the search filter sent to GitHub and the date
//! range embedded in output file names.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::DigestError;

/// Window length used when none is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Windows longer than this need explicit operator confirmation.
pub const CONFIRMATION_THRESHOLD_DAYS: u32 = 730;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validated, positive window length in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDays(u32);

impl WindowDays {
    /// Validates a window length.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidWindow`] when `days` is zero.
    pub fn new(days: u32) -> Result<Self, DigestError> {
        if days == 0 {
            return Err(DigestError::InvalidWindow {
                value: days.to_string(),
            });
        }
        Ok(Self(days))
    }

    /// Parses a window length from text, as supplied by legacy environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidWindow`] when the text is not a positive
    /// integer.
    pub fn parse(raw: &str) -> Result<Self, DigestError> {
        let trimmed = raw.trim();
        trimmed
            .parse::<u32>()
            .map_err(|_| DigestError::InvalidWindow {
                value: trimmed.to_owned(),
            })
            .and_then(Self::new)
    }

    /// Returns the number of days.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this window is long enough to need operator confirmation.
    #[must_use]
    pub const fn requires_confirmation(self) -> bool {
        self.0 > CONFIRMATION_THRESHOLD_DAYS
    }
}

impl Default for WindowDays {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_DAYS)
    }
}

/// Creation-date window for pull request retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl FetchWindow {
    /// Builds a window of `days` ending at `end`.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidWindow`] when the start would fall
    /// outside the representable date range.
    pub fn ending_at(end: DateTime<Utc>, days: WindowDays) -> Result<Self, DigestError> {
        let start = TimeDelta::try_days(i64::from(days.get()))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| DigestError::InvalidWindow {
                value: days.get().to_string(),
            })?;
        Ok(Self { start, end })
    }

    /// Builds a window of `days` ending now.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidWindow`] when the start would fall
    /// outside the representable date range.
    pub fn ending_now(days: WindowDays) -> Result<Self, DigestError> {
        Self::ending_at(Utc::now(), days)
    }

    /// Earliest creation time included in the window.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Invocation time the window was anchored at.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Start date formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn start_date(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn end_date(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// Whether a pull request created at `created_at` falls inside the window.
    #[must_use]
    pub fn contains(&self, created_at: DateTime<Utc>) -> bool {
        self.start <= created_at && created_at <= self.end
    }

    /// Search qualifier restricting results to this window.
    #[must_use]
    pub fn search_qualifier(&self) -> String {
        format!("created:>{}", self.start_date())
    }

    /// File name of the detailed CSV written by the fetch stage.
    #[must_use]
    pub fn detailed_csv_name(&self) -> String {
        format!("pr_{}_{}_detailed.csv", self.start_date(), self.end_date())
    }
}
