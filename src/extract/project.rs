//! Project classification from `[TICKET] Project: summary` titles.

use std::sync::LazyLock;

use regex::Regex;

/// Label used when a title does not follow the ticket convention.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static TICKET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\s*([^:]+):").expect("ticket pattern should compile")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static LOOSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\][^:]*?([A-Za-z][A-Za-z\s]+?):").expect("loose pattern should compile")
});

/// Derives a project label from a pull request title.
///
/// Titles of the form `[CS-6304] Roles: add admin check` yield `Roles`. When
/// the title does not start with a bracketed ticket, a looser search for a
/// letter-led word run ending in `:` somewhere after a `]` is attempted.
/// Everything else is [`UNCATEGORIZED`].
///
/// # Example
///
/// ```
/// use prdigest::extract::classify_project;
///
/// assert_eq!(classify_project("[CS-6304] Roles: add admin check"), "Roles");
/// assert_eq!(classify_project("Fix typo"), "Uncategorized");
/// ```
#[must_use]
pub fn classify_project(title: &str) -> String {
    ticket_match(title)
        .or_else(|| capture_trimmed(&LOOSE_PATTERN, title, 1))
        .unwrap_or_else(|| UNCATEGORIZED.to_owned())
}

/// Derives a project label using the strict ticket convention only.
///
/// Used where the looser heuristic would be misleading, such as the
/// per-pull-request entries of the Markdown report.
#[must_use]
pub fn ticket_project(title: &str) -> String {
    ticket_match(title).unwrap_or_else(|| UNCATEGORIZED.to_owned())
}

fn ticket_match(title: &str) -> Option<String> {
    capture_trimmed(&TICKET_PATTERN, title, 2)
}

fn capture_trimmed(pattern: &Regex, title: &str, group: usize) -> Option<String> {
    pattern
        .captures(title)
        .and_then(|captures| captures.get(group))
        .map(|capture| capture.as_str().trim().to_owned())
}
