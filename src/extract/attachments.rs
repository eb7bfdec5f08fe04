//! Extraction of linked and embedded URLs from pull request bodies.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[.*?\]\((https?://[^\s)]+)\)").expect("image pattern should compile")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[.*?\]\((https?://[^\s)]+)\)").expect("link pattern should compile")
});

/// Separator used when attachments are stored in a single CSV cell.
const SEPARATOR: &str = "; ";

/// Collects the `http`/`https` targets of Markdown images and links.
///
/// Duplicates are removed. Images also match the link pattern, so an image
/// URL is reported once.
///
/// # Example
///
/// ```
/// use prdigest::extract::extract_attachments;
///
/// let urls = extract_attachments("![shot](https://img.example/a.png) [docs](https://docs.example)");
/// assert_eq!(urls.len(), 2);
/// ```
#[must_use]
pub fn extract_attachments(body: &str) -> BTreeSet<String> {
    [&*IMAGE_PATTERN, &*LINK_PATTERN]
        .into_iter()
        .flat_map(|pattern| pattern.captures_iter(body))
        .filter_map(|captures| captures.get(1))
        .map(|url| url.as_str().to_owned())
        .collect()
}

/// Joins attachment URLs for storage in a single CSV cell.
#[must_use]
pub fn join_attachments(attachments: &BTreeSet<String>) -> String {
    attachments
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Splits a CSV cell produced by [`join_attachments`] back into a set.
#[must_use]
pub fn split_attachments(cell: &str) -> BTreeSet<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
