//! Extraction of the meaningful sections of a pull request body.
//!
//! Pull request templates typically carry a `## Description` and a
//! `## Test Plan` section followed by checklists and HTML comments. Only the
//! two named sections are kept; scanning stops at the first checklist heading
//! or HTML comment.

/// Text returned when neither section carries meaningful content.
pub const NO_DESCRIPTION: &str = "No meaningful description available";

const DESCRIPTION_HEADING: &str = "## Description";
const TEST_PLAN_HEADING: &str = "## Test Plan";
const PLACEHOLDERS: &[&str] = &["", "todo", "tbd", "n/a"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Description,
    TestPlan,
}

/// Returns the `Description` and `Test Plan` sections of a pull request body.
///
/// Sections are rendered as `Description: <text>` and `Test Plan: <text>`
/// separated by a blank line. Sections that are empty or contain only a
/// placeholder (`todo`, `tbd`, `n/a`) are omitted. When nothing remains the
/// result is [`NO_DESCRIPTION`].
///
/// # Example
///
/// ```
/// use prdigest::extract::extract_description;
///
/// let body = "## Description\nFixes bug\n\n## Checklist\n- [ ] tests";
/// assert_eq!(extract_description(body), "Description: Fixes bug");
/// ```
#[must_use]
pub fn extract_description(body: &str) -> String {
    let mut section = Section::Preamble;
    let mut description: Vec<&str> = Vec::new();
    let mut test_plan: Vec<&str> = Vec::new();

    for line in body.lines() {
        let stripped = line.trim();

        if stripped == DESCRIPTION_HEADING {
            section = Section::Description;
            continue;
        }
        if stripped == TEST_PLAN_HEADING {
            section = Section::TestPlan;
            continue;
        }
        if is_boilerplate_boundary(stripped) {
            break;
        }

        match section {
            Section::Description => description.push(line),
            Section::TestPlan => test_plan.push(line),
            Section::Preamble => {}
        }
    }

    let parts: Vec<String> = [("Description", description), ("Test Plan", test_plan)]
        .into_iter()
        .filter_map(|(label, lines)| meaningful_text(&lines).map(|text| format!("{label}: {text}")))
        .collect();

    if parts.is_empty() {
        NO_DESCRIPTION.to_owned()
    } else {
        parts.join("\n\n")
    }
}

/// Checklist headings and HTML comments mark the start of template
/// boilerplate.
fn is_boilerplate_boundary(stripped: &str) -> bool {
    let checklist_heading =
        stripped.starts_with("##") && stripped.to_lowercase().contains("checklist");
    checklist_heading || stripped.starts_with("<!--")
}

fn meaningful_text(lines: &[&str]) -> Option<String> {
    let joined = lines.join("\n");
    let text = joined.trim();
    let lowered = text.to_lowercase();

    if PLACEHOLDERS.contains(&lowered.as_str()) {
        None
    } else {
        Some(text.to_owned())
    }
}

#[cfg(test)]
#[path = "description_tests.rs"]
mod tests;
