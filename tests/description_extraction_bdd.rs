//! Behavioural tests for pull request body extraction and project
//! classification.

use std::collections::BTreeSet;

use prdigest::DigestError;
use prdigest::extract::{classify_project, extract_attachments, extract_description};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

#[derive(ScenarioState, Default)]
struct ExtractionState {
    body: Slot<String>,
    title: Slot<String>,
    description: Slot<String>,
    attachments: Slot<BTreeSet<String>>,
    project: Slot<String>,
}

#[fixture]
fn extraction_state() -> ExtractionState {
    ExtractionState::default()
}

/// Strips the surrounding quotes and expands `\n` escapes in step text.
fn unquote(raw: &str) -> String {
    raw.trim_matches('"').replace("\\n", "\n")
}

fn mismatch(message: String) -> DigestError {
    DigestError::Api { message }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a pull request body {body}")]
fn remember_body(extraction_state: &ExtractionState, body: String) {
    extraction_state.body.set(unquote(&body));
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a pull request titled {title}")]
fn remember_title(extraction_state: &ExtractionState, title: String) {
    extraction_state.title.set(unquote(&title));
}

#[when("the body is extracted")]
fn extract_body(extraction_state: &ExtractionState) -> Result<(), DigestError> {
    let body = extraction_state
        .body
        .get()
        .ok_or_else(|| mismatch("body not set".to_owned()))?;
    extraction_state.description.set(extract_description(&body));
    extraction_state.attachments.set(extract_attachments(&body));
    Ok(())
}

#[when("the title is classified")]
fn classify_title(extraction_state: &ExtractionState) -> Result<(), DigestError> {
    let title = extraction_state
        .title
        .get()
        .ok_or_else(|| mismatch("title not set".to_owned()))?;
    extraction_state.project.set(classify_project(&title));
    Ok(())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the description reads {expected}")]
fn assert_description(extraction_state: &ExtractionState, expected: String) -> Result<(), DigestError> {
    let expected_text = unquote(&expected);
    let actual = extraction_state
        .description
        .get()
        .ok_or_else(|| mismatch("description not extracted".to_owned()))?;
    if actual == expected_text {
        return Ok(());
    }
    Err(mismatch(format!("expected {expected_text:?}, got {actual:?}")))
}

#[then("{count:u64} attachments are found")]
fn assert_attachment_count(extraction_state: &ExtractionState, count: u64) -> Result<(), DigestError> {
    let actual = extraction_state
        .attachments
        .with_ref(|attachments| attachments.len() as u64)
        .ok_or_else(|| mismatch("attachments not extracted".to_owned()))?;
    if actual == count {
        return Ok(());
    }
    Err(mismatch(format!("expected {count} attachments, found {actual}")))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the attachments include {url}")]
fn assert_attachment(extraction_state: &ExtractionState, url: String) -> Result<(), DigestError> {
    let expected_url = unquote(&url);
    let found = extraction_state
        .attachments
        .with_ref(|attachments| attachments.contains(&expected_url))
        .unwrap_or(false);
    if found {
        return Ok(());
    }
    Err(mismatch(format!("missing attachment {expected_url}")))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the project is {expected}")]
fn assert_project(extraction_state: &ExtractionState, expected: String) -> Result<(), DigestError> {
    let expected_project = unquote(&expected);
    let actual = extraction_state
        .project
        .get()
        .ok_or_else(|| mismatch("title not classified".to_owned()))?;
    if actual == expected_project {
        return Ok(());
    }
    Err(mismatch(format!("expected project {expected_project}, got {actual}")))
}

#[scenario(path = "tests/features/description_extraction.feature", index = 0)]
fn description_and_test_plan_are_kept(extraction_state: ExtractionState) {
    let _ = extraction_state;
}

#[scenario(path = "tests/features/description_extraction.feature", index = 1)]
fn placeholder_sections_fall_back(extraction_state: ExtractionState) {
    let _ = extraction_state;
}

#[scenario(path = "tests/features/description_extraction.feature", index = 2)]
fn attachments_are_deduplicated(extraction_state: ExtractionState) {
    let _ = extraction_state;
}

#[scenario(path = "tests/features/description_extraction.feature", index = 3)]
fn ticket_titles_are_grouped(extraction_state: ExtractionState) {
    let _ = extraction_state;
}

#[scenario(path = "tests/features/description_extraction.feature", index = 4)]
fn untagged_titles_are_uncategorised(extraction_state: ExtractionState) {
    let _ = extraction_state;
}
