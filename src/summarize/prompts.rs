//! Prompt templates for per-record summaries and the pattern analysis.
//!
//! Templates use Jinja2 syntax and are rendered with `minijinja` with
//! auto-escaping disabled, since prompts are plain text.

use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;

use crate::error::DigestError;

/// System prompt shared by every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes GitHub pull requests concisely and accurately.";

const SUMMARY_TEMPLATE: &str = "\
Summarize this GitHub pull request in 1-2 concise sentences. Focus on what was changed and why.

Title: {{ title }}

Description: {{ description }}

Summary:";

const ANALYSIS_TEMPLATE: &str = "\
Analyze these GitHub PR summaries and provide a comprehensive development activity report:

PROJECT BREAKDOWN:
{% for group in groups %}• {{ group.project }}: {{ group.count }} PRs, {{ group.lines_changed }} lines changed
{% endfor %}
PR SUMMARIES BY PROJECT:
{% for item in summaries %}• [{{ item.project }}] {{ item.summary }}
{% endfor %}
Provide a detailed analysis covering:

1. **PROJECT FOCUS & IMPACT**
   - Which projects received the most attention and why
   - Relative impact based on lines changed and complexity
   - Project priorities and strategic focus areas

2. **TECHNICAL THEMES & PATTERNS**
   - Major technical initiatives (performance, security, infrastructure, features)
   - Architecture improvements and system optimizations
   - Testing and development workflow enhancements

3. **DEVELOPMENT VELOCITY & SCALE**
   - Distribution of effort across different types of work
   - Balance between feature development vs. bug fixes vs. maintenance
   - Code review and iteration patterns (based on PR descriptions)

4. **CROSS-PROJECT INSIGHTS**
   - Common technologies or approaches used across projects
   - Shared challenges or recurring themes
   - Dependencies or relationships between different projects

5. **KEY ACCOMPLISHMENTS & TRENDS**
   - Most significant changes or achievements
   - Quality improvements and technical debt reduction
   - Innovation or new capabilities introduced

Provide specific examples and quantify impact where possible. Focus on actionable insights for performance reviews and project planning.

Analysis:";

/// One line of the project breakdown.
#[derive(Debug, Clone, Serialize)]
pub(super) struct BreakdownLine<'a> {
    pub(super) project: &'a str,
    pub(super) count: usize,
    pub(super) lines_changed: u64,
}

/// One summary line, tagged with its project.
#[derive(Debug, Clone, Serialize)]
pub(super) struct SummaryLine<'a> {
    pub(super) project: String,
    pub(super) summary: &'a str,
}

/// Compiled prompt templates.
#[derive(Debug)]
pub(super) struct Prompts {
    env: Environment<'static>,
}

impl Prompts {
    /// Compiles the built-in templates.
    pub(super) fn new() -> Result<Self, DigestError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template("summary", SUMMARY_TEMPLATE)
            .map_err(|e| template_error("invalid summary prompt template", &e))?;
        env.add_template("analysis", ANALYSIS_TEMPLATE)
            .map_err(|e| template_error("invalid analysis prompt template", &e))?;
        Ok(Self { env })
    }

    /// Renders the per-record summary prompt.
    pub(super) fn summary(&self, title: &str, description: &str) -> Result<String, DigestError> {
        self.render(
            "summary",
            context! {
                title => title,
                description => description,
            },
        )
    }

    /// Renders the cross-record analysis prompt.
    pub(super) fn analysis(
        &self,
        groups: &[BreakdownLine<'_>],
        summaries: &[SummaryLine<'_>],
    ) -> Result<String, DigestError> {
        self.render(
            "analysis",
            context! {
                groups => groups,
                summaries => summaries,
            },
        )
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, DigestError> {
        let tmpl = self
            .env
            .get_template(name)
            .map_err(|e| template_error("failed to retrieve prompt template", &e))?;
        tmpl.render(ctx)
            .map_err(|e| template_error("prompt rendering failed", &e))
    }
}

fn template_error(context: &str, error: &minijinja::Error) -> DigestError {
    DigestError::Configuration {
        message: format!("{context}: {error}"),
    }
}
