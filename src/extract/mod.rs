//! Heuristic text extraction from pull request titles and bodies.
//!
//! Every extractor here is total: malformed or unconventional input yields
//! the documented fallback value rather than an error.

pub mod attachments;
pub mod description;
pub mod project;

pub use attachments::{extract_attachments, join_attachments, split_attachments};
pub use description::{NO_DESCRIPTION, extract_description};
pub use project::{UNCATEGORIZED, classify_project, ticket_project};
