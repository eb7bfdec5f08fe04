//! CLI operation mode handlers.
//!
//! This module contains the implementations for the operation modes:
//! - [`workflow`]: Fetch, then summarise the fetched CSV
//! - [`fetch`]: Fetch pull requests into a detailed CSV
//! - [`summarize`]: Summarise an existing CSV
//!
//! The long-window prompt lives in [`confirm`] and shared transcript
//! helpers in [`output`].

pub mod confirm;
pub mod fetch;
pub mod output;
pub mod summarize;
pub mod workflow;

#[cfg(test)]
pub mod test_utils;
