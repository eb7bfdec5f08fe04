//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `operation_mode`: Operation mode determination tests
//! - `field_resolution`: Legacy fallbacks and derived settings
//! - `validation`: Configuration consistency validation tests

mod field_resolution;
mod helpers;
