//! Output helpers shared by the CLI operations.

use std::io::{self, Write};

use prdigest::DigestError;

/// Width of the `=` rule printed under banners.
pub const RULE_WIDTH: usize = 50;

/// Writes a `=` rule.
pub fn write_rule<W: Write>(writer: &mut W) -> Result<(), DigestError> {
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH)).map_err(|e| io_error(&e))
}

/// Maps a transcript write failure.
pub fn io_error(error: &io::Error) -> DigestError {
    DigestError::io("write output", error)
}
