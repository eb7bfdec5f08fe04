//! Interactive confirmation for very long fetch windows.

use std::io::{BufRead, Write};

use prdigest::DigestError;
use prdigest::window::{CONFIRMATION_THRESHOLD_DAYS, WindowDays};

use super::output::io_error;

/// Asks the operator to confirm a window longer than two years.
///
/// Only `y` (any case, surrounding whitespace ignored) continues.
///
/// # Errors
///
/// Returns [`DigestError::WindowNotConfirmed`] for any other answer,
/// including end of input.
pub fn confirm_long_window<R, W>(days: WindowDays, input: &mut R, out: &mut W) -> Result<(), DigestError>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        out,
        "Warning: Searching for more than {CONFIRMATION_THRESHOLD_DAYS} days (2 years) may take a very long time."
    )
    .map_err(|e| io_error(&e))?;
    write!(out, "Continue? (y/N): ").map_err(|e| io_error(&e))?;
    out.flush().map_err(|e| io_error(&e))?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|error| DigestError::io("read confirmation", &error))?;

    if answer.trim().eq_ignore_ascii_case("y") {
        Ok(())
    } else {
        Err(DigestError::WindowNotConfirmed { days: days.get() })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use prdigest::DigestError;
    use prdigest::window::WindowDays;
    use rstest::rstest;

    use super::confirm_long_window;

    #[rstest]
    #[case::lower("y\n")]
    #[case::upper("Y\n")]
    #[case::padded("  y  \n")]
    fn yes_continues(#[case] answer: &str) {
        let days = WindowDays::new(800).expect("valid window");
        let mut out = Vec::new();

        let result = confirm_long_window(days, &mut Cursor::new(answer), &mut out);

        assert!(result.is_ok(), "expected confirmation, got {result:?}");
        let prompt = String::from_utf8(out).expect("UTF-8 prompt");
        assert!(prompt.contains("more than 730 days"));
        assert!(prompt.ends_with("Continue? (y/N): "));
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("\n")]
    #[case::no("n\n")]
    #[case::yes_word("yes\n")]
    fn anything_else_aborts(#[case] answer: &str) {
        let days = WindowDays::new(800).expect("valid window");

        let result = confirm_long_window(days, &mut Cursor::new(answer), &mut Vec::new());

        assert_eq!(result, Err(DigestError::WindowNotConfirmed { days: 800 }));
    }
}
