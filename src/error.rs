//! Error types
//!
//! Two kinds of failure exist. [`ScanError`] covers construction problems
//! (empty input, invalid encoding, oversized input, I/O) and is returned
//! through `Result`. [`MatchError`] is a value pushed onto the scanner's
//! error stack when an expression fails to match; backtracking pops the
//! transient ones and the survivors explain why an overall match failed.

use crate::cursor::Cursor;
use crate::expr::Expr;
use std::fmt;

/// Failure to construct a scanner.
#[derive(Debug)]
pub enum ScanError {
    /// The input buffer was empty
    NoInput,

    /// The input was not valid UTF-8
    InvalidUtf8 {
        /// Byte offset up to which the input was valid
        valid_up_to: usize,
    },

    /// Input exceeds the configured maximum size
    InputTooLarge {
        /// Size of the input in bytes
        input_size: usize,
        /// Maximum allowed size
        max_size: usize,
    },

    /// Reading the input source failed
    Io(std::io::Error),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::NoInput => write!(f, "no input"),
            ScanError::InvalidUtf8 { valid_up_to } => {
                write!(f, "input is not valid UTF-8 past byte {}", valid_up_to)
            }
            ScanError::InputTooLarge {
                input_size,
                max_size,
            } => {
                write!(
                    f,
                    "input too large: {} bytes exceeds limit of {} bytes",
                    input_size, max_size
                )
            }
            ScanError::Io(err) => write!(f, "failed to read input: {}", err),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Io(err)
    }
}

/// A match failure recorded on the scanner's error stack.
///
/// Carries the rendered message, a copy of the cursor at the point of
/// failure, and the offending expression when one exists.
#[derive(Debug, Clone)]
pub struct MatchError {
    /// Rendered failure message, e.g. `expected 'x'`
    pub message: String,
    /// Cursor at the point of failure
    pub at: Cursor,
    /// The expression that failed, when the failure came from one
    pub context: Option<Expr>,
}

impl MatchError {
    /// Create a new match error.
    #[inline]
    pub fn new(message: impl Into<String>, at: Cursor, context: Option<Expr>) -> Self {
        Self {
            message: message.into(),
            at,
            context,
        }
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.at)
    }
}

impl std::error::Error for MatchError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::rune::Rune;

    #[test]
    fn test_scan_error_display() {
        assert_eq!(ScanError::NoInput.to_string(), "no input");

        let err = ScanError::InvalidUtf8 { valid_up_to: 3 };
        assert!(err.to_string().contains("past byte 3"));

        let err = ScanError::InputTooLarge {
            input_size: 2048,
            max_size: 1024,
        };
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));
    }

    #[test]
    fn test_scan_error_io_source() {
        let err = ScanError::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_match_error_display() {
        let at = Cursor {
            byte: 2,
            next: 3,
            rune: Rune::from('m'),
            len: 1,
            pos: Position {
                rune: Rune::from('m'),
                line: 1,
                line_rune: 3,
                line_byte: 3,
                buf_rune: 3,
                buf_byte: 3,
            },
        };
        let err = MatchError::new("expected '\\t'", at, None);
        assert_eq!(err.to_string(), "expected '\\t' at U+006D 'm' 1,3-3 (3-3)");
    }
}
