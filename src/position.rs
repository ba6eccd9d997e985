//! Human-friendly buffer positions
//!
//! A [`Position`] locates a rune within the buffered text the way a person
//! would describe it: line, column (in runes and in bytes), and overall
//! offsets. All counters are 1-based; zero only appears in the pre-scan
//! default value.

use crate::rune::Rune;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unicode-aware position within the scanned buffer.
///
/// Rendered as `U+XXXX 'r' L,LR-LB (BR-BB)`:
///
/// ```text
///   U+1F47F '👿' 1,3-5 (3-5)
///                | | |  | |
///             line | |  | overall byte offset
///   line rune offset |  overall rune offset
///     line byte offset
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Rune at this location
    pub rune: Rune,
    /// Line number (1-based)
    pub line: usize,
    /// Rune offset within the line (1-based)
    pub line_rune: usize,
    /// Byte offset within the line (1-based)
    pub line_byte: usize,
    /// Rune offset within the buffer (1-based)
    pub buf_rune: usize,
    /// Byte offset within the buffer (1-based)
    pub buf_byte: usize,
}

impl Position {
    /// Position of the first rune in a buffer.
    #[inline]
    pub fn start() -> Self {
        Self {
            rune: Rune::default(),
            line: 1,
            line_rune: 1,
            line_byte: 1,
            buf_rune: 1,
            buf_byte: 1,
        }
    }

    /// Roll the line counters for a new line. The buffer-wide counters
    /// carry on; recognizing the terminator itself is the grammar's job.
    #[inline]
    pub fn new_line(&mut self) {
        self.line += 1;
        self.line_rune = 1;
        self.line_byte = 1;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rune.to_char() {
            Some(c) if !self.rune.is_eod() => write!(
                f,
                "U+{:04X} {:?} {},{}-{} ({}-{})",
                self.rune.value(),
                c,
                self.line,
                self.line_rune,
                self.line_byte,
                self.buf_rune,
                self.buf_byte,
            ),
            _ => write!(f, "<EOD>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start() {
        let p = Position::start();
        assert_eq!(p.line, 1);
        assert_eq!(p.line_rune, 1);
        assert_eq!(p.line_byte, 1);
        assert_eq!(p.buf_rune, 1);
        assert_eq!(p.buf_byte, 1);
    }

    #[test]
    fn test_default_is_pre_scan_zero() {
        let p = Position::default();
        assert_eq!(p.line, 0);
        assert_eq!(p.buf_byte, 0);
    }

    #[test]
    fn test_new_line() {
        let mut p = Position::start();
        p.line_rune = 5;
        p.line_byte = 7;
        p.buf_rune = 5;
        p.new_line();
        assert_eq!(p.line, 2);
        assert_eq!(p.line_rune, 1);
        assert_eq!(p.line_byte, 1);
        assert_eq!(p.buf_rune, 5); // untouched
    }

    #[test]
    fn test_display() {
        let p = Position {
            rune: Rune::from('n'),
            line: 1,
            line_rune: 2,
            line_byte: 2,
            buf_rune: 2,
            buf_byte: 2,
        };
        assert_eq!(p.to_string(), "U+006E 'n' 1,2-2 (2-2)");
    }

    #[test]
    fn test_display_eod() {
        let p = Position {
            rune: Rune::EOD,
            ..Position::start()
        };
        assert_eq!(p.to_string(), "<EOD>");
    }
}
