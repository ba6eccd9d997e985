//! Scanner cursor snapshots
//!
//! A [`Cursor`] is the scanner's complete positional state as a freely
//! copyable value. Copying one out is the sole *mark* mechanism: a snapshot
//! is logically independent of the scanner it came from and can be jumped
//! back to at any time.

use crate::position::Position;
use crate::rune::Rune;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the scanner's position in the buffer.
///
/// `byte` and `next` are 0-based byte offsets into the buffer; `next - byte`
/// equals `len` whenever a real rune is current (the pre-scan zero value and
/// the end-of-data state are the exceptions).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Byte offset of the start of the current rune (0-based)
    pub byte: usize,
    /// Byte offset of the start of the following rune (0-based)
    pub next: usize,
    /// The decoded current rune
    pub rune: Rune,
    /// Byte length of the current rune (1..=4)
    pub len: usize,
    /// Human-friendly position of the current rune
    pub pos: Position,
}

impl Cursor {
    /// True when the cursor points at the same rune boundary as `other`.
    /// Used by greedy loops to detect zero-width matches.
    #[inline]
    pub fn same_spot(&self, other: &Cursor) -> bool {
        self.byte == other.byte && self.next == other.next
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the EOD transition swaps the rune but leaves the position alone
        if self.rune.is_eod() {
            f.write_str("<EOD>")
        } else {
            self.pos.fmt(f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_is_independent() {
        let mut a = Cursor {
            byte: 3,
            next: 4,
            rune: Rune::from('x'),
            len: 1,
            pos: Position::start(),
        };
        let b = a;
        a.byte = 9;
        assert_eq!(b.byte, 3);
    }

    #[test]
    fn test_same_spot() {
        let a = Cursor {
            byte: 2,
            next: 3,
            ..Cursor::default()
        };
        let b = Cursor {
            byte: 2,
            next: 3,
            rune: Rune::EOD,
            ..Cursor::default()
        };
        assert!(a.same_spot(&b));
        let c = Cursor {
            byte: 2,
            next: 4,
            ..Cursor::default()
        };
        assert!(!a.same_spot(&c));
    }
}
