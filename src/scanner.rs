//! Buffered rune scanner
//!
//! A [`Scanner`] owns a fully buffered, validated UTF-8 input and decodes
//! one rune at a time, tracking both byte offsets and a human-friendly
//! [`Position`](crate::position::Position). It is non-linear: any
//! [`Cursor`] copied out with [`mark`](Scanner::mark) can be jumped back to,
//! and a nestable [`snap`](Scanner::snap)/[`back`](Scanner::back) stack
//! provides coarse savepoints for user code. The expression interpreter in
//! [`crate::interp`] drives the scanner and grows its parse tree.
//!
//! A scanner is not safe for concurrent use; all operations run on one
//! thread.

use crate::cursor::Cursor;
use crate::error::{MatchError, ScanError};
use crate::expr::Expr;
use crate::rune::{self, Rune};
use crate::tree::{Node, Tree};
use std::fmt;
use std::io::Read;

/// Default maximum input size: 100 MB
pub const DEFAULT_MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

/// Default maximum interpreter recursion depth
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Scanner state bits.
///
/// Only end-of-data is defined by the scanner itself. Grammar authors may
/// use [`USER`](state::USER) and above for their own flags.
pub mod state {
    /// Set once the scanner has produced the EOD sentinel rune.
    pub const EOD: u32 = 1 << 1;

    /// First bit available for user-defined states.
    pub const USER: u32 = 1 << 10;
}

/// Configuration knobs for a scanner.
///
/// Use [`ScannerConfig::default()`] for sensible defaults, or customize
/// fields with the `with_*` methods:
///
/// ```
/// use runescan::scanner::ScannerConfig;
///
/// let config = ScannerConfig::default()
///     .with_max_input_size(10 * 1024 * 1024)
///     .with_max_depth(500);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScannerConfig {
    /// Maximum allowed input size in bytes (0 = unlimited)
    pub max_input_size: usize,

    /// Maximum allowed expression recursion depth (0 = unlimited)
    pub max_depth: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ScannerConfig {
    /// Set the maximum input size in bytes.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Set the maximum expression recursion depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Checkpoint of the parse tree state, taken at backtracking boundaries.
///
/// Captures the root *and* the stack of in-progress nodes so that failure
/// restores children appended to an unattached parent as well.
#[derive(Debug, Clone)]
pub(crate) struct TreeCheckpoint {
    root: Node,
    open: Vec<Node>,
}

/// Non-linear, rune-centric, buffered scanner with a built-in parse tree.
///
/// Created from a string, byte slice, or reader via [`Scanner::new`] /
/// [`Scanner::from_reader`]; construction buffers everything, validates the
/// encoding, and decodes the first rune so `cur()` is immediately usable.
pub struct Scanner {
    /// Validated UTF-8 input
    buf: String,

    /// Active cursor
    pub(crate) cur: Cursor,

    /// Cursor as it was just before the most recent scan
    pub(crate) last: Cursor,

    /// Savepoint stack for snap/back
    snapped: Vec<Cursor>,

    /// State bit-field; see [`state`]
    state: u32,

    /// Match error stack; the top entry dictates the string form
    errors: Vec<MatchError>,

    /// Parse tree grown by `Parse` expressions
    tree: Tree,

    /// Parse nodes currently open (in progress, not yet attached);
    /// the tree root is the implicit bottom of this stack
    open: Vec<Node>,

    /// Interpreter recursion depth, tracked against `config.max_depth`
    pub(crate) depth: usize,

    /// Emit a trace line per evaluated expression (needs the `logging`
    /// feature to go anywhere)
    pub(crate) trace: bool,

    config: ScannerConfig,
}

impl Scanner {
    /// Create a scanner from in-memory input (`&str`, `String`, `&[u8]`,
    /// `Vec<u8>`).
    ///
    /// # Errors
    /// Fails when the input is empty, exceeds the default size limit, or is
    /// not valid UTF-8.
    #[inline]
    pub fn new(input: impl Into<Vec<u8>>) -> Result<Self, ScanError> {
        Self::with_config(input, ScannerConfig::default())
    }

    /// Create a scanner with custom limits.
    pub fn with_config(input: impl Into<Vec<u8>>, config: ScannerConfig) -> Result<Self, ScanError> {
        Self::init(input.into(), config)
    }

    /// Create a scanner by reading a byte source to its end.
    ///
    /// # Errors
    /// Propagates read failures, then applies the same checks as
    /// [`Scanner::new`].
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ScanError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::init(buf, ScannerConfig::default())
    }

    fn init(bytes: Vec<u8>, config: ScannerConfig) -> Result<Self, ScanError> {
        if bytes.is_empty() {
            return Err(ScanError::NoInput);
        }
        if config.max_input_size > 0 && bytes.len() > config.max_input_size {
            return Err(ScanError::InputTooLarge {
                input_size: bytes.len(),
                max_size: config.max_input_size,
            });
        }
        let buf = String::from_utf8(bytes).map_err(|e| ScanError::InvalidUtf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
        })?;

        let (first, len) = rune::decode(buf.as_bytes(), 0);
        let mut cur = Cursor {
            byte: 0,
            next: len,
            rune: first,
            len,
            pos: crate::position::Position::start(),
        };
        cur.pos.rune = first;

        Ok(Self {
            buf,
            cur,
            last: cur,
            snapped: Vec::new(),
            state: 0,
            errors: Vec::new(),
            tree: Tree::new(),
            open: Vec::new(),
            depth: 0,
            trace: false,
            config,
        })
    }

    // ------------------------------------------------------------------
    // accessors
    // ------------------------------------------------------------------

    /// The buffered input.
    #[inline]
    pub fn buffer(&self) -> &str {
        &self.buf
    }

    /// Length of the buffered input in bytes.
    #[inline]
    pub fn buf_len(&self) -> usize {
        self.buf.len()
    }

    /// The active cursor.
    #[inline]
    pub fn cur(&self) -> &Cursor {
        &self.cur
    }

    /// The cursor as it was just before the most recent scan.
    #[inline]
    pub fn last(&self) -> &Cursor {
        &self.last
    }

    /// The parse tree grown so far.
    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Consume the scanner, keeping only its parse tree.
    #[inline]
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Current state bits.
    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Set state bits (user extensions start at [`state::USER`]).
    #[inline]
    pub fn set_state(&mut self, bits: u32) {
        self.state |= bits;
    }

    /// Clear state bits.
    #[inline]
    pub fn clear_state(&mut self, bits: u32) {
        self.state &= !bits;
    }

    /// True once the scanner has produced the EOD sentinel.
    #[inline]
    pub fn is_eod(&self) -> bool {
        self.state & state::EOD != 0
    }

    /// The configuration this scanner was created with.
    #[inline]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Emit a trace line per evaluated expression through the `log` crate
    /// (a no-op unless the `logging` feature is enabled).
    #[inline]
    pub fn set_trace(&mut self, on: bool) {
        self.trace = on;
    }

    // ------------------------------------------------------------------
    // scanning
    // ------------------------------------------------------------------

    /// Advance exactly one rune, saving the previous cursor into `last`.
    ///
    /// Returns false once the end of data is reached; at that point the
    /// current rune becomes [`Rune::EOD`] and further calls leave the
    /// cursor unchanged.
    pub fn scan(&mut self) -> bool {
        self.last = self.cur;
        if self.cur.next >= self.buf.len() {
            self.cur.rune = Rune::EOD;
            self.state |= state::EOD;
            return false;
        }
        let (r, len) = rune::decode(self.buf.as_bytes(), self.cur.next);
        self.cur.pos.line_byte += self.cur.len;
        self.cur.byte = self.cur.next;
        self.cur.next += len;
        self.cur.rune = r;
        self.cur.len = len;
        self.cur.pos.rune = r;
        self.cur.pos.buf_rune += 1;
        self.cur.pos.buf_byte = self.cur.byte + 1;
        self.cur.pos.line_rune += 1;
        true
    }

    /// Scan up to `n` runes, stopping early at end of data. True iff all
    /// `n` advanced.
    pub fn any_n(&mut self, n: usize) -> bool {
        for _ in 0..n {
            if !self.scan() {
                return false;
            }
        }
        true
    }

    /// Roll the position's line counters. The scanner never recognizes
    /// line terminators on its own; grammars call this (usually through a
    /// function expression) after matching one.
    #[inline]
    pub fn new_line(&mut self) {
        self.cur.pos.new_line();
    }

    // ------------------------------------------------------------------
    // savepoints
    // ------------------------------------------------------------------

    /// Copy out the current cursor as a bookmark.
    #[inline]
    pub fn mark(&self) -> Cursor {
        self.cur
    }

    /// Reposition the scanner at a previously marked cursor. The EOD state
    /// is re-derived from the restored cursor.
    #[inline]
    pub fn jump(&mut self, c: Cursor) {
        self.cur = c;
        if c.rune.is_eod() {
            self.state |= state::EOD;
        } else {
            self.state &= !state::EOD;
        }
    }

    /// Push the current cursor onto the savepoint stack.
    #[inline]
    pub fn snap(&mut self) {
        self.snapped.push(self.cur);
    }

    /// Pop the savepoint stack and jump to the popped cursor, if any.
    #[inline]
    pub fn back(&mut self) {
        if let Some(c) = self.snapped.pop() {
            self.jump(c);
        }
    }

    // ------------------------------------------------------------------
    // peeking
    // ------------------------------------------------------------------

    /// The next `n` runes starting at the current rune, without advancing.
    /// Stops at the end of the buffer, so the result may be shorter.
    pub fn peek(&self, n: usize) -> &str {
        let start = self.cur.byte.min(self.buf.len());
        let mut end = start;
        let bytes = self.buf.as_bytes();
        for _ in 0..n {
            if end >= bytes.len() {
                break;
            }
            end += rune::utf8_len(bytes[end]);
        }
        &self.buf[start..end]
    }

    /// The text between two marks: from the start of `a`'s rune through the
    /// end of `b`'s rune.
    pub fn peek_slice(&self, a: &Cursor, b: &Cursor) -> &str {
        let end = b.next.min(self.buf.len());
        let start = a.byte.min(end);
        &self.buf[start..end]
    }

    /// Order-insensitive peek between the current cursor and a mark.
    pub fn peek_to(&self, m: &Cursor) -> &str {
        if m.byte < self.cur.byte {
            self.peek_slice(m, &self.cur)
        } else {
            self.peek_slice(&self.cur, m)
        }
    }

    // ------------------------------------------------------------------
    // error stack
    // ------------------------------------------------------------------

    /// Push a match error at the current cursor.
    #[inline]
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(MatchError::new(message, self.cur, None));
    }

    /// Push a match error at the current cursor, recording the offending
    /// expression.
    #[inline]
    pub(crate) fn error_in(&mut self, message: impl Into<String>, context: &Expr) {
        self.errors
            .push(MatchError::new(message, self.cur, Some(context.clone())));
    }

    /// Pop and return the most recent match error, if any. The interpreter
    /// uses this to discard transient failures while probing alternatives.
    #[inline]
    pub fn clear_last_error(&mut self) -> Option<MatchError> {
        self.errors.pop()
    }

    /// The match errors still pending, oldest first.
    #[inline]
    pub fn errors(&self) -> &[MatchError] {
        &self.errors
    }

    /// True when at least one match error is pending.
    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    // ------------------------------------------------------------------
    // parse tree plumbing (interpreter only)
    // ------------------------------------------------------------------

    /// Snapshot the mutable tree state for backtracking.
    pub(crate) fn checkpoint(&self) -> TreeCheckpoint {
        TreeCheckpoint {
            root: self.tree.root.clone(),
            open: self.open.clone(),
        }
    }

    /// Restore a tree snapshot taken with [`Scanner::checkpoint`].
    pub(crate) fn restore(&mut self, cp: TreeCheckpoint) {
        self.tree.root = cp.root;
        self.open = cp.open;
    }

    /// Open a new in-progress parse node.
    pub(crate) fn open_node(&mut self, n: Node) {
        self.open.push(n);
    }

    /// Close the most recently opened parse node.
    pub(crate) fn close_node(&mut self) -> Option<Node> {
        self.open.pop()
    }

    /// Append a finished node to the current parent: the innermost open
    /// node, or the tree root when none is open.
    pub(crate) fn append_node(&mut self, n: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.append(n),
            None => self.tree.root.append(n),
        }
    }
}

impl fmt::Display for Scanner {
    /// The top pending error as `error: <message> at <cursor>`, or the
    /// cursor itself when the stack is clean. Rendering never pops.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.last() {
            Some(err) => write!(f, "error: {}", err),
            None => write!(f, "{}", self.cur),
        }
    }
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("cur", &self.cur)
            .field("state", &self.state)
            .field("errors", &self.errors.len())
            .field("buf_len", &self.buf.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scans_first_rune() {
        let s = Scanner::new("some thing").unwrap();
        assert_eq!(s.cur().rune, 's');
        assert_eq!(s.cur().byte, 0);
        assert_eq!(s.cur().next, 1);
        assert_eq!(s.to_string(), "U+0073 's' 1,1-1 (1-1)");
    }

    #[test]
    fn test_new_empty_fails() {
        assert!(matches!(Scanner::new(""), Err(ScanError::NoInput)));
    }

    #[test]
    fn test_new_invalid_utf8_fails() {
        let err = Scanner::new(vec![b'a', 0xFF, b'b']).unwrap_err();
        assert!(matches!(err, ScanError::InvalidUtf8 { valid_up_to: 1 }));
    }

    #[test]
    fn test_new_too_large_fails() {
        let config = ScannerConfig::default().with_max_input_size(4);
        let err = Scanner::with_config("hello", config).unwrap_err();
        assert!(matches!(
            err,
            ScanError::InputTooLarge {
                input_size: 5,
                max_size: 4
            }
        ));
    }

    #[test]
    fn test_from_reader() {
        let s = Scanner::from_reader("abc".as_bytes()).unwrap();
        assert_eq!(s.cur().rune, 'a');
        assert_eq!(s.buffer(), "abc");
    }

    #[test]
    fn test_scan_advances_position() {
        let mut s = Scanner::new("some thing").unwrap();
        assert!(s.scan());
        assert_eq!(s.to_string(), "U+006F 'o' 1,2-2 (2-2)");
        assert!(s.scan());
        assert_eq!(s.to_string(), "U+006D 'm' 1,3-3 (3-3)");
        assert_eq!(s.last().rune, 'o');
    }

    #[test]
    fn test_scan_multibyte_positions() {
        // U+1F47F is 4 bytes; line-byte and buf-byte offsets diverge from
        // the rune offsets past it
        let mut s = Scanner::new("👿ab").unwrap();
        assert_eq!(s.cur().len, 4);
        assert!(s.scan());
        assert_eq!(s.to_string(), "U+0061 'a' 1,2-5 (2-5)");
        assert!(s.scan());
        assert_eq!(s.to_string(), "U+0062 'b' 1,3-6 (3-6)");
    }

    #[test]
    fn test_scan_eod_idempotent() {
        let mut s = Scanner::new("ab").unwrap();
        assert!(s.scan()); // 'b'
        assert!(!s.scan()); // EOD
        assert!(s.is_eod());
        assert!(s.cur().rune.is_eod());
        let frozen = *s.cur();
        for _ in 0..5 {
            assert!(!s.scan());
            assert_eq!(*s.cur(), frozen);
            assert!(s.is_eod());
        }
        assert_eq!(s.to_string(), "<EOD>");
    }

    #[test]
    fn test_any_n() {
        let mut s = Scanner::new("some thing").unwrap();
        assert!(s.any_n(3));
        assert_eq!(s.cur().rune, 'e');
        let mut s = Scanner::new("ab").unwrap();
        assert!(!s.any_n(30));
        assert!(s.is_eod());
    }

    #[test]
    fn test_mark_jump_restores_everything() {
        let mut s = Scanner::new("some thing").unwrap();
        let m = s.mark();
        s.any_n(4);
        assert_eq!(s.cur().rune, ' ');
        s.jump(m);
        assert_eq!(s.cur().rune, 's');
        assert_eq!(s.to_string(), "U+0073 's' 1,1-1 (1-1)");
    }

    #[test]
    fn test_jump_clears_eod() {
        let mut s = Scanner::new("ab").unwrap();
        let m = s.mark();
        s.any_n(5);
        assert!(s.is_eod());
        s.jump(m);
        assert!(!s.is_eod());
        assert_eq!(s.cur().rune, 'a');
    }

    #[test]
    fn test_snap_back_nests() {
        let mut s = Scanner::new("abcdef").unwrap();
        s.snap(); // at 'a'
        s.any_n(2);
        s.snap(); // at 'c'
        s.any_n(2);
        assert_eq!(s.cur().rune, 'e');
        s.back();
        assert_eq!(s.cur().rune, 'c');
        s.back();
        assert_eq!(s.cur().rune, 'a');
        s.back(); // empty stack is a no-op
        assert_eq!(s.cur().rune, 'a');
    }

    #[test]
    fn test_peek() {
        let mut s = Scanner::new("some thing").unwrap();
        assert_eq!(s.peek(4), "some");
        assert_eq!(s.cur().rune, 's'); // did not advance
        s.any_n(5);
        assert_eq!(s.peek(100), "thing"); // clipped at end of buffer
    }

    #[test]
    fn test_peek_slice_and_peek_to() {
        let mut s = Scanner::new("some thing").unwrap();
        let a = s.mark();
        s.any_n(3);
        let b = s.mark();
        assert_eq!(s.peek_slice(&a, &b), "some");
        s.jump(a);
        s.any_n(5);
        assert_eq!(s.peek_to(&b), "e t"); // mark is behind the cursor...
        s.jump(b);
        let far = s.mark();
        s.jump(a);
        assert_eq!(s.peek_to(&far), "some");
    }

    #[test]
    fn test_new_line() {
        let mut s = Scanner::new("a\nbc").unwrap();
        s.any_n(2); // at 'b', line counters not yet rolled
        s.new_line();
        s.scan(); // 'c'
        assert_eq!(s.cur().pos.line, 2);
        assert_eq!(s.cur().pos.line_rune, 2);
        assert_eq!(s.cur().pos.buf_rune, 4);
    }

    #[test]
    fn test_error_stack_and_display() {
        let mut s = Scanner::new("one line\nand another").unwrap();
        s.error("sample error");
        assert_eq!(
            s.to_string(),
            "error: sample error at U+006F 'o' 1,1-1 (1-1)"
        );
        // rendering does not pop
        assert!(s.has_errors());
        let popped = s.clear_last_error().unwrap();
        assert_eq!(popped.message, "sample error");
        assert!(!s.has_errors());
        assert!(s.clear_last_error().is_none());
    }

    #[test]
    fn test_user_state_bits() {
        let mut s = Scanner::new("x").unwrap();
        let flag = state::USER << 1;
        s.set_state(flag);
        assert_ne!(s.state() & flag, 0);
        s.clear_state(flag);
        assert_eq!(s.state() & flag, 0);
    }
}
