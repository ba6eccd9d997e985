//! Runescan - Rune-Centric Backtracking Scanner and Parse Tree Builder
//!
//! A non-linear, rune-centric, buffered scanner with a built-in expression
//! interpreter and node-tree parser, designed for rapid development of
//! PEG-style grammars and domain-specific languages. Grammars are plain
//! data (composable [`Expr`] values) and the methods can be written
//! by hand or generated from PEGN, PEG, ABNF, EBNF and similar meta
//! languages.
//!
//! The crate provides:
//! - A buffered scanner decoding one Unicode code point at a time, with
//!   byte offsets and human-friendly line/column positions
//! - Cheap cursor snapshots (`mark`/`jump`) and a savepoint stack
//!   (`snap`/`back`) for non-linear scanning
//! - A backtracking interpreter over sequence, choice, repetition,
//!   lookahead, range, bounded search, parse-node and user-function
//!   expressions
//! - A typed parse tree with compact, order-stable JSON serialization
//! - A structured error stack explaining why a match failed
//!
//! ## Quick Start
//!
//! ```rust
//! use runescan::prelude::*;
//!
//! let ch = node(3, range('a', 'z'));
//! let word = node(2, min1(ch));
//!
//! let mut s = Scanner::new("go me").unwrap();
//! assert!(s.x(&[word.clone(), ws(), word]));
//! assert_eq!(
//!     s.tree().root.to_string(),
//!     concat!(
//!         r#"{"T":1,"N":[{"T":2,"N":[{"T":3,"V":"g"},{"T":3,"V":"o"}]},"#,
//!         r#"{"T":2,"N":[{"T":3,"V":"m"},{"T":3,"V":"e"}]}]}"#,
//!     ),
//! );
//! ```
//!
//! On failure the scanner's error stack says what went wrong and where:
//!
//! ```rust
//! use runescan::prelude::*;
//!
//! let mut s = Scanner::new("some thing").unwrap();
//! assert!(!s.x(&[lit("so"), '\t'.into()]));
//! assert_eq!(
//!     s.to_string(),
//!     "error: expected '\\t' at U+006D 'm' 1,3-3 (3-3)",
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Emit interpreter trace lines through the `log` crate
//!   (see [`Scanner::set_trace`])

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod error;
pub mod expr;
pub mod interp;
pub mod pegn;
pub mod position;
pub mod prelude;
pub mod rune;
pub mod scanner;
pub mod tree;

/// Re-export commonly used types for convenience
pub use cursor::Cursor;
pub use error::{MatchError, ScanError};
pub use expr::{Expr, ScanFn};
pub use position::Position;
pub use rune::Rune;
pub use scanner::{Scanner, ScannerConfig};
pub use tree::{Node, Tree};
