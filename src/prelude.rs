//! Prelude module for convenient imports
//!
//! Brings the scanner, the expression constructors, and the predefined
//! grammar classes into scope with one wildcard import:
//!
//! ```
//! use runescan::prelude::*;
//!
//! let mut s = Scanner::new("some thing").unwrap();
//! assert!(s.x(&[lit("some"), ws(), node(2, lit("thing"))]));
//! ```

pub use crate::cursor::Cursor;
pub use crate::error::{MatchError, ScanError};
pub use crate::expr::{
    any, any_n, count, eod, func, lit, min, min0, min1, min_max, neg, node, one_of, opt, pos,
    range, rune, seq, ti, to, Expr, ScanFn,
};
pub use crate::pegn::{alnum, alpha, digit, end_line, graphic, hexdig, lower, upper, ws};
pub use crate::position::Position;
pub use crate::rune::Rune;
pub use crate::scanner::{state, Scanner, ScannerConfig};
pub use crate::tree::{Node, Tree, ROOT_TAG};
