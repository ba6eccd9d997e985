//! Match expression language
//!
//! Expressions are immutable data values describing what to match; the
//! interpreter in [`crate::interp`] walks them against a scanner. Most
//! expressions advance the scan to the end of their match, and all of them
//! can be composed freely. Construct them with the free functions at the
//! bottom of this module (re-exported through the prelude) or with the
//! `From` conversions for bare `char` and string literals.
//!
//! ```
//! use runescan::prelude::*;
//!
//! let word = node(2, min1(node(3, range('a', 'z'))));
//! let ws = one_of([' '.into(), '\t'.into(), '\r'.into(), '\n'.into()]);
//! let line = seq([word.clone(), ws, word]);
//! ```

use crate::scanner::Scanner;
use std::fmt;

/// A user-supplied match hook.
///
/// Receives the scanner and returns success. The function may advance the
/// scan or mutate state freely; it is trusted to restore whatever it changed
/// when it fails.
pub type ScanFn = fn(&mut Scanner) -> bool;

/// One match expression.
///
/// The comment on each variant states its contract: whether it advances,
/// and what failure restores. Every variant restores the cursor (and any
/// parse tree growth) when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Match exactly this rune and advance one.
    Rune(char),

    /// Match any single rune and advance one. Fails only at end of data.
    Any,

    /// Match each rune of the string in order, backtracking atomically on
    /// mismatch.
    Str(String),

    /// All must match in order.
    Seq(Vec<Expr>),

    /// Ordered choice: first match wins.
    In(Vec<Expr>),

    /// Optional ordered choice: first match consumes; no match is fine.
    Opt(Vec<Expr>),

    /// Positive lookahead over a sequence. Never advances.
    Pos(Vec<Expr>),

    /// Negative lookahead: fails if *any* alternative matches. Never
    /// advances.
    Neg(Vec<Expr>),

    /// Advance until the inner expression matches, leaving the cursor *at*
    /// the match. Fails when the data runs out first.
    To(Box<Expr>),

    /// Advance until the inner expression matches, leaving the cursor
    /// *past* the match. Fails when the data runs out first.
    Ti(Box<Expr>),

    /// Match one rune in the inclusive range.
    Range(char, char),

    /// Advance up to `n` runes of anything. Always succeeds.
    AnyN(usize),

    /// Greedily match the inner expression at least `n` times.
    Min(usize, Box<Expr>),

    /// Greedily match the inner expression; succeed iff the count lands in
    /// the inclusive range. Matching is greedy, so overshooting the maximum
    /// is a failure.
    MinMax(usize, usize, Box<Expr>),

    /// Match the inner expression exactly `n` times.
    Count(usize, Box<Expr>),

    /// On success, append a node of the given type tag to the current
    /// parent: a leaf carrying the covered text, or an edge carrying the
    /// child nodes appended while the inner expression ran.
    Parse(u32, Box<Expr>),

    /// Opaque user function hook.
    Fn(ScanFn),

    /// Match only at end of data. Never advances.
    Eod,
}

impl Expr {
    /// True when a `Parse` variant occurs anywhere in this expression.
    /// Opaque user functions are not inspected.
    pub fn contains_parse(&self) -> bool {
        match self {
            Expr::Parse(..) => true,
            Expr::Seq(v) | Expr::In(v) | Expr::Opt(v) | Expr::Pos(v) | Expr::Neg(v) => {
                v.iter().any(Expr::contains_parse)
            }
            Expr::To(x) | Expr::Ti(x) => x.contains_parse(),
            Expr::Min(_, x) | Expr::Count(_, x) | Expr::MinMax(_, _, x) => x.contains_parse(),
            _ => false,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    for (i, x) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", x)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Rune(c) => write!(f, "{:?}", c),
            Expr::Any => write!(f, "<any>"),
            Expr::Str(s) => write!(f, "{:?}", s),
            Expr::Seq(v) => {
                f.write_str("(")?;
                write_list(f, v, " ")?;
                f.write_str(")")
            }
            Expr::In(v) => {
                f.write_str("{")?;
                write_list(f, v, ",")?;
                f.write_str("}")
            }
            Expr::Opt(v) => {
                f.write_str("opt{")?;
                write_list(f, v, ",")?;
                f.write_str("}")
            }
            Expr::Pos(v) => {
                f.write_str("&(")?;
                write_list(f, v, " ")?;
                f.write_str(")")
            }
            Expr::Neg(v) => {
                f.write_str("!(")?;
                write_list(f, v, " ")?;
                f.write_str(")")
            }
            Expr::To(x) => write!(f, "to({})", x),
            Expr::Ti(x) => write!(f, "ti({})", x),
            Expr::Range(lo, hi) => write!(f, "{:?}-{:?}", lo, hi),
            Expr::AnyN(n) => write!(f, "<any>{{{}}}", n),
            Expr::Min(n, x) => write!(f, "{}{{{},}}", x, n),
            Expr::MinMax(lo, hi, x) => write!(f, "{}{{{},{}}}", x, lo, hi),
            Expr::Count(n, x) => write!(f, "{}{{{}}}", x, n),
            Expr::Parse(tag, x) => write!(f, "node({},{})", tag, x),
            Expr::Fn(_) => write!(f, "<fn>"),
            Expr::Eod => write!(f, "<EOD>"),
        }
    }
}

impl From<char> for Expr {
    #[inline]
    fn from(c: char) -> Self {
        Expr::Rune(c)
    }
}

impl From<&str> for Expr {
    #[inline]
    fn from(s: &str) -> Self {
        Expr::Str(s.to_string())
    }
}

impl From<String> for Expr {
    #[inline]
    fn from(s: String) -> Self {
        Expr::Str(s)
    }
}

// ---------------------------------------------------------------------------
// Constructor functions
// ---------------------------------------------------------------------------

/// Match exactly this rune.
#[inline]
pub fn rune(c: char) -> Expr {
    Expr::Rune(c)
}

/// Match this literal string.
#[inline]
pub fn lit(s: impl Into<String>) -> Expr {
    Expr::Str(s.into())
}

/// Match all expressions in order.
#[inline]
pub fn seq(xs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Seq(xs.into_iter().collect())
}

/// Match the first alternative that succeeds; fail if none does.
#[inline]
pub fn one_of(xs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::In(xs.into_iter().collect())
}

/// Match the first alternative that succeeds; fine if none does.
#[inline]
pub fn opt(xs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Opt(xs.into_iter().collect())
}

/// Positive lookahead: succeed without consuming.
#[inline]
pub fn pos(xs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Pos(xs.into_iter().collect())
}

/// Negative lookahead: fail if any alternative matches.
#[inline]
pub fn neg(xs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Neg(xs.into_iter().collect())
}

/// Advance to the match, excluding it.
#[inline]
pub fn to(x: Expr) -> Expr {
    Expr::To(Box::new(x))
}

/// Advance to the match, including it.
#[inline]
pub fn ti(x: Expr) -> Expr {
    Expr::Ti(Box::new(x))
}

/// Match one rune in the inclusive range.
#[inline]
pub fn range(lo: char, hi: char) -> Expr {
    Expr::Range(lo, hi)
}

/// Match any single rune.
#[inline]
pub fn any() -> Expr {
    Expr::Any
}

/// Advance up to `n` runes of anything.
#[inline]
pub fn any_n(n: usize) -> Expr {
    Expr::AnyN(n)
}

/// Greedily match `x` at least `n` times.
#[inline]
pub fn min(n: usize, x: Expr) -> Expr {
    Expr::Min(n, Box::new(x))
}

/// Greedily match `x` any number of times. Shorthand for `min(0, x)`.
#[inline]
pub fn min0(x: Expr) -> Expr {
    min(0, x)
}

/// Greedily match `x` at least once. Shorthand for `min(1, x)`.
#[inline]
pub fn min1(x: Expr) -> Expr {
    min(1, x)
}

/// Greedily match `x` between `lo` and `hi` times inclusive.
#[inline]
pub fn min_max(lo: usize, hi: usize, x: Expr) -> Expr {
    Expr::MinMax(lo, hi, Box::new(x))
}

/// Match `x` exactly `n` times.
#[inline]
pub fn count(n: usize, x: Expr) -> Expr {
    Expr::Count(n, Box::new(x))
}

/// Capture the match of `x` as a parse tree node of type `tag`.
#[inline]
pub fn node(tag: u32, x: Expr) -> Expr {
    Expr::Parse(tag, Box::new(x))
}

/// Hook a user function into the expression.
#[inline]
pub fn func(f: ScanFn) -> Expr {
    Expr::Fn(f)
}

/// Match only at end of data.
#[inline]
pub fn eod() -> Expr {
    Expr::Eod
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_atoms() {
        assert_eq!(rune('a').to_string(), "'a'");
        assert_eq!(rune('\t').to_string(), "'\\t'");
        assert_eq!(lit("so").to_string(), "\"so\"");
        assert_eq!(range('a', 'z').to_string(), "'a'-'z'");
        assert_eq!(any().to_string(), "<any>");
        assert_eq!(eod().to_string(), "<EOD>");
    }

    #[test]
    fn test_display_sets() {
        let ws = one_of([' '.into(), '\t'.into(), '\r'.into(), '\n'.into()]);
        assert_eq!(ws.to_string(), "{' ','\\t','\\r','\\n'}");

        let s = seq(['s'.into(), "om".into()]);
        assert_eq!(s.to_string(), "('s' \"om\")");

        assert_eq!(neg(['z'.into()]).to_string(), "!('z')");
        assert_eq!(pos(['s'.into()]).to_string(), "&('s')");
    }

    #[test]
    fn test_display_parameterized() {
        assert_eq!(min(4, 's'.into()).to_string(), "'s'{4,}");
        assert_eq!(min_max(4, 6, 's'.into()).to_string(), "'s'{4,6}");
        assert_eq!(count(2, 'o'.into()).to_string(), "'o'{2}");
        assert_eq!(to('z'.into()).to_string(), "to('z')");
        assert_eq!(node(2, lit("so")).to_string(), "node(2,\"so\")");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Expr::from('x'), rune('x'));
        assert_eq!(Expr::from("abc"), lit("abc"));
        assert_eq!(Expr::from(String::from("abc")), lit("abc"));
    }

    #[test]
    fn test_contains_parse() {
        assert!(!lit("x").contains_parse());
        assert!(node(2, 'x'.into()).contains_parse());
        assert!(seq(['a'.into(), node(2, 'x'.into())]).contains_parse());
        assert!(min1(node(3, range('a', 'z'))).contains_parse());
        assert!(to(node(2, 'x'.into())).contains_parse());
        assert!(!pos(['a'.into()]).contains_parse());
        // opaque functions are not inspected
        fn hook(_: &mut crate::scanner::Scanner) -> bool {
            true
        }
        assert!(!func(hook).contains_parse());
    }
}
