//! Predefined grammar classes
//!
//! Ready-made expressions for the character classes grammars reach for
//! constantly. Each function returns a fresh [`Expr`] value to compose into
//! larger grammars; [`graphic`] doubles as the reference example of a
//! user-function expression.

use crate::expr::{self, Expr};
use crate::scanner::Scanner;

/// One whitespace rune: space, tab, carriage return, or newline.
pub fn ws() -> Expr {
    expr::one_of([' '.into(), '\t'.into(), '\r'.into(), '\n'.into()])
}

/// One line ending: LF, CRLF, or bare CR (in that order of preference).
pub fn end_line() -> Expr {
    expr::one_of(['\n'.into(), "\r\n".into(), '\r'.into()])
}

/// One ASCII digit.
pub fn digit() -> Expr {
    expr::range('0', '9')
}

/// One lowercase ASCII letter.
pub fn lower() -> Expr {
    expr::range('a', 'z')
}

/// One uppercase ASCII letter.
pub fn upper() -> Expr {
    expr::range('A', 'Z')
}

/// One ASCII letter.
pub fn alpha() -> Expr {
    expr::one_of([lower(), upper()])
}

/// One ASCII letter or digit.
pub fn alnum() -> Expr {
    expr::one_of([alpha(), digit()])
}

/// One hexadecimal digit.
pub fn hexdig() -> Expr {
    expr::one_of([digit(), expr::range('a', 'f'), expr::range('A', 'F')])
}

/// One graphic rune of any script: letters, marks, numbers, punctuation,
/// symbols, and spaces.
pub fn graphic() -> Expr {
    expr::func(is_graphic)
}

fn is_graphic(s: &mut Scanner) -> bool {
    match s.cur().rune.to_char() {
        Some(c) if graphic_char(c) => {
            s.scan();
            true
        }
        _ => false,
    }
}

/// Graphic means general categories L, M, N, P, S, and Zs. Everything else
/// is rejected: controls (Cc), format runes (Cf), line and paragraph
/// separators (Zl, Zp), private use (Co), and the permanently unassigned
/// noncharacters. Surrogates (Cs) cannot occur in a `char`. Assignedness
/// beyond the noncharacters would need full Unicode tables, which this
/// crate does not carry.
fn graphic_char(c: char) -> bool {
    !(c.is_control()
        || is_format(c)
        || matches!(c, '\u{2028}' | '\u{2029}')
        || is_private_use(c)
        || is_noncharacter(c))
}

// category Cf
fn is_format(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

// category Co
fn is_private_use(c: char) -> bool {
    matches!(
        c,
        '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}'
    )
}

// U+FDD0..U+FDEF plus the last two code points of every plane
fn is_noncharacter(c: char) -> bool {
    matches!(c, '\u{FDD0}'..='\u{FDEF}') || (c as u32 & 0xFFFE) == 0xFFFE
}
