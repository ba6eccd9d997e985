//! Expression interpreter
//!
//! [`Scanner::x`] evaluates composed [`Expr`] trees against the scanner,
//! advancing on success and restoring the cursor and parse tree on failure.
//! Cursor restoration is a cheap value copy; tree restoration snapshots the
//! root and the open-node stack structurally at every boundary that can
//! both fail and grow the tree.
//!
//! Error hygiene: probing an alternative that fails pushes a transient
//! error which the enclosing construct pops again, so a failed top-level
//! match leaves exactly one new error on the stack: the reason the match
//! failed. The one exception is a bare user-function expression, which
//! never gets an automatic error; a failing hook leaves the stack as it
//! found it unless it pushed something itself. Sub-expressions are always
//! evaluated left to right; ordered choice depends on it.
//!
//! Evaluation recurses one level per nested expression. The scanner's
//! configured `max_depth` bounds it; grammars deeper than the bound fail
//! with a `max recursion depth` error instead of overflowing the stack.

use crate::expr::Expr;
use crate::rune::Rune;
use crate::scanner::Scanner;
use crate::tree::Node;

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

impl Scanner {
    /// Evaluate expressions against the scanner.
    ///
    /// More than one expression behaves as a sequence: all must match in
    /// order, and the cursor and tree are restored if any fails. The
    /// return value reports overall success; the error stack and the parse
    /// tree hold the details.
    ///
    /// ```
    /// use runescan::prelude::*;
    ///
    /// let mut s = Scanner::new("some thing").unwrap();
    /// assert!(s.x(&[node(2, lit("so")), node(2, lit("me"))]));
    /// assert_eq!(
    ///     s.tree().root.to_string(),
    ///     r#"{"T":1,"N":[{"T":2,"V":"so"},{"T":2,"V":"me"}]}"#,
    /// );
    /// ```
    pub fn x(&mut self, exprs: &[Expr]) -> bool {
        if exprs.len() == 1 {
            return self.eval(&exprs[0]);
        }
        let m = self.mark();
        let cp = self.checkpoint();
        for x in exprs {
            if !self.eval(x) {
                self.restore(cp);
                self.jump(m);
                return false;
            }
        }
        true
    }

    fn eval(&mut self, expr: &Expr) -> bool {
        if self.trace {
            log_debug!("eval {} at {}", expr, self.cur);
        }
        let max = self.config().max_depth;
        self.depth += 1;
        if max > 0 && self.depth > max {
            self.depth -= 1;
            self.error_in(format!("max recursion depth {} exceeded", max), expr);
            return false;
        }
        let ok = self.dispatch(expr);
        self.depth -= 1;
        ok
    }

    fn dispatch(&mut self, expr: &Expr) -> bool {
        match expr {
            Expr::Rune(c) => self.eval_rune(*c, expr),
            Expr::Any => self.eval_any(expr),
            Expr::Str(s) => self.eval_str(s, expr),
            Expr::Seq(v) => self.eval_seq(v),
            Expr::In(v) => self.eval_in(v, expr),
            Expr::Opt(v) => self.eval_opt(v),
            Expr::Pos(v) => self.eval_pos(v, expr),
            Expr::Neg(v) => self.eval_neg(v, expr),
            Expr::To(x) => self.eval_to(x, expr),
            Expr::Ti(x) => self.eval_ti(x, expr),
            Expr::Range(lo, hi) => self.eval_range(*lo, *hi, expr),
            Expr::AnyN(n) => {
                self.any_n(*n);
                true
            }
            Expr::Min(n, x) => self.eval_min(*n, x, expr),
            Expr::MinMax(lo, hi, x) => self.eval_min_max(*lo, *hi, x, expr),
            Expr::Count(n, x) => self.eval_count(*n, x, expr),
            Expr::Parse(tag, x) => self.eval_parse(*tag, x),
            Expr::Fn(f) => f(self),
            Expr::Eod => self.eval_eod(expr),
        }
    }

    fn eval_rune(&mut self, c: char, ctx: &Expr) -> bool {
        if self.cur.rune == c {
            self.scan();
            return true;
        }
        self.error_in(format!("expected {:?}", c), ctx);
        false
    }

    fn eval_any(&mut self, ctx: &Expr) -> bool {
        if self.is_eod() {
            self.error_in("expected any rune", ctx);
            return false;
        }
        self.scan();
        true
    }

    fn eval_str(&mut self, s: &str, ctx: &Expr) -> bool {
        // byte-compare fast path for ASCII literals
        if s.is_ascii() && !self.is_eod() {
            let start = self.cur.byte;
            let end = start + s.len();
            if end > self.buf_len() || &self.buffer().as_bytes()[start..end] != s.as_bytes() {
                self.error_in(format!("expected {:?}", s), ctx);
                return false;
            }
        }
        let m = self.mark();
        for c in s.chars() {
            if self.cur.rune != c {
                self.jump(m);
                self.error_in(format!("expected {:?}", s), ctx);
                return false;
            }
            self.scan();
        }
        true
    }

    fn eval_seq(&mut self, items: &[Expr]) -> bool {
        let m = self.mark();
        let cp = self.checkpoint();
        for x in items {
            if !self.eval(x) {
                // the failing item's error stands for the whole sequence
                self.restore(cp);
                self.jump(m);
                return false;
            }
        }
        true
    }

    fn eval_in(&mut self, items: &[Expr], ctx: &Expr) -> bool {
        let m = self.mark();
        let cp = self.checkpoint();
        for x in items {
            if self.eval(x) {
                return true;
            }
            self.clear_last_error();
            self.jump(m);
        }
        self.restore(cp);
        self.error_in(format!("expected one of {}", ctx), ctx);
        false
    }

    fn eval_opt(&mut self, items: &[Expr]) -> bool {
        let m = self.mark();
        for x in items {
            if self.eval(x) {
                return true;
            }
            self.clear_last_error();
            self.jump(m);
        }
        true
    }

    fn eval_pos(&mut self, items: &[Expr], ctx: &Expr) -> bool {
        if items.iter().any(Expr::contains_parse) {
            self.error_in("parse expression not allowed in lookahead", ctx);
            return false;
        }
        let m = self.mark();
        let ok = self.eval_seq(items);
        self.jump(m);
        ok
    }

    fn eval_neg(&mut self, items: &[Expr], ctx: &Expr) -> bool {
        if items.iter().any(Expr::contains_parse) {
            self.error_in("parse expression not allowed in lookahead", ctx);
            return false;
        }
        let m = self.mark();
        for x in items {
            if self.eval(x) {
                // error lands where the forbidden match left the cursor
                self.error_in(format!("unexpected {}", x), ctx);
                self.jump(m);
                return false;
            }
            self.clear_last_error();
        }
        self.jump(m);
        true
    }

    fn eval_to(&mut self, inner: &Expr, ctx: &Expr) -> bool {
        let m = self.mark();
        let cp = self.checkpoint();
        loop {
            let probe = self.mark();
            if self.eval(inner) {
                self.jump(probe);
                return true;
            }
            self.clear_last_error();
            if self.is_eod() {
                break;
            }
            self.scan();
        }
        self.restore(cp);
        self.jump(m);
        self.error_in(format!("{} not found", inner), ctx);
        false
    }

    fn eval_ti(&mut self, inner: &Expr, ctx: &Expr) -> bool {
        let m = self.mark();
        let cp = self.checkpoint();
        loop {
            if self.eval(inner) {
                return true;
            }
            self.clear_last_error();
            if self.is_eod() {
                break;
            }
            self.scan();
        }
        self.restore(cp);
        self.jump(m);
        self.error_in(format!("{} not found", inner), ctx);
        false
    }

    fn eval_range(&mut self, lo: char, hi: char, ctx: &Expr) -> bool {
        // the EOD sentinel is larger than any code point, so it can never
        // land in a range
        if self.cur.rune >= Rune::from(lo) && self.cur.rune <= Rune::from(hi) {
            self.scan();
            return true;
        }
        self.error_in(format!("expected {}", ctx), ctx);
        false
    }

    fn eval_min(&mut self, n: usize, inner: &Expr, ctx: &Expr) -> bool {
        let m = self.mark();
        let cp = self.checkpoint();
        let count = self.eval_greedy(inner);
        if count >= n {
            return true;
        }
        self.error_in(format!("expected at least {} of {}", n, inner), ctx);
        self.restore(cp);
        self.jump(m);
        false
    }

    fn eval_min_max(&mut self, lo: usize, hi: usize, inner: &Expr, ctx: &Expr) -> bool {
        let m = self.mark();
        let cp = self.checkpoint();
        let count = self.eval_greedy(inner);
        if lo <= count && count <= hi {
            return true;
        }
        self.error_in(format!("expected {}-{} of {}", lo, hi, inner), ctx);
        self.restore(cp);
        self.jump(m);
        false
    }

    /// Match `inner` as many times as it will succeed, stopping at end of
    /// data. A success that does not advance the cursor is counted once and
    /// ends the loop; greedy repetition must terminate on zero-width
    /// matches.
    fn eval_greedy(&mut self, inner: &Expr) -> usize {
        let mut count = 0;
        while !self.is_eod() {
            let probe = self.mark();
            if !self.eval(inner) {
                self.clear_last_error();
                break;
            }
            count += 1;
            if self.cur.same_spot(&probe) {
                break;
            }
        }
        count
    }

    fn eval_count(&mut self, n: usize, inner: &Expr, ctx: &Expr) -> bool {
        let m = self.mark();
        let cp = self.checkpoint();
        for _ in 0..n {
            if !self.eval(inner) {
                self.clear_last_error();
                self.restore(cp);
                self.jump(m);
                self.error_in(format!("expected {} of {}", n, inner), ctx);
                return false;
            }
        }
        true
    }

    fn eval_parse(&mut self, tag: u32, inner: &Expr) -> bool {
        let m = self.mark();
        self.open_node(Node::new(tag));
        if !self.eval(inner) {
            self.close_node();
            self.jump(m);
            return false;
        }
        let Some(mut n) = self.close_node() else {
            return false;
        };
        if !self.cur.same_spot(&m) {
            let last = self.last;
            n.value = self.peek_slice(&m, &last).to_string();
        }
        self.append_node(n);
        true
    }

    fn eval_eod(&mut self, ctx: &Expr) -> bool {
        if self.is_eod() {
            return true;
        }
        self.error_in("expected end of data", ctx);
        false
    }
}
