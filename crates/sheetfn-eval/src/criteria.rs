//! Criteria compilation for COUNTIF, SUMIF and friends.
//!
//! A criteria argument is compiled once per call into a [`CriteriaPredicate`]
//! and then tested against every candidate cell. Compilation dispatches on
//! the argument type:
//!
//! - `Number` / `Boolean` : exact, type-sensitive equality
//! - `Text`               : optional comparison operator prefix, then the
//!                          remainder is read as boolean, number, error
//!                          literal or plain text (in that order)
//! - `Blank`              : matches nothing
//! - `Error`              : propagates
//!
//! Plain-text operands containing `*` or `?` (or `~` escapes) become
//! anchored regexes; all other characters are escaped, so `a.b` only ever
//! matches the literal text `a.b`. Text comparison ignores case unless
//! [`EvalConfig::wildcard_case_insensitive`](crate::config::EvalConfig) is off.

use std::borrow::Cow;
use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use sheetfn_common::{ErrorEval, EvalError, ValueEval};

use crate::coercion::{parse_double, single_value};
use crate::config::EvalContext;

/// Anything that can decide whether one candidate cell qualifies.
///
/// Implementations must be pure so one predicate can be shared across
/// threads and reused for every cell in a range.
pub trait MatchPredicate: Send + Sync {
    fn matches(&self, candidate: &ValueEval) -> bool;
}

impl<F> MatchPredicate for F
where
    F: Fn(&ValueEval) -> bool + Send + Sync,
{
    fn matches(&self, candidate: &ValueEval) -> bool {
        self(candidate)
    }
}

/// Comparison operator prefix of a textual criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// No prefix; behaves like `=` except for the empty-text corner case.
    None,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// Split a leading operator off `s`.
    pub fn split(s: &str) -> (CmpOp, &str) {
        const OPS: [(&str, CmpOp); 6] = [
            ("<>", CmpOp::Ne),
            ("<=", CmpOp::Le),
            (">=", CmpOp::Ge),
            ("<", CmpOp::Lt),
            (">", CmpOp::Gt),
            ("=", CmpOp::Eq),
        ];
        for (prefix, op) in OPS {
            if let Some(rest) = s.strip_prefix(prefix) {
                return (op, rest);
            }
        }
        (CmpOp::None, s)
    }

    /// Apply the operator to `candidate.cmp(criteria)`.
    pub fn test(self, ord: Ordering) -> bool {
        match self {
            CmpOp::None | CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, CmpOp::None | CmpOp::Eq)
    }
}

/// Compiled criteria.
#[derive(Debug, Clone)]
pub enum CriteriaPredicate {
    Number {
        value: f64,
        op: CmpOp,
    },
    Boolean {
        value: bool,
        op: CmpOp,
    },
    Error {
        value: ErrorEval,
        op: CmpOp,
    },
    Text {
        value: String,
        /// `value` lowercased when comparisons ignore case.
        folded: String,
        fold_case: bool,
        op: CmpOp,
        pattern: Option<Regex>,
    },
    /// A blank criteria cell; nothing qualifies.
    Nothing,
}

impl CriteriaPredicate {
    /// Resolve a criteria argument (unwrapping references, intersecting
    /// areas with the formula cell) and compile it.
    pub fn compile(criteria: &ValueEval, ctx: &EvalContext) -> Result<Self, EvalError> {
        let scalar = single_value(criteria, ctx)?;
        let pred = Self::from_scalar(&scalar, ctx.config.wildcard_case_insensitive)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(criteria = %scalar, predicate = ?pred, "compiled criteria");
        Ok(pred)
    }

    /// Compile an already-resolved scalar.
    pub fn from_scalar(criteria: &ValueEval, case_insensitive: bool) -> Result<Self, EvalError> {
        match criteria {
            ValueEval::Number(n) => Ok(Self::Number {
                value: *n,
                op: CmpOp::None,
            }),
            ValueEval::Boolean(b) => Ok(Self::Boolean {
                value: *b,
                op: CmpOp::None,
            }),
            ValueEval::Text(s) => Self::from_text(s, case_insensitive),
            ValueEval::Blank => Ok(Self::Nothing),
            ValueEval::Error(e) => Err((*e).into()),
            ValueEval::Ref(r) => Self::from_scalar(r.inner_value(), case_insensitive),
            ValueEval::Area(_) => {
                Err(EvalError::value().with_message("criteria must be a single value"))
            }
        }
    }

    fn from_text(s: &str, case_insensitive: bool) -> Result<Self, EvalError> {
        let (op, operand) = CmpOp::split(s);
        if let Some(b) = parse_bool(operand) {
            return Ok(Self::Boolean { value: b, op });
        }
        if let Some(n) = parse_double(operand) {
            return Ok(Self::Number { value: n, op });
        }
        if let Some(e) = ErrorEval::parse(operand) {
            return Ok(Self::Error { value: e, op });
        }
        let pattern = match op {
            CmpOp::None | CmpOp::Eq | CmpOp::Ne => wildcard_regex(operand, case_insensitive)?,
            _ => None,
        };
        Ok(Self::Text {
            value: operand.to_string(),
            folded: fold(operand, case_insensitive).into_owned(),
            fold_case: case_insensitive,
            op,
            pattern,
        })
    }
}

impl MatchPredicate for CriteriaPredicate {
    fn matches(&self, candidate: &ValueEval) -> bool {
        let candidate = candidate.deref_ref();
        match self {
            Self::Nothing => false,
            Self::Number { value, op } => match candidate {
                ValueEval::Number(n) => n.partial_cmp(value).is_some_and(|o| op.test(o)),
                // Text that reads as a number only counts for equality; `<>`
                // accepts every text cell.
                ValueEval::Text(t) => match op {
                    CmpOp::Ne => true,
                    o if o.is_equality() => parse_double(t) == Some(*value),
                    _ => false,
                },
                _ => *op == CmpOp::Ne,
            },
            Self::Boolean { value, op } => match candidate {
                ValueEval::Boolean(b) => op.test(b.cmp(value)),
                _ => *op == CmpOp::Ne,
            },
            Self::Error { value, op } => match candidate {
                ValueEval::Error(e) => op.test(e.code().cmp(&value.code())),
                _ => *op == CmpOp::Ne,
            },
            Self::Text {
                value,
                folded,
                fold_case,
                op,
                pattern,
            } => match candidate {
                // '=' matches a blank cell but not empty text, '' matches both,
                // '<>' matches empty text but not a blank cell, '<>abc' matches blanks.
                ValueEval::Blank => match op {
                    CmpOp::None | CmpOp::Eq => value.is_empty(),
                    CmpOp::Ne => !value.is_empty(),
                    _ => false,
                },
                ValueEval::Text(t) => {
                    if t.is_empty() && value.is_empty() {
                        return matches!(op, CmpOp::None | CmpOp::Ne);
                    }
                    match pattern {
                        Some(re) => re.is_match(t) != (*op == CmpOp::Ne),
                        None => op.test(fold(t, *fold_case).as_ref().cmp(folded.as_str())),
                    }
                }
                _ => *op == CmpOp::Ne,
            },
        }
    }
}

fn fold(s: &str, case_insensitive: bool) -> Cow<'_, str> {
    if case_insensitive {
        Cow::Owned(s.to_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("TRUE") {
        Some(true)
    } else if s.eq_ignore_ascii_case("FALSE") {
        Some(false)
    } else {
        None
    }
}

/// Translate an Excel wildcard pattern into an anchored regex.
///
/// `*` is any run of characters, `?` exactly one, and `~` escapes a
/// following `*`, `?` or `~`. A lone `~` is literal. Returns `None` when the
/// pattern has neither wildcards nor escapes, so plain comparison applies.
pub fn wildcard_regex(pattern: &str, case_insensitive: bool) -> Result<Option<Regex>, EvalError> {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    let mut needs_regex = false;
    let mut chars = pattern.chars().peekable();
    let mut buf = [0u8; 4];
    while let Some(ch) = chars.next() {
        match ch {
            '*' => {
                needs_regex = true;
                re.push_str(".*");
            }
            '?' => {
                needs_regex = true;
                re.push('.');
            }
            '~' if matches!(chars.peek(), Some('*' | '?' | '~')) => {
                needs_regex = true;
                let lit = chars.next().unwrap_or('~');
                re.push_str(&regex::escape(lit.encode_utf8(&mut buf)));
            }
            other => re.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    re.push('$');
    if !needs_regex {
        return Ok(None);
    }
    RegexBuilder::new(&re)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(true)
        .build()
        .map(Some)
        .map_err(|e| EvalError::value().with_message(format!("bad criteria pattern: {e}")))
}
