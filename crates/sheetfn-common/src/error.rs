//! Excel error values and the internal error signal used while evaluating.
//!
//! - **`ErrorEval`** : the fixed catalog of Excel error codes, carried as data
//! - **`EvalError`** : an `ErrorEval` plus an optional explanation, threaded
//!   through helpers with `?` and turned back into a value at the function edge
//! - **`ShapeError`**: construction-time problems with area dimensions
//!
//! `ErrorEval` is the thing a cell ends up holding. `EvalError` never leaves
//! a function's `dispatch`; it only exists so nested helpers that have no
//! `ValueEval` return slot can bail out early.

use std::fmt;

use thiserror::Error;

use crate::ValueEval;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// All recognised Excel error codes.
///
/// Names are CamelCase while `Display` renders them exactly as Excel shows
/// them (`#DIV/0!`, …). `code()` returns the BIFF error code that Excel
/// writes to disk.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorEval {
    /// `#NULL!` – intersection of two areas is empty.
    Null,
    /// `#DIV/0!`
    DivZero,
    /// `#VALUE!` – wrong argument type.
    ValueInvalid,
    /// `#REF!` – invalid cell reference.
    RefInvalid,
    /// `#NAME?` – unrecognised name or function.
    NameInvalid,
    /// `#NUM!` – invalid numeric result.
    NumError,
    /// `#N/A`
    Na,
    /// Internal only: the function is known but this form of it is not supported.
    FunctionNotImplemented,
}

impl ErrorEval {
    pub const ALL: [ErrorEval; 8] = [
        ErrorEval::Null,
        ErrorEval::DivZero,
        ErrorEval::ValueInvalid,
        ErrorEval::RefInvalid,
        ErrorEval::NameInvalid,
        ErrorEval::NumError,
        ErrorEval::Na,
        ErrorEval::FunctionNotImplemented,
    ];

    pub const fn code(self) -> i32 {
        match self {
            Self::Null => 0x00,
            Self::DivZero => 0x07,
            Self::ValueInvalid => 0x0F,
            Self::RefInvalid => 0x17,
            Self::NameInvalid => 0x1D,
            Self::NumError => 0x24,
            Self::Na => 0x2A,
            Self::FunctionNotImplemented => -30,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::Null => "#NULL!",
            Self::DivZero => "#DIV/0!",
            Self::ValueInvalid => "#VALUE!",
            Self::RefInvalid => "#REF!",
            Self::NameInvalid => "#NAME?",
            Self::NumError => "#NUM!",
            Self::Na => "#N/A",
            Self::FunctionNotImplemented => "~FUNCTION~NOT~IMPLEMENTED~",
        }
    }

    /// Parse an error literal such as `#N/A` (case-insensitive, surrounding
    /// whitespace ignored). Returns `None` for anything that is not one of
    /// the user-visible error literals.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "#NULL!" => Some(Self::Null),
            "#DIV/0!" => Some(Self::DivZero),
            "#VALUE!" => Some(Self::ValueInvalid),
            "#REF!" => Some(Self::RefInvalid),
            "#NAME?" => Some(Self::NameInvalid),
            "#NUM!" => Some(Self::NumError),
            "#N/A" => Some(Self::Na),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorEval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Internal short-circuit signal.
///
/// Helpers return `Result<_, EvalError>` and use `?`; `Function::dispatch`
/// converts the `Err` into `ValueEval::Error(kind)` before anything crosses
/// the public boundary. The message is for logs and tests only, Excel never
/// shows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvalError {
    pub kind: ErrorEval,
    pub message: Option<String>,
}

/* ───────────────────── Constructors & helpers ─────────────────────── */

impl From<ErrorEval> for EvalError {
    fn from(kind: ErrorEval) -> Self {
        Self {
            kind,
            message: None,
        }
    }
}

impl EvalError {
    pub fn new(kind: ErrorEval) -> Self {
        kind.into()
    }

    /// Attach a human-readable explanation.
    pub fn with_message<S: Into<String>>(mut self, msg: S) -> Self {
        self.message = Some(msg.into());
        self
    }

    pub fn value() -> Self {
        Self::new(ErrorEval::ValueInvalid)
    }

    pub fn num() -> Self {
        Self::new(ErrorEval::NumError)
    }

    pub fn na() -> Self {
        Self::new(ErrorEval::Na)
    }

    pub fn div_zero() -> Self {
        Self::new(ErrorEval::DivZero)
    }

    pub fn reference() -> Self {
        Self::new(ErrorEval::RefInvalid)
    }

    pub fn not_implemented() -> Self {
        Self::new(ErrorEval::FunctionNotImplemented)
    }
}

/* ───────────────────────── Display / Error ────────────────────────── */

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref msg) = self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<EvalError> for ValueEval {
    fn from(error: EvalError) -> Self {
        ValueEval::Error(error.kind)
    }
}

impl From<ErrorEval> for ValueEval {
    fn from(kind: ErrorEval) -> Self {
        ValueEval::Error(kind)
    }
}

impl PartialEq<ErrorEval> for EvalError {
    fn eq(&self, other: &ErrorEval) -> bool {
        self.kind == *other
    }
}

/// Rejected area construction or resizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("area bounds are inverted: rows {first_row}..={last_row}, cols {first_col}..={last_col}")]
    InvertedBounds {
        first_row: u32,
        last_row: u32,
        first_col: u32,
        last_col: u32,
    },
    #[error("a {height}x{width} area needs {expected} values, got {actual}")]
    ValueCount {
        height: usize,
        width: usize,
        expected: usize,
        actual: usize,
    },
    #[error("ragged rows: row {row} has {actual} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_biff() {
        assert_eq!(ErrorEval::Null.code(), 0);
        assert_eq!(ErrorEval::DivZero.code(), 7);
        assert_eq!(ErrorEval::ValueInvalid.code(), 15);
        assert_eq!(ErrorEval::RefInvalid.code(), 23);
        assert_eq!(ErrorEval::NameInvalid.code(), 29);
        assert_eq!(ErrorEval::NumError.code(), 36);
        assert_eq!(ErrorEval::Na.code(), 42);
    }

    #[test]
    fn code_and_text_round_trip() {
        for e in ErrorEval::ALL {
            assert_eq!(ErrorEval::from_code(e.code()), Some(e));
            if e != ErrorEval::FunctionNotImplemented {
                assert_eq!(ErrorEval::parse(e.text()), Some(e));
            }
        }
        assert_eq!(ErrorEval::from_code(99), None);
        assert_eq!(ErrorEval::parse(" #n/a "), Some(ErrorEval::Na));
        assert_eq!(ErrorEval::parse("#BOGUS!"), None);
    }

    #[test]
    fn display_includes_message() {
        let e = EvalError::num().with_message("no root");
        assert_eq!(e.to_string(), "#NUM!: no root");
        assert_eq!(EvalError::na().to_string(), "#N/A");
        assert_eq!(e, ErrorEval::NumError);
    }

    #[test]
    fn converts_to_error_value() {
        let v: ValueEval = EvalError::div_zero().into();
        assert_eq!(v, ValueEval::Error(ErrorEval::DivZero));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn error_kinds_serialize_by_name() {
        let json = serde_json::to_string(&ErrorEval::DivZero).unwrap();
        assert_eq!(json, "\"DivZero\"");
        let back: ErrorEval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorEval::DivZero);
    }
}
