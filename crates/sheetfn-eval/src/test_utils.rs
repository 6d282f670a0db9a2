#![cfg(test)]

//! Value builders and call helpers shared by unit tests.

use sheetfn_common::{AreaEval, ErrorEval, RefEval, ValueEval};

use crate::config::EvalContext;
use crate::function::Function;

pub fn num(n: f64) -> ValueEval {
    ValueEval::Number(n)
}

pub fn text(s: &str) -> ValueEval {
    ValueEval::text(s)
}

pub fn boolean(b: bool) -> ValueEval {
    ValueEval::Boolean(b)
}

pub fn err(e: ErrorEval) -> ValueEval {
    ValueEval::Error(e)
}

/// Area anchored at `(first_row, first_col)`, one inner vec per row.
pub fn area(first_row: u32, first_col: u32, rows: Vec<Vec<ValueEval>>) -> ValueEval {
    ValueEval::Area(AreaEval::from_rows(first_row, first_col, rows).expect("well-formed test area"))
}

/// Single column at A1 going down.
pub fn column(values: Vec<ValueEval>) -> ValueEval {
    area(0, 0, values.into_iter().map(|v| vec![v]).collect())
}

/// Area at A1 with `height` rows filled row-major from `values`.
pub fn grid(height: u32, width: u32, values: Vec<ValueEval>) -> ValueEval {
    ValueEval::Area(
        AreaEval::new(0, height - 1, 0, width - 1, values).expect("well-formed test grid"),
    )
}

pub fn nums(ns: &[f64]) -> Vec<ValueEval> {
    ns.iter().copied().map(num).collect()
}

pub fn cell(row: u32, col: u32, value: ValueEval) -> ValueEval {
    ValueEval::Ref(RefEval::new(row, col, value))
}

/// Dispatch with the formula cell at A1 and default config.
pub fn call(f: &dyn Function, args: &[ValueEval]) -> ValueEval {
    f.dispatch(args, &EvalContext::default())
}

pub fn call_at(f: &dyn Function, args: &[ValueEval], row: u32, col: u32) -> ValueEval {
    f.evaluate(args, row, col)
}

#[track_caller]
pub fn assert_num(v: ValueEval, expected: f64) {
    match v {
        ValueEval::Number(n) => assert!(
            (n - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {expected}, got {n}"
        ),
        other => panic!("expected number {expected}, got {other:?}"),
    }
}
