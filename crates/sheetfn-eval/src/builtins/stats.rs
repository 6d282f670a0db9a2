//! Numeric aggregates over ranges and argument lists.
//!
//! Every function here reads its inputs through
//! [`collect_numbers`](super::utils::collect_numbers): numbers inside ranges
//! count, text and booleans inside ranges are skipped, and direct arguments
//! are coerced. The XY family (`SUMX2MY2` and friends) pairs two equally
//! sized inputs instead.

use super::utils::{DirectArgs, cell_count, cells, collect_numbers};
use crate::coercion::{check_value, number_arg};
use crate::config::EvalContext;
use crate::function::Function;
use crate::numeric::stats;
use sheetfn_common::{EvalError, ValueEval};

fn numbers(args: &[ValueEval]) -> Result<Vec<f64>, EvalError> {
    collect_numbers(args, DirectArgs::Coerce)
}

/// Map a kernel's `NaN` "not enough data" outcome onto a specific error.
fn or_error(n: f64, err: fn() -> EvalError) -> Result<ValueEval, EvalError> {
    if n.is_nan() {
        Err(err())
    } else {
        Ok(ValueEval::Number(check_value(n)?))
    }
}

/* ─────────────────────────── SUM() ──────────────────────────── */

#[derive(Debug)]
pub struct SumFn;

impl Function for SumFn {
    func_caps!(PURE, REDUCTION, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "SUM"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn variadic(&self) -> bool {
        true
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        Ok(ValueEval::Number(stats::sum(&numbers(args)?)))
    }
}

/* ─────────────────────────── AVERAGE() ──────────────────────────── */

#[derive(Debug)]
pub struct AverageFn;

impl Function for AverageFn {
    func_caps!(PURE, REDUCTION, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "AVERAGE"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn variadic(&self) -> bool {
        true
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        or_error(stats::average(&numbers(args)?), EvalError::div_zero)
    }
}

/* ─────────────────────────── MIN() / MAX() ──────────────────────────── */

/// Smallest number; 0 when there are none.
#[derive(Debug)]
pub struct MinFn;

impl Function for MinFn {
    func_caps!(PURE, REDUCTION, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "MIN"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn variadic(&self) -> bool {
        true
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let v = numbers(args)?;
        Ok(ValueEval::Number(if v.is_empty() { 0.0 } else { stats::min(&v) }))
    }
}

/// Largest number; 0 when there are none.
#[derive(Debug)]
pub struct MaxFn;

impl Function for MaxFn {
    func_caps!(PURE, REDUCTION, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "MAX"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn variadic(&self) -> bool {
        true
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let v = numbers(args)?;
        Ok(ValueEval::Number(if v.is_empty() { 0.0 } else { stats::max(&v) }))
    }
}

/* ─────────────────────────── LARGE() / SMALL() ──────────────────────────── */

/// `k` rounds up, so LARGE(v, 1.2) asks for the 2nd largest. `k < 1` and
/// `k` beyond the data are `#NUM!`.
fn eval_kth(
    args: &[ValueEval],
    ctx: &EvalContext,
    kernel: fn(&[f64], usize) -> f64,
) -> Result<ValueEval, EvalError> {
    let v = numbers(&args[..1])?;
    let k = number_arg(&args[1], ctx)?;
    if k < 1.0 {
        return Err(EvalError::num().with_message(format!("k must be at least 1, got {k}")));
    }
    let k = k.ceil().min(usize::MAX as f64) as usize;
    or_error(kernel(&v, k), EvalError::num)
}

#[derive(Debug)]
pub struct LargeFn;

impl Function for LargeFn {
    func_caps!(PURE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "LARGE"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        eval_kth(args, ctx, stats::kth_largest)
    }
}

#[derive(Debug)]
pub struct SmallFn;

impl Function for SmallFn {
    func_caps!(PURE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "SMALL"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        eval_kth(args, ctx, stats::kth_smallest)
    }
}

/* ─────────────────────────── MEDIAN() / MODE() ──────────────────────────── */

#[derive(Debug)]
pub struct MedianFn;

impl Function for MedianFn {
    func_caps!(PURE, REDUCTION, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "MEDIAN"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn variadic(&self) -> bool {
        true
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        or_error(stats::median(&numbers(args)?), EvalError::num)
    }
}

/// Most frequent number, `#N/A` when nothing repeats. Unlike the other
/// aggregates, a direct text or boolean argument is `#VALUE!`.
#[derive(Debug)]
pub struct ModeFn;

impl Function for ModeFn {
    func_caps!(PURE, REDUCTION, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "MODE"
    }
    fn aliases(&self) -> &'static [&'static str] {
        &["MODE.SNGL"]
    }
    fn min_args(&self) -> usize {
        1
    }
    fn variadic(&self) -> bool {
        true
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let v = collect_numbers(args, DirectArgs::Reject)?;
        Ok(ValueEval::Number(stats::mode(&v)?))
    }
}

/* ─────────────────────── STDEV / VAR / VARP / DEVSQ / AVEDEV / SUMSQ ─────────────────────── */

macro_rules! array_stat_fn {
    ($ty:ident, $name:literal, $kernel:path, $empty:path $(, aliases = [$($alias:literal),+])?) => {
        #[derive(Debug)]
        pub struct $ty;

        impl Function for $ty {
            func_caps!(PURE, REDUCTION, NUMERIC_ONLY);
            fn name(&self) -> &'static str {
                $name
            }
            $(
            fn aliases(&self) -> &'static [&'static str] {
                &[$($alias),+]
            }
            )?
            fn min_args(&self) -> usize {
                1
            }
            fn variadic(&self) -> bool {
                true
            }
            fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
                or_error($kernel(&numbers(args)?), $empty)
            }
        }
    };
}

array_stat_fn!(StdevFn, "STDEV", stats::stdev, EvalError::div_zero, aliases = ["STDEV.S"]);
array_stat_fn!(VarFn, "VAR", stats::var, EvalError::div_zero, aliases = ["VAR.S"]);
array_stat_fn!(VarpFn, "VARP", stats::varp, EvalError::div_zero, aliases = ["VAR.P"]);
array_stat_fn!(DevsqFn, "DEVSQ", stats::devsq, EvalError::num);
array_stat_fn!(AvedevFn, "AVEDEV", stats::avedev, EvalError::num);
array_stat_fn!(SumsqFn, "SUMSQ", stats::sumsq, EvalError::num);

/* ─────────────────────── SUMX2MY2 / SUMX2PY2 / SUMXMY2 ─────────────────────── */

/// Pair up two equally sized inputs. Only positions where both sides hold
/// numbers take part; an error on either side propagates, x first.
fn xy_pairs(x: &ValueEval, y: &ValueEval) -> Result<(Vec<f64>, Vec<f64>), EvalError> {
    if cell_count(x) != cell_count(y) {
        return Err(EvalError::na().with_message(format!(
            "arrays differ in size: {} vs {}",
            cell_count(x),
            cell_count(y)
        )));
    }
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (a, b) in cells(x).zip(cells(y)) {
        if let ValueEval::Error(e) = a {
            return Err((*e).into());
        }
        if let ValueEval::Error(e) = b {
            return Err((*e).into());
        }
        if let (ValueEval::Number(a), ValueEval::Number(b)) = (a, b) {
            xs.push(*a);
            ys.push(*b);
        }
    }
    if xs.is_empty() {
        return Err(EvalError::div_zero().with_message("no numeric pairs"));
    }
    Ok((xs, ys))
}

macro_rules! xy_fn {
    ($ty:ident, $name:literal, $kernel:path) => {
        #[derive(Debug)]
        pub struct $ty;

        impl Function for $ty {
            func_caps!(PURE, NUMERIC_ONLY);
            fn name(&self) -> &'static str {
                $name
            }
            fn min_args(&self) -> usize {
                2
            }
            fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
                let (xs, ys) = xy_pairs(&args[0], &args[1])?;
                Ok(ValueEval::Number(check_value($kernel(&xs, &ys))?))
            }
        }
    };
}

xy_fn!(SumX2MY2Fn, "SUMX2MY2", stats::sumx2my2);
xy_fn!(SumX2PY2Fn, "SUMX2PY2", stats::sumx2py2);
xy_fn!(SumXMY2Fn, "SUMXMY2", stats::sumxmy2);

pub fn register_builtins() {
    register_functions!(
        SumFn, AverageFn, MinFn, MaxFn, LargeFn, SmallFn, MedianFn, ModeFn, StdevFn, VarFn,
        VarpFn, DevsqFn, AvedevFn, SumsqFn, SumX2MY2Fn, SumX2PY2Fn, SumXMY2Fn,
    );
}
