//! Operand resolution and scalar coercion.
//!
//! Functions receive raw `ValueEval` arguments, which may be references.
//! Anything that wants a single scalar goes through [`single_value`] first,
//! which applies Excel's implicit intersection to area arguments, and then
//! through one of the `to_*` coercions.

use crate::config::EvalContext;
use sheetfn_common::{AreaEval, EvalError, ValueEval};

/// Parse text the way Excel recognises a numeric literal inside a string.
///
/// Surrounding whitespace is ignored. An optional sign must be followed by
/// a digit or a decimal point; `inf`, `nan` and friends are rejected, as is
/// anything that would overflow to a non-finite value.
pub fn parse_double(text: &str) -> Option<f64> {
    let t = text.trim();
    let body = t.strip_prefix(['+', '-']).unwrap_or(t);
    let first = body.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Reduce an argument to one scalar value.
///
/// - `Ref` yields its inner value.
/// - `Area` is intersected with the formula cell: a single column picks the
///   cell on the evaluation row, a single row picks the cell on the
///   evaluation column, a 1x1 area yields its only cell, and a rectangle
///   yields the cell at the intersection of both. No intersection is `#VALUE!`.
/// - An error value, wherever it came from, becomes `Err`.
pub fn single_value(arg: &ValueEval, ctx: &EvalContext) -> Result<ValueEval, EvalError> {
    let v = match arg {
        ValueEval::Ref(r) => r.inner_value().clone(),
        ValueEval::Area(a) => intersect(a, ctx)?.clone(),
        other => other.clone(),
    };
    match v {
        ValueEval::Error(e) => Err(e.into()),
        other => Ok(other),
    }
}

fn intersect<'a>(area: &'a AreaEval, ctx: &EvalContext) -> Result<&'a ValueEval, EvalError> {
    let miss = || {
        EvalError::value().with_message(format!(
            "no implicit intersection of {}x{} area with R{}C{}",
            area.height(),
            area.width(),
            ctx.row + 1,
            ctx.col + 1
        ))
    };
    let hit = match (area.is_row(), area.is_column()) {
        (true, true) => Some(area.get_relative_value(0, 0)),
        (false, true) => area.get_absolute_value(ctx.row, area.first_col()),
        (true, false) => area.get_absolute_value(area.first_row(), ctx.col),
        (false, false) => area.get_absolute_value(ctx.row, ctx.col),
    };
    hit.ok_or_else(miss)
}

/// Coerce an already-resolved scalar to a number.
///
/// - `Number` as is
/// - `Text` only when the whole trimmed string is a numeric literal
/// - `Boolean` to 1/0
/// - `Blank` to 0
/// - `Error` propagates, an unresolved area is `#VALUE!`
pub fn to_number(value: &ValueEval) -> Result<f64, EvalError> {
    match value {
        ValueEval::Number(n) => Ok(*n),
        ValueEval::Text(s) => parse_double(s)
            .ok_or_else(|| EvalError::value().with_message(format!("'{s}' is not a number"))),
        ValueEval::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        ValueEval::Blank => Ok(0.0),
        ValueEval::Error(e) => Err((*e).into()),
        ValueEval::Ref(r) => to_number(r.inner_value()),
        ValueEval::Area(_) => {
            Err(EvalError::value().with_message("area used where a single value is needed"))
        }
    }
}

/// Resolve an argument and coerce it to a number in one step.
pub fn number_arg(arg: &ValueEval, ctx: &EvalContext) -> Result<f64, EvalError> {
    to_number(&single_value(arg, ctx)?)
}

/// Resolve an argument and coerce it to an integer, rounding toward
/// negative infinity like Excel's integer parameters do.
pub fn int_arg(arg: &ValueEval, ctx: &EvalContext) -> Result<i32, EvalError> {
    let n = number_arg(arg, ctx)?.floor();
    if n < i32::MIN as f64 || n > i32::MAX as f64 {
        return Err(EvalError::num().with_message(format!("{n} is out of integer range")));
    }
    Ok(n as i32)
}

/// Turn a numeric kernel result into a value, mapping NaN and infinities to `#NUM!`.
pub fn check_value(n: f64) -> Result<f64, EvalError> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(EvalError::num())
    }
}
