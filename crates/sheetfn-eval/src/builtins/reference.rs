use crate::coercion::{single_value, to_number};
use crate::config::EvalContext;
use crate::function::Function;
use sheetfn_common::{AreaEval, EvalError, ValueEval};

/* ─────────────────────────── INDEX() ──────────────────────────── */

/// INDEX(array, row_num, [column_num], [area_num])
///
/// - Row and column numbers are 1-based; 0 (or a blank) selects the whole
///   column or row, returned as an area.
/// - With only `row_num`, a single-row array reads it as a column number
///   and a single-column array as a row number, so a 1-D range can be
///   indexed linearly. A 2-D array returns the whole row.
/// - Out-of-range numbers are `#REF!`, negative ones `#VALUE!`.
/// - Only `area_num` 1 is supported; multi-area references never reach
///   this function. An `area_num` below 1 is `#VALUE!`.
#[derive(Debug)]
pub struct IndexFn;

impl Function for IndexFn {
    func_caps!(PURE, LOOKUP);
    fn name(&self) -> &'static str {
        "INDEX"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let area = match &args[0] {
            ValueEval::Area(a) => a.clone(),
            ValueEval::Ref(r) => r.to_area(),
            other => {
                return Err(EvalError::value()
                    .with_message(format!("INDEX array must be a reference, got {}", other.type_name())));
            }
        };

        if let Some(area_num) = args.get(3) {
            match resolve_index(area_num, ctx)? {
                Some(0) => {}
                None => return Err(EvalError::value().with_message("INDEX area_num must be at least 1")),
                Some(_) => {
                    return Err(EvalError::not_implemented().with_message("INDEX over multiple areas"));
                }
            }
        }

        let row = resolve_index(&args[1], ctx)?;
        let (row, col) = match args.get(2) {
            Some(col_arg) => (row, resolve_index(col_arg, ctx)?),
            None if area.is_column() => (row, Some(0)),
            None if area.is_row() => (row.map(|_| 0), row),
            None => (row, None),
        };
        value_from_area(&area, row, col)
    }
}

/// 1-based index argument to 0-based; `None` means "all" (a 0 or blank).
fn resolve_index(arg: &ValueEval, ctx: &EvalContext) -> Result<Option<usize>, EvalError> {
    let v = single_value(arg, ctx)?;
    if v.is_blank() {
        return Ok(None);
    }
    let n = to_number(&v)?.floor();
    if n < 0.0 {
        return Err(EvalError::value().with_message(format!("index {n} is negative")));
    }
    Ok(if n == 0.0 { None } else { Some(n as usize - 1) })
}

fn value_from_area(area: &AreaEval, row: Option<usize>, col: Option<usize>) -> Result<ValueEval, EvalError> {
    let out_of_range = || {
        EvalError::reference().with_message(format!(
            "index ({}, {}) outside a {}x{} array",
            row.map_or(0, |r| r + 1),
            col.map_or(0, |c| c + 1),
            area.height(),
            area.width()
        ))
    };
    let h = area.height() as i64;
    let w = area.width() as i64;
    match (row, col) {
        (Some(r), Some(c)) => area
            .try_relative_value(r, c)
            .cloned()
            .ok_or_else(out_of_range),
        (Some(r), None) if r < area.height() => Ok(area.offset(r as i64, r as i64, 0, w - 1)?.into()),
        (None, Some(c)) if c < area.width() => Ok(area.offset(0, h - 1, c as i64, c as i64)?.into()),
        (None, None) => Ok(area.clone().into()),
        _ => Err(out_of_range()),
    }
}

/* ─────────────────────────── ROW() / COLUMN() ──────────────────────────── */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Row,
    Column,
}

/// 1-based coordinate of a reference (first cell for an area), or of the
/// formula cell when called without arguments.
fn coordinate(args: &[ValueEval], ctx: &EvalContext, axis: Axis) -> Result<ValueEval, EvalError> {
    let zero_based = match args.first() {
        None => match axis {
            Axis::Row => ctx.row,
            Axis::Column => ctx.col,
        },
        Some(ValueEval::Ref(r)) => match axis {
            Axis::Row => r.row(),
            Axis::Column => r.col(),
        },
        Some(ValueEval::Area(a)) => match axis {
            Axis::Row => a.first_row(),
            Axis::Column => a.first_col(),
        },
        Some(ValueEval::Error(e)) => return Err((*e).into()),
        Some(other) => {
            return Err(EvalError::value().with_message(format!("expected a reference, got {}", other.type_name())));
        }
    };
    Ok(ValueEval::Number(zero_based as f64 + 1.0))
}

#[derive(Debug)]
pub struct RowFn;

impl Function for RowFn {
    func_caps!(PURE, LOOKUP);
    fn name(&self) -> &'static str {
        "ROW"
    }
    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
    // the referenced cell's value is irrelevant
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        coordinate(args, ctx, Axis::Row)
    }
}

#[derive(Debug)]
pub struct ColumnFn;

impl Function for ColumnFn {
    func_caps!(PURE, LOOKUP);
    fn name(&self) -> &'static str {
        "COLUMN"
    }
    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        coordinate(args, ctx, Axis::Column)
    }
}

/* ─────────────────────────── ROWS() / COLUMNS() ──────────────────────────── */

fn extent(arg: &ValueEval, axis: Axis) -> Result<ValueEval, EvalError> {
    let n = match arg {
        ValueEval::Area(a) => match axis {
            Axis::Row => a.height(),
            Axis::Column => a.width(),
        },
        ValueEval::Ref(_) => 1,
        ValueEval::Error(e) => return Err((*e).into()),
        other => {
            return Err(EvalError::value().with_message(format!("expected a range, got {}", other.type_name())));
        }
    };
    Ok(ValueEval::Number(n as f64))
}

#[derive(Debug)]
pub struct RowsFn;

impl Function for RowsFn {
    func_caps!(PURE, LOOKUP);
    fn name(&self) -> &'static str {
        "ROWS"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        extent(&args[0], Axis::Row)
    }
}

#[derive(Debug)]
pub struct ColumnsFn;

impl Function for ColumnsFn {
    func_caps!(PURE, LOOKUP);
    fn name(&self) -> &'static str {
        "COLUMNS"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        extent(&args[0], Axis::Column)
    }
}

pub fn register_builtins() {
    register_functions!(IndexFn, RowFn, ColumnFn, RowsFn, ColumnsFn);
}
