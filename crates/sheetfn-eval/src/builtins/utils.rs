use sheetfn_common::{AreaEval, EvalError, ValueEval};

use crate::coercion::parse_double;

/// How arguments typed directly into the call (not via a reference) are
/// treated when they are not numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirectArgs {
    /// `TRUE` is 1, numeric text is parsed, other text is `#VALUE!`.
    Coerce,
    /// Any non-number is `#VALUE!`.
    Reject,
}

/// Gather the numbers a numeric aggregate sees.
///
/// Cells reached through an area or reference contribute only when they
/// hold a number; text, booleans and blanks there are skipped. Errors
/// anywhere propagate. Direct blanks are skipped.
pub(crate) fn collect_numbers(args: &[ValueEval], direct: DirectArgs) -> Result<Vec<f64>, EvalError> {
    let mut out = Vec::new();
    for arg in args {
        match arg {
            ValueEval::Area(a) => {
                for v in a.values() {
                    push_cell(v, &mut out)?;
                }
            }
            ValueEval::Ref(r) => push_cell(r.inner_value(), &mut out)?,
            ValueEval::Number(n) => out.push(*n),
            ValueEval::Blank => {}
            ValueEval::Error(e) => return Err((*e).into()),
            ValueEval::Boolean(b) if direct == DirectArgs::Coerce => {
                out.push(if *b { 1.0 } else { 0.0 })
            }
            ValueEval::Text(s) if direct == DirectArgs::Coerce => {
                let n = parse_double(s)
                    .ok_or_else(|| EvalError::value().with_message(format!("'{s}' is not a number")))?;
                out.push(n);
            }
            other => {
                return Err(EvalError::value()
                    .with_message(format!("{} argument where a number is needed", other.type_name())));
            }
        }
    }
    Ok(out)
}

fn push_cell(v: &ValueEval, out: &mut Vec<f64>) -> Result<(), EvalError> {
    match v {
        ValueEval::Number(n) => out.push(*n),
        ValueEval::Error(e) => return Err((*e).into()),
        _ => {}
    }
    Ok(())
}

/// Every scalar an argument contributes: an area's cells row-major, a
/// reference's value, or the argument itself.
pub(crate) fn cells(arg: &ValueEval) -> impl Iterator<Item = &ValueEval> + '_ {
    let (area, single) = match arg {
        ValueEval::Area(a) => (Some(a), None),
        ValueEval::Ref(r) => (None, Some(r.inner_value())),
        other => (None, Some(other)),
    };
    area.into_iter().flat_map(|a| a.values()).chain(single)
}

/// Number of cells [`cells`] yields.
pub(crate) fn cell_count(arg: &ValueEval) -> usize {
    match arg {
        ValueEval::Area(a) => a.len(),
        _ => 1,
    }
}

/// An argument that must be a range. Single-cell references become 1x1 areas.
pub(crate) fn area_arg(arg: &ValueEval, what: &str) -> Result<AreaEval, EvalError> {
    match arg {
        ValueEval::Area(a) => Ok(a.clone()),
        ValueEval::Ref(r) => Ok(r.to_area()),
        other => Err(EvalError::value()
            .with_message(format!("{what} must be a range, got {}", other.type_name()))),
    }
}
