//! COUNT, COUNTA, COUNTBLANK, COUNTIF and SUMIF.
//!
//! All of them walk cells through a [`MatchPredicate`]. COUNTIF and SUMIF
//! compile their criteria once per call and reuse it for every cell.

use super::utils::{area_arg, cells};
use crate::coercion::parse_double;
use crate::config::EvalContext;
use crate::criteria::{CriteriaPredicate, MatchPredicate};
use crate::function::Function;
use sheetfn_common::{AreaEval, EvalError, ValueEval};

/// Count cells of every argument that satisfy `pred`.
pub fn count_matching(args: &[ValueEval], pred: &dyn MatchPredicate) -> usize {
    args.iter()
        .flat_map(|a| cells(a))
        .filter(|v| pred.matches(v))
        .count()
}

fn count_in_area(area: &AreaEval, pred: &dyn MatchPredicate) -> usize {
    area.values().filter(|v| pred.matches(v)).count()
}

/// An error typed directly as a range argument propagates; errors inside the
/// referenced cells are data for the criteria.
fn reject_direct_error(arg: &ValueEval) -> Result<(), EvalError> {
    match arg {
        ValueEval::Error(e) => Err((*e).into()),
        _ => Ok(()),
    }
}

/* ─────────────────────────── COUNT() ──────────────────────────── */

/// Counts numbers. Inside ranges only number cells count; typed directly,
/// booleans and numeric text count too. Errors are not counted and do not
/// propagate.
#[derive(Debug)]
pub struct CountFn;

impl Function for CountFn {
    func_caps!(PURE, REDUCTION);
    fn name(&self) -> &'static str {
        "COUNT"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn variadic(&self) -> bool {
        true
    }
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let in_range = |v: &ValueEval| matches!(v, ValueEval::Number(_));
        let mut total = 0usize;
        for arg in args {
            total += match arg {
                ValueEval::Area(_) | ValueEval::Ref(_) => count_matching(std::slice::from_ref(arg), &in_range),
                ValueEval::Number(_) | ValueEval::Boolean(_) => 1,
                ValueEval::Text(s) => usize::from(parse_double(s).is_some()),
                ValueEval::Blank | ValueEval::Error(_) => 0,
            };
        }
        Ok(ValueEval::Number(total as f64))
    }
}

/* ─────────────────────────── COUNTA() ──────────────────────────── */

/// Counts every non-blank value, errors and empty text included.
#[derive(Debug)]
pub struct CountAFn;

impl Function for CountAFn {
    func_caps!(PURE, REDUCTION);
    fn name(&self) -> &'static str {
        "COUNTA"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn variadic(&self) -> bool {
        true
    }
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let non_blank = |v: &ValueEval| !v.is_blank();
        Ok(ValueEval::Number(count_matching(args, &non_blank) as f64))
    }
}

/* ─────────────────────────── COUNTBLANK() ──────────────────────────── */

/// Counts blank cells and cells holding empty text in one range.
#[derive(Debug)]
pub struct CountBlankFn;

impl Function for CountBlankFn {
    func_caps!(PURE, REDUCTION);
    fn name(&self) -> &'static str {
        "COUNTBLANK"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        if let ValueEval::Error(e) = &args[0] {
            return Err((*e).into());
        }
        let range = area_arg(&args[0], "COUNTBLANK range")?;
        let blank = |v: &ValueEval| matches!(v, ValueEval::Blank) || matches!(v, ValueEval::Text(s) if s.is_empty());
        Ok(ValueEval::Number(count_in_area(&range, &blank) as f64))
    }
}

/* ─────────────────────────── COUNTIF() ──────────────────────────── */

/// COUNTIF(range, criteria). See [`CriteriaPredicate`] for how criteria
/// read. A reference criteria is unwrapped first; an area criteria is
/// intersected with the formula cell.
#[derive(Debug)]
pub struct CountIfFn;

impl Function for CountIfFn {
    func_caps!(PURE, REDUCTION);
    fn name(&self) -> &'static str {
        "COUNTIF"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        reject_direct_error(&args[0])?;
        let pred = CriteriaPredicate::compile(&args[1], ctx)?;
        let n = match &args[0] {
            ValueEval::Area(a) => count_in_area(a, &pred),
            ValueEval::Ref(r) => usize::from(pred.matches(r.inner_value())),
            other => {
                return Err(EvalError::value()
                    .with_message(format!("COUNTIF range must be a reference, got {}", other.type_name())));
            }
        };
        Ok(ValueEval::Number(n as f64))
    }
}

/* ─────────────────────────── SUMIF() ──────────────────────────── */

/// SUMIF(range, criteria, [sum_range]).
///
/// `sum_range` is read with the shape of `range`, anchored at its own
/// top-left cell. Cells of that shape that fall outside the supplied data
/// are treated as blank. Only numbers are summed; an error in a summed
/// position propagates.
#[derive(Debug)]
pub struct SumIfFn;

impl Function for SumIfFn {
    func_caps!(PURE, REDUCTION, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "SUMIF"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        reject_direct_error(&args[0])?;
        if let Some(sum_range) = args.get(2) {
            reject_direct_error(sum_range)?;
        }
        let range = area_arg(&args[0], "SUMIF range")?;
        let pred = CriteriaPredicate::compile(&args[1], ctx)?;
        let sum_range = match args.get(2) {
            Some(arg) => area_arg(arg, "SUMIF sum_range")?,
            None => range.clone(),
        };

        let mut total = 0.0;
        for ((r, c), candidate) in range.indexed_values() {
            if !pred.matches(candidate) {
                continue;
            }
            match sum_range.try_relative_value(r, c) {
                Some(ValueEval::Number(n)) => total += n,
                Some(ValueEval::Error(e)) => return Err((*e).into()),
                _ => {}
            }
        }
        Ok(ValueEval::Number(total))
    }
}

pub fn register_builtins() {
    register_functions!(CountFn, CountAFn, CountBlankFn, CountIfFn, SumIfFn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{area, boolean, call, call_at, cell, column, err, num, text};
    use sheetfn_common::ErrorEval;

    #[test]
    fn count_by_argument_kind() {
        let range = column(vec![num(1.), text("2"), boolean(true), ValueEval::Blank, err(ErrorEval::Na), num(3.)]);
        assert_eq!(call(&CountFn, &[range]), num(2.));
        assert_eq!(
            call(&CountFn, &[num(1.), text("2"), text("x"), boolean(false), ValueEval::Blank]),
            num(3.)
        );
        assert_eq!(call(&CountFn, &[err(ErrorEval::DivZero), num(1.)]), num(1.));
        assert_eq!(call(&CountFn, &[cell(0, 0, text("5"))]), num(0.));
    }

    #[test]
    fn counta_counts_errors_and_empty_text() {
        let range = column(vec![num(1.), ValueEval::empty_text(), ValueEval::Blank, err(ErrorEval::Na)]);
        assert_eq!(call(&CountAFn, &[range, ValueEval::Blank, boolean(false)]), num(4.));
        assert_eq!(call(&CountAFn, &[err(ErrorEval::RefInvalid)]), num(1.));
    }

    #[test]
    fn countblank_counts_blank_and_empty_text() {
        let range = column(vec![num(1.), ValueEval::empty_text(), ValueEval::Blank, text(" ")]);
        assert_eq!(call(&CountBlankFn, &[range]), num(2.));
        assert_eq!(call(&CountBlankFn, &[cell(0, 0, ValueEval::Blank)]), num(1.));
        assert_eq!(call(&CountBlankFn, &[num(0.)]), err(ErrorEval::ValueInvalid));
    }

    #[test]
    fn countif_numeric_text_equivalence() {
        let range = column(vec![num(0.), text("2"), text("2.001"), num(2.), num(2.), boolean(true)]);
        assert_eq!(call(&CountIfFn, &[range.clone(), num(2.)]), num(3.));
        assert_eq!(call(&CountIfFn, &[range.clone(), text("2.00")]), num(3.));
        assert_eq!(call(&CountIfFn, &[range.clone(), boolean(true)]), num(1.));
        assert_eq!(call(&CountIfFn, &[range, text(">=1")]), num(2.));
    }

    #[test]
    fn countif_criteria_from_references() {
        let range = column(vec![text("apple"), text("Apricot"), text("banana"), ValueEval::Blank]);
        let crit = cell(9, 9, text("a*"));
        assert_eq!(call(&CountIfFn, &[range.clone(), crit]), num(2.));

        // criteria column intersected with the formula row
        let crit_col = area(0, 5, vec![vec![text("banana")], vec![text("<>")]]);
        assert_eq!(call_at(&CountIfFn, &[range.clone(), crit_col.clone()], 0, 7), num(1.));
        assert_eq!(call_at(&CountIfFn, &[range.clone(), crit_col.clone()], 1, 7), num(3.));
        assert_eq!(
            call_at(&CountIfFn, &[range.clone(), crit_col], 4, 7),
            err(ErrorEval::ValueInvalid)
        );

        assert_eq!(call(&CountIfFn, &[range.clone(), cell(0, 0, ValueEval::Blank)]), num(0.));
        assert_eq!(
            call(&CountIfFn, &[range, cell(0, 0, err(ErrorEval::Na))]),
            err(ErrorEval::Na)
        );
    }

    #[test]
    fn countif_on_single_cell_and_bad_range() {
        assert_eq!(call(&CountIfFn, &[cell(0, 0, num(5.)), text(">4")]), num(1.));
        assert_eq!(call(&CountIfFn, &[num(5.), num(5.)]), err(ErrorEval::ValueInvalid));
    }

    #[test]
    fn countif_empty_string_asymmetry() {
        let range = column(vec![ValueEval::Blank, ValueEval::empty_text(), text("x"), num(1.)]);
        assert_eq!(call(&CountIfFn, &[range.clone(), text("=")]), num(1.));
        assert_eq!(call(&CountIfFn, &[range.clone(), text("")]), num(2.));
        assert_eq!(call(&CountIfFn, &[range, text("<>")]), num(3.));
    }

    #[test]
    fn single_cell_reference_counts_like_a_one_cell_area() {
        let na_cell = cell(0, 0, err(ErrorEval::Na));
        let na_area = column(vec![err(ErrorEval::Na)]);
        for range in [na_cell.clone(), na_area] {
            assert_eq!(call(&CountIfFn, &[range.clone(), text("#N/A")]), num(1.));
            assert_eq!(call(&CountIfFn, &[range.clone(), num(1.)]), num(0.));
            assert_eq!(call(&CountIfFn, &[range, text("<>#N/A")]), num(0.));
        }
        assert_eq!(call(&CountIfFn, &[err(ErrorEval::Na), num(1.)]), err(ErrorEval::Na));
    }

    #[test]
    fn sumif_errors_only_count_where_criteria_match() {
        let div0 = cell(0, 1, err(ErrorEval::DivZero));
        assert_eq!(call(&SumIfFn, &[cell(0, 0, num(1.)), num(5.), div0.clone()]), num(0.));
        assert_eq!(
            call(&SumIfFn, &[cell(0, 0, num(5.)), num(5.), div0]),
            err(ErrorEval::DivZero)
        );
        // an error in the criteria range is just a non-matching candidate
        assert_eq!(call(&SumIfFn, &[cell(0, 0, err(ErrorEval::Na)), num(5.)]), num(0.));
        assert_eq!(
            call(&SumIfFn, &[cell(0, 0, num(5.)), num(5.), err(ErrorEval::RefInvalid)]),
            err(ErrorEval::RefInvalid)
        );
        assert_eq!(
            call(&SumIfFn, &[cell(0, 0, num(5.)), cell(0, 2, err(ErrorEval::Na))]),
            err(ErrorEval::Na)
        );
    }

    #[test]
    fn sumif_with_and_without_sum_range() {
        let range = column(vec![num(1.), num(5.), num(10.), text("x")]);
        assert_eq!(call(&SumIfFn, &[range.clone(), text(">2")]), num(15.));

        let amounts = area(0, 3, vec![vec![num(100.)], vec![num(200.)], vec![text("n/a")], vec![num(400.)]]);
        assert_eq!(call(&SumIfFn, &[range.clone(), text(">2"), amounts.clone()]), num(200.));
        assert_eq!(call(&SumIfFn, &[range.clone(), text("x"), amounts]), num(400.));

        // a shorter sum range only contributes the cells it has
        let short = column(vec![num(7.)]);
        assert_eq!(call(&SumIfFn, &[range.clone(), text("<>0"), short]), num(7.));

        let bad = column(vec![num(1.), err(ErrorEval::DivZero), num(1.), num(1.)]);
        assert_eq!(call(&SumIfFn, &[range, num(5.), bad]), err(ErrorEval::DivZero));
    }
}
