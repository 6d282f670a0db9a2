use crate::coercion::single_value;
use crate::config::EvalContext;
use crate::function::Function;
use sheetfn_common::{EvalError, ValueEval};

/// TRUE only for an empty cell. Empty text is not blank, and an error
/// argument yields FALSE rather than propagating.
#[derive(Debug)]
pub struct IsBlankFn;

impl Function for IsBlankFn {
    func_caps!(PURE);
    fn name(&self) -> &'static str {
        "ISBLANK"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn propagates_errors(&self) -> bool {
        false
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let blank = matches!(single_value(&args[0], ctx), Ok(ValueEval::Blank));
        Ok(ValueEval::Boolean(blank))
    }
}

pub fn register_builtins() {
    register_functions!(IsBlankFn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{boolean, call, call_at, cell, column, err, num};
    use sheetfn_common::ErrorEval;

    #[test]
    fn isblank_distinguishes_blank_from_empty_text() {
        assert_eq!(call(&IsBlankFn, &[cell(0, 0, ValueEval::Blank)]), boolean(true));
        assert_eq!(call(&IsBlankFn, &[ValueEval::Blank]), boolean(true));
        assert_eq!(call(&IsBlankFn, &[cell(0, 0, ValueEval::empty_text())]), boolean(false));
        assert_eq!(call(&IsBlankFn, &[num(0.)]), boolean(false));
        assert_eq!(call(&IsBlankFn, &[err(ErrorEval::Na)]), boolean(false));
        assert_eq!(call(&IsBlankFn, &[cell(0, 0, err(ErrorEval::Na))]), boolean(false));
    }

    #[test]
    fn isblank_intersects_areas() {
        let col = column(vec![num(1.), ValueEval::Blank]);
        assert_eq!(call_at(&IsBlankFn, &[col.clone()], 1, 4), boolean(true));
        assert_eq!(call_at(&IsBlankFn, &[col.clone()], 0, 4), boolean(false));
        // no intersection
        assert_eq!(call_at(&IsBlankFn, &[col], 7, 4), boolean(false));
    }
}
