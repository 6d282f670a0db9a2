use crate::config::EvalContext;
use crate::function::Function;
use sheetfn_common::{EvalError, ValueEval};

/// T(value): text passes through, errors propagate, everything else is "".
/// An area argument is read at its top-left cell.
#[derive(Debug)]
pub struct TFn;

impl Function for TFn {
    func_caps!(PURE, ELEMENTWISE);
    fn name(&self) -> &'static str {
        "T"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn eval(&self, args: &[ValueEval], _ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let v = match &args[0] {
            ValueEval::Area(a) => a.get_relative_value(0, 0),
            ValueEval::Ref(r) => r.inner_value(),
            other => other,
        };
        match v {
            ValueEval::Text(s) => Ok(ValueEval::Text(s.clone())),
            ValueEval::Error(e) => Err((*e).into()),
            _ => Ok(ValueEval::empty_text()),
        }
    }
}

pub fn register_builtins() {
    register_functions!(TFn);
}
