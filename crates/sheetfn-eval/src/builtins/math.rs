use crate::coercion::{check_value, number_arg};
use crate::config::EvalContext;
use crate::function::Function;
use crate::numeric::mathx;
use sheetfn_common::{EvalError, ValueEval};

/// Integer parameter truncated toward zero, the way ROUND's `num_digits`
/// and FACT/COMBIN's counts read fractional input.
fn trunc_arg(arg: &ValueEval, ctx: &EvalContext) -> Result<i32, EvalError> {
    let n = number_arg(arg, ctx)?.trunc();
    Ok(n.clamp(i32::MIN as f64, i32::MAX as f64) as i32)
}

/* ─────────────────────────── SIGN() ──────────────────────────── */

#[derive(Debug)]
pub struct SignFn;

impl Function for SignFn {
    func_caps!(PURE, ELEMENTWISE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "SIGN"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let x = number_arg(&args[0], ctx)?;
        Ok(ValueEval::Number(mathx::sign(x)))
    }
}

/* ─────────────────────────── FACT() ──────────────────────────── */

/// Factorial of a non-negative integer. Fractions are truncated; negatives
/// and anything past 170! are `#NUM!`.
#[derive(Debug)]
pub struct FactFn;

impl Function for FactFn {
    func_caps!(PURE, ELEMENTWISE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "FACT"
    }
    fn min_args(&self) -> usize {
        1
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let n = trunc_arg(&args[0], ctx)?;
        Ok(ValueEval::Number(check_value(mathx::factorial(n))?))
    }
}

/* ─────────────────────────── COMBIN() ──────────────────────────── */

#[derive(Debug)]
pub struct CombinFn;

impl Function for CombinFn {
    func_caps!(PURE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "COMBIN"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let n = trunc_arg(&args[0], ctx)?;
        let k = trunc_arg(&args[1], ctx)?;
        Ok(ValueEval::Number(check_value(mathx::n_choose_k(n, k))?))
    }
}

/* ─────────────────────────── hyperbolics ──────────────────────────── */

macro_rules! unary_math_fn {
    ($ty:ident, $name:literal, $kernel:path) => {
        #[derive(Debug)]
        pub struct $ty;

        impl Function for $ty {
            func_caps!(PURE, ELEMENTWISE, NUMERIC_ONLY);
            fn name(&self) -> &'static str {
                $name
            }
            fn min_args(&self) -> usize {
                1
            }
            fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
                let x = number_arg(&args[0], ctx)?;
                Ok(ValueEval::Number(check_value($kernel(x))?))
            }
        }
    };
}

unary_math_fn!(SinhFn, "SINH", mathx::sinh);
unary_math_fn!(CoshFn, "COSH", mathx::cosh);
unary_math_fn!(TanhFn, "TANH", mathx::tanh);
unary_math_fn!(AsinhFn, "ASINH", mathx::asinh);
unary_math_fn!(AcoshFn, "ACOSH", mathx::acosh);
unary_math_fn!(AtanhFn, "ATANH", mathx::atanh);

/* ─────────────────────── ROUND / ROUNDUP / ROUNDDOWN ─────────────────────── */

fn eval_round(
    args: &[ValueEval],
    ctx: &EvalContext,
    kernel: fn(f64, i32) -> f64,
) -> Result<ValueEval, EvalError> {
    let x = number_arg(&args[0], ctx)?;
    let digits = trunc_arg(&args[1], ctx)?;
    Ok(ValueEval::Number(check_value(kernel(x, digits))?))
}

/// Half away from zero at `num_digits`; negative digits round left of the
/// decimal point.
#[derive(Debug)]
pub struct RoundFn;

impl Function for RoundFn {
    func_caps!(PURE, ELEMENTWISE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "ROUND"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        eval_round(args, ctx, mathx::round)
    }
}

#[derive(Debug)]
pub struct RoundUpFn;

impl Function for RoundUpFn {
    func_caps!(PURE, ELEMENTWISE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "ROUNDUP"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        eval_round(args, ctx, mathx::round_up)
    }
}

#[derive(Debug)]
pub struct RoundDownFn;

impl Function for RoundDownFn {
    func_caps!(PURE, ELEMENTWISE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "ROUNDDOWN"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        eval_round(args, ctx, mathx::round_down)
    }
}

/* ─────────────────────────── CEILING() / FLOOR() ──────────────────────────── */

/// Rounds away from zero to a multiple of `significance`. Mixed signs are
/// `#NUM!`; zero significance gives 0.
#[derive(Debug)]
pub struct CeilingFn;

impl Function for CeilingFn {
    func_caps!(PURE, ELEMENTWISE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "CEILING"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let x = number_arg(&args[0], ctx)?;
        let s = number_arg(&args[1], ctx)?;
        Ok(ValueEval::Number(check_value(mathx::ceiling(x, s))?))
    }
}

/// Rounds toward zero to a multiple of `significance`. Mixed signs are
/// `#NUM!`; zero significance with a non-zero value is `#DIV/0!`.
#[derive(Debug)]
pub struct FloorFn;

impl Function for FloorFn {
    func_caps!(PURE, ELEMENTWISE, NUMERIC_ONLY);
    fn name(&self) -> &'static str {
        "FLOOR"
    }
    fn min_args(&self) -> usize {
        2
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let x = number_arg(&args[0], ctx)?;
        let s = number_arg(&args[1], ctx)?;
        if s == 0.0 && x != 0.0 {
            return Err(EvalError::div_zero().with_message("FLOOR significance is zero"));
        }
        Ok(ValueEval::Number(check_value(mathx::floor(x, s))?))
    }
}

pub fn register_builtins() {
    register_functions!(
        SignFn,
        FactFn,
        CombinFn,
        SinhFn,
        CoshFn,
        TanhFn,
        AsinhFn,
        AcoshFn,
        AtanhFn,
        RoundFn,
        RoundUpFn,
        RoundDownFn,
        CeilingFn,
        FloorFn,
    );
}
