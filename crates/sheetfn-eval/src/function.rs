//! sheetfn-eval/src/function.rs
// The core `Function` trait, its capability flags and the dispatch contract.

use crate::config::EvalContext;
use sheetfn_common::{ErrorEval, EvalError, ValueEval};

bitflags::bitflags! {
    /// Describes the capabilities and properties of a function.
    ///
    /// Hosts can use these to pick evaluation strategies (caching pure
    /// results, recomputing volatile ones, batching reductions).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct FnCaps: u16 {
        // --- Semantics ---
        /// Same inputs always give the same output, no side effects.
        const PURE          = 0b0000_0001;
        /// Output may change between calls with identical inputs.
        const VOLATILE      = 0b0000_0010;

        // --- Shape ---
        /// Reduces any number of ranges to one value (`SUM`, `COUNT`).
        const REDUCTION     = 0b0000_0100;
        /// Maps each input independently (`SINH`, `ROUND`).
        const ELEMENTWISE   = 0b0000_1000;
        /// Looks up or addresses cells (`INDEX`, `ROW`).
        const LOOKUP        = 0b0001_0000;

        // --- Input data ---
        /// Only numeric cell content matters.
        const NUMERIC_ONLY  = 0b0010_0000;
    }
}

/// Object-safe trait for all Excel-style functions.
///
/// Implementors provide [`eval`](Function::eval), written with `?` against
/// [`EvalError`]. Callers go through [`dispatch`](Function::dispatch), which
/// enforces the shared contract:
///
/// 1. argument count outside `min_args..=max_args` is `#VALUE!`
/// 2. the first argument that is an error (directly or behind a single-cell
///    reference) is returned as the result, unless
///    [`propagates_errors`](Function::propagates_errors) is `false`
/// 3. an `Err` from `eval` becomes `ValueEval::Error(kind)`, and a
///    non-finite numeric result becomes `#NUM!`
///
/// `dispatch` never panics on spreadsheet input.
pub trait Function: Send + Sync + 'static {
    /// Capability flags for this function
    fn caps(&self) -> FnCaps {
        FnCaps::PURE
    }

    fn name(&self) -> &'static str;

    /// Alternative names resolving to the same implementation.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn min_args(&self) -> usize {
        0
    }

    fn variadic(&self) -> bool {
        false
    }

    /// Upper arity bound; `None` means unbounded. Defaults to `min_args`
    /// for fixed-arity functions.
    fn max_args(&self) -> Option<usize> {
        if self.variadic() {
            None
        } else {
            Some(self.min_args())
        }
    }

    fn volatile(&self) -> bool {
        self.caps().contains(FnCaps::VOLATILE)
    }

    /// Whether an error argument short-circuits the call. Functions that
    /// inspect or count error values (ISBLANK, COUNTA) turn this off.
    fn propagates_errors(&self) -> bool {
        true
    }

    /// The function body. Arguments have already passed the arity check.
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError>;

    /// Evaluate under the shared dispatch contract.
    fn dispatch(&self, args: &[ValueEval], ctx: &EvalContext) -> ValueEval {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("fn_eval", name = self.name(), argc = args.len()).entered();

        if let Err(e) = check_arity(self, args.len()) {
            #[cfg(feature = "tracing")]
            tracing::trace!(error = %e, "arity rejected");
            return e.into();
        }

        if self.propagates_errors() {
            if let Some(e) = first_error(args) {
                #[cfg(feature = "tracing")]
                tracing::trace!(error = %e, "error argument short-circuits");
                return ValueEval::Error(e);
            }
        }

        match self.eval(args, ctx) {
            Ok(ValueEval::Number(n)) if !n.is_finite() => ValueEval::Error(ErrorEval::NumError),
            Ok(v) => v,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %e, "evaluation failed");
                e.into()
            }
        }
    }

    /// `dispatch` with the formula cell given as 0-based coordinates and the
    /// default configuration.
    fn evaluate(&self, args: &[ValueEval], row: u32, col: u32) -> ValueEval {
        self.dispatch(args, &EvalContext::new(row, col))
    }
}

fn check_arity<F: Function + ?Sized>(f: &F, argc: usize) -> Result<(), EvalError> {
    let min = f.min_args();
    let max = f.max_args();
    if argc < min || max.is_some_and(|m| argc > m) {
        let expected = match max {
            Some(m) if m == min => format!("{min}"),
            Some(m) => format!("{min}..={m}"),
            None => format!("at least {min}"),
        };
        return Err(EvalError::value().with_message(format!(
            "{} expects {expected} arguments, got {argc}",
            f.name()
        )));
    }
    Ok(())
}

/// First error in argument order, looking through single-cell references.
fn first_error(args: &[ValueEval]) -> Option<ErrorEval> {
    args.iter().find_map(|a| a.deref_ref().as_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{cell, num};

    #[derive(Debug)]
    struct Twice;

    impl Function for Twice {
        func_caps!(PURE, ELEMENTWISE);
        fn name(&self) -> &'static str {
            "TWICE"
        }
        fn min_args(&self) -> usize {
            1
        }
        fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
            let n = crate::coercion::number_arg(&args[0], ctx)?;
            Ok(ValueEval::Number(n * 2.0))
        }
    }

    #[test]
    fn arity_is_checked_before_evaluation() {
        let ctx = EvalContext::default();
        assert_eq!(Twice.dispatch(&[], &ctx), ValueEval::Error(ErrorEval::ValueInvalid));
        assert_eq!(
            Twice.dispatch(&[num(1.), num(2.)], &ctx),
            ValueEval::Error(ErrorEval::ValueInvalid)
        );
        assert_eq!(Twice.dispatch(&[num(4.)], &ctx), num(8.));
        assert_eq!(Twice.max_args(), Some(1));
        assert!(Twice.caps().contains(FnCaps::ELEMENTWISE));
        assert!(!Twice.volatile());
    }

    #[test]
    fn error_arguments_short_circuit() {
        let via_ref = cell(0, 0, ValueEval::Error(ErrorEval::DivZero));
        assert_eq!(Twice.evaluate(&[via_ref], 0, 0), ValueEval::Error(ErrorEval::DivZero));
    }

    #[test]
    fn eval_errors_and_overflow_become_values() {
        assert_eq!(
            Twice.evaluate(&[ValueEval::text("x")], 0, 0),
            ValueEval::Error(ErrorEval::ValueInvalid)
        );
        assert_eq!(
            Twice.evaluate(&[num(f64::MAX)], 0, 0),
            ValueEval::Error(ErrorEval::NumError)
        );
    }
}
