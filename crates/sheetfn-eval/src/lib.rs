//! Excel-compatible function evaluation.
//!
//! Hosts resolve references to [`ValueEval`]s, then call a [`Function`]
//! through [`Function::dispatch`] or by name through [`evaluate_named`].
//!
//! ```
//! use sheetfn_eval::{EvalContext, evaluate_named};
//! use sheetfn_common::{AreaEval, ValueEval};
//!
//! let range = AreaEval::from_rows(0, 0, vec![
//!     vec![ValueEval::Number(2.0)],
//!     vec![ValueEval::text("2")],
//!     vec![ValueEval::Number(3.0)],
//! ]).unwrap();
//! let n = evaluate_named(
//!     "COUNTIF",
//!     &[range.into(), ValueEval::text(">=2")],
//!     &EvalContext::default(),
//! );
//! // numeric text only counts for equality criteria
//! assert_eq!(n, ValueEval::Number(2.0));
//! ```

#[macro_use]
mod macros;

pub mod builtins;
pub mod coercion;
pub mod config;
pub mod criteria;
pub mod function;
pub mod function_registry;
pub mod numeric;
pub mod telemetry;

pub use config::{EvalConfig, EvalContext};
pub use criteria::{CmpOp, CriteriaPredicate, MatchPredicate};
pub use function::{FnCaps, Function};
pub use function_registry::{evaluate_named, load_builtins};

pub use sheetfn_common::{AreaEval, ErrorEval, EvalError, RefEval, ValueEval};

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod tests;
