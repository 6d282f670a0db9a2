//! Pure numeric algorithms with no spreadsheet types beyond `EvalError`.

pub mod mathx;
pub mod stats;
