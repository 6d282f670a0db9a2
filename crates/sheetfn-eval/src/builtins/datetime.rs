use crate::coercion::int_arg;
use crate::config::EvalContext;
use crate::function::Function;
use chrono::NaiveDate;
use sheetfn_common::{DateSystem, EvalError, ValueEval, days_from_epoch};

/// Last day Excel can represent.
const MAX_DATE: NaiveDate = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();

/// Serial for `(year, month, day)` with Excel's normalisation:
/// two-digit-style years below 1900 are offset by 1900, months roll over
/// into neighbouring years and days count on from the first of the month.
/// The arithmetic happens in serial space so the phantom 1900-02-29 is
/// reachable (`DATE(1900,2,29)` and `DATE(1900,3,0)` are both 60).
fn date_serial(year: i32, month: i32, day: i32, system: DateSystem) -> Result<f64, EvalError> {
    if !(0..10_000).contains(&year) {
        return Err(EvalError::num().with_message(format!("year {year} out of range")));
    }
    let year = if year < 1900 { year + 1900 } else { year };

    let month0 = i64::from(month) - 1;
    let y = i64::from(year) + month0.div_euclid(12);
    let m = month0.rem_euclid(12) as u32 + 1;
    let first = i32::try_from(y)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, m, 1))
        .ok_or_else(|| EvalError::num().with_message(format!("month {month} out of range")))?;

    let serial = days_from_epoch(first, system) + i64::from(day) - 1;
    if serial < 0 || serial > days_from_epoch(MAX_DATE, system) {
        return Err(EvalError::num().with_message(format!("date serial {serial} out of range")));
    }
    Ok(serial as f64)
}

/// DATE(year, month, day) as a serial day number in the configured date
/// system. Fractional arguments are floored.
#[derive(Debug)]
pub struct DateFn;

impl Function for DateFn {
    func_caps!(PURE);
    fn name(&self) -> &'static str {
        "DATE"
    }
    fn min_args(&self) -> usize {
        3
    }
    fn eval(&self, args: &[ValueEval], ctx: &EvalContext) -> Result<ValueEval, EvalError> {
        let year = int_arg(&args[0], ctx)?;
        let month = int_arg(&args[1], ctx)?;
        let day = int_arg(&args[2], ctx)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(year, month, day, system = %ctx.config.date_system, "DATE");

        Ok(ValueEval::Number(date_serial(year, month, day, ctx.config.date_system)?))
    }
}

pub fn register_builtins() {
    register_functions!(DateFn);
}
