use chrono::{Duration as ChronoDur, NaiveDate};
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/* ───────────────────── Excel date-serial utilities ───────────────────
Excel's 1900 serial date system:
  Serial 0  = 1900-01-00 (displayed that way, really 1899-12-31)
  Serial 1  = 1900-01-01
  Serial 59 = 1900-02-28
  Serial 60 = 1900-02-29  (phantom – doesn't exist, but Excel thinks it does)
  Serial 61 = 1900-03-01
The 1904 system counts plainly from 1904-01-01 = serial 0.
Only whole days are handled here; DATE never produces a time part.
------------------------------------------------------------------- */

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateSystem {
    #[default]
    Excel1900,
    Excel1904,
}

impl Display for DateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSystem::Excel1900 => write!(f, "1900"),
            DateSystem::Excel1904 => write!(f, "1904"),
        }
    }
}

/// Base date for the 1900 date system. Serial 1 = base + 1 day = 1900-01-01.
const EPOCH_1900: NaiveDate = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap();
const EPOCH_1904: NaiveDate = NaiveDate::from_ymd_opt(1904, 1, 1).unwrap();
const MARCH_1_1900: NaiveDate = NaiveDate::from_ymd_opt(1900, 3, 1).unwrap();

/// Signed day count from the start of the date system, including the 1900
/// phantom leap day. Dates before the epoch come out negative.
pub fn days_from_epoch(date: NaiveDate, system: DateSystem) -> i64 {
    match system {
        DateSystem::Excel1900 => {
            let days = (date - EPOCH_1900).num_days();
            // Dates on or after 1900-03-01 get +1 to account for the phantom Feb 29
            if date >= MARCH_1_1900 { days + 1 } else { days }
        }
        DateSystem::Excel1904 => (date - EPOCH_1904).num_days(),
    }
}

/// Serial day number for a calendar date.
///
/// Returns `None` when the date precedes the start of the date system,
/// which Excel reports as `#NUM!`.
pub fn date_to_serial(date: NaiveDate, system: DateSystem) -> Option<f64> {
    let days = days_from_epoch(date, system);
    (days >= 0).then_some(days as f64)
}

/// Calendar date for a whole serial day number. Serial 60 in the 1900
/// system maps onto 1900-02-28 since the day it names never existed.
pub fn serial_to_date(serial: f64, system: DateSystem) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.trunc() as i64;
    match system {
        DateSystem::Excel1900 => {
            let offset = if days < 60 { days } else { days - 1 };
            EPOCH_1900.checked_add_signed(ChronoDur::days(offset))
        }
        DateSystem::Excel1904 => EPOCH_1904.checked_add_signed(ChronoDur::days(days)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn serials_around_phantom_leap_day() {
        let s = DateSystem::Excel1900;
        assert_eq!(date_to_serial(ymd(1899, 12, 31), s), Some(0.0));
        assert_eq!(date_to_serial(ymd(1900, 1, 1), s), Some(1.0));
        assert_eq!(date_to_serial(ymd(1900, 2, 28), s), Some(59.0));
        assert_eq!(date_to_serial(ymd(1900, 3, 1), s), Some(61.0));
        assert_eq!(date_to_serial(ymd(2008, 2, 1), s), Some(39479.0));
        assert_eq!(date_to_serial(ymd(1899, 12, 30), s), None);
        assert_eq!(serial_to_date(60.0, s), Some(ymd(1900, 2, 28)));
        assert_eq!(serial_to_date(61.0, s), Some(ymd(1900, 3, 1)));
        assert_eq!(days_from_epoch(ymd(1899, 12, 1), s), -30);
    }

    #[test]
    fn nineteen_oh_four_system() {
        let s = DateSystem::Excel1904;
        assert_eq!(date_to_serial(ymd(1904, 1, 1), s), Some(0.0));
        assert_eq!(date_to_serial(ymd(2008, 2, 1), s), Some(39479.0 - 1462.0));
        assert_eq!(serial_to_date(1.0, s), Some(ymd(1904, 1, 2)));
        assert_eq!(date_to_serial(ymd(1903, 12, 31), s), None);
    }
}
