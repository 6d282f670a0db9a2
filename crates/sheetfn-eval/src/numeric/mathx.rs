//! Scalar math kernels.
//!
//! Everything here works on plain `f64`/integers and reports domain
//! violations as `NaN` (or `±inf` on overflow). Callers at the function
//! boundary turn non-finite results into `#NUM!`.

/* ─────────────────────────── sign ──────────────────────────── */

/// -1, 0 or 1. `NaN` stays `NaN`.
pub fn sign(x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub fn sign_int(x: i64) -> i64 {
    x.signum()
}

/* ─────────────────────────── hyperbolics ──────────────────────────── */

pub fn sinh(x: f64) -> f64 {
    x.sinh()
}

pub fn cosh(x: f64) -> f64 {
    x.cosh()
}

pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

pub fn asinh(x: f64) -> f64 {
    x.asinh()
}

/// `NaN` below 1.
pub fn acosh(x: f64) -> f64 {
    if x < 1.0 { f64::NAN } else { x.acosh() }
}

/// `NaN` outside [-1, 1]; ±inf at the end points.
pub fn atanh(x: f64) -> f64 {
    if x.abs() > 1.0 { f64::NAN } else { x.atanh() }
}

/* ─────────────────────────── combinatorics ──────────────────────────── */

/// `n!`. Negative `n` is `NaN`; anything past 170! overflows to `+inf`.
pub fn factorial(n: i32) -> f64 {
    if n < 0 {
        return f64::NAN;
    }
    if n > 170 {
        return f64::INFINITY;
    }
    (2..=n).fold(1.0, |acc, i| acc * i as f64)
}

/// Binomial coefficient. `NaN` when `n < 0`, `k < 0` or `k > n`.
pub fn n_choose_k(n: i32, k: i32) -> f64 {
    if n < 0 || k < 0 || k > n {
        return f64::NAN;
    }
    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut exact: u128 = 1;
    let mut i = 0;
    while i < k {
        // C(n, i) * (n - i) is always divisible by i + 1
        match exact.checked_mul(n - i) {
            Some(p) => exact = p / (i + 1),
            None => break,
        }
        i += 1;
    }
    if i == k {
        return exact as f64;
    }
    let mut acc = 1.0_f64;
    for i in 0..k {
        acc = acc * (n - i) as f64 / (i + 1) as f64;
        if acc.is_infinite() {
            break;
        }
    }
    acc.round()
}

/* ─────────────────────────── rounding ──────────────────────────── */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundMode {
    HalfUp,
    Up,
    Down,
}

/// Round half away from zero to `digits` places. Negative `digits` round
/// to the left of the decimal point: `round(150.0, -2) == 200.0`.
pub fn round(n: f64, digits: i32) -> f64 {
    round_decimal(n, digits, RoundMode::HalfUp)
}

/// Round away from zero: `round_up(101.0, -2) == 200.0`.
pub fn round_up(n: f64, digits: i32) -> f64 {
    round_decimal(n, digits, RoundMode::Up)
}

/// Truncate toward zero: `round_down(199.0, -2) == 100.0`.
pub fn round_down(n: f64, digits: i32) -> f64 {
    round_decimal(n, digits, RoundMode::Down)
}

/// Decimal rounding on the 15 significant digits Excel keeps, so binary
/// noise like 2.675 -> 2.67499999... does not leak into the result.
fn round_decimal(n: f64, digits: i32, mode: RoundMode) -> f64 {
    if !n.is_finite() {
        return f64::NAN;
    }
    if n == 0.0 {
        return 0.0;
    }
    let repr = format!("{:.14e}", n.abs());
    let Some((mantissa, exp)) = repr.split_once('e') else {
        return f64::NAN;
    };
    let Ok(exp) = exp.parse::<i64>() else {
        return f64::NAN;
    };
    let sig: Vec<u8> = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();

    // digit i has place value 10^(exp - i); keep those at or above 10^(-digits)
    let keep = exp + digits as i64 + 1;
    if keep >= sig.len() as i64 {
        return n;
    }

    let int = if keep < 0 {
        // every significant digit sits below the rounding place
        match mode {
            RoundMode::Up => 1,
            RoundMode::HalfUp | RoundMode::Down => return 0.0,
        }
    } else {
        let (kept, dropped) = sig.split_at(keep as usize);
        let int = kept.iter().fold(0u64, |acc, d| acc * 10 + *d as u64);
        let bump = match mode {
            RoundMode::Down => false,
            RoundMode::Up => dropped.iter().any(|d| *d != 0),
            RoundMode::HalfUp => dropped[0] >= 5,
        };
        if bump { int + 1 } else { int }
    };
    if int == 0 {
        return 0.0;
    }
    let magnitude = format!("{int}e{}", -(digits as i64))
        .parse::<f64>()
        .unwrap_or(f64::NAN);
    magnitude.copysign(n)
}

/// Trim binary noise from a computed multiple by going through 15 significant digits.
fn to_15_digits(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    format!("{x:.14e}").parse().unwrap_or(x)
}

/// `n / s` with quotients that are a hair off an integer snapped onto it.
fn snapped_quotient(n: f64, s: f64) -> f64 {
    let q = n / s;
    let r = q.round();
    if (q - r).abs() <= 1e-12 * r.abs().max(1.0) {
        r
    } else {
        q
    }
}

fn signs_differ(n: f64, s: f64) -> bool {
    (n > 0.0 && s < 0.0) || (n < 0.0 && s > 0.0)
}

/// Round `n` away from zero to a multiple of `s`.
///
/// `NaN` when the signs of `n` and `s` differ; `0` when either is zero.
pub fn ceiling(n: f64, s: f64) -> f64 {
    if signs_differ(n, s) {
        return f64::NAN;
    }
    if n == 0.0 || s == 0.0 {
        return 0.0;
    }
    to_15_digits(snapped_quotient(n, s).ceil() * s)
}

/// Round `n` toward zero to a multiple of `s`.
///
/// `NaN` when the signs differ or when `s` is zero and `n` is not.
pub fn floor(n: f64, s: f64) -> f64 {
    if signs_differ(n, s) {
        return f64::NAN;
    }
    if n == 0.0 {
        return 0.0;
    }
    if s == 0.0 {
        return f64::NAN;
    }
    to_15_digits(snapped_quotient(n, s).floor() * s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_way_points_disagree() {
        assert_eq!(round(150.0, -2), 200.0);
        assert_eq!(round_up(150.0, -2), 200.0);
        assert_eq!(round_down(150.0, -2), 100.0);

        assert_eq!(round(-150.0, -2), -200.0);
        assert_eq!(round_down(-150.0, -2), -100.0);
    }

    #[test]
    fn rounding_uses_fifteen_digits() {
        assert_eq!(round(2.675, 2), 2.68);
        assert_eq!(round(1.005, 2), 1.01);
        assert_eq!(round(-2.5, 0), -3.0);
        assert_eq!(round(0.5, 0), 1.0);
        assert_eq!(round(0.4999, 0), 0.0);
        assert_eq!(round(3.14159, 3), 3.142);
        assert_eq!(round(49.0, -2), 0.0);
        assert_eq!(round(0.001, -3), 0.0);
    }

    #[test]
    fn round_up_and_down() {
        assert_eq!(round_up(0.001, 0), 1.0);
        assert_eq!(round_up(3.2, 0), 4.0);
        assert_eq!(round_up(-3.2, 0), -4.0);
        assert_eq!(round_up(31415.92654, -2), 31500.0);
        assert_eq!(round_up(5.0, 0), 5.0);
        assert_eq!(round_down(3.7, 0), 3.0);
        assert_eq!(round_down(-3.14159, 1), -3.1);
        assert_eq!(round_down(0.001, -3), 0.0);
    }

    #[test]
    fn rounding_passes_through_non_finite_as_nan() {
        assert!(round(f64::NAN, 1).is_nan());
        assert!(round_up(f64::INFINITY, 1).is_nan());
        assert_eq!(round(1.25, 20), 1.25);
    }

    #[test]
    fn ceiling_floor_sign_rule() {
        assert!(ceiling(2.5, -1.0).is_nan());
        assert!(ceiling(-2.5, 1.0).is_nan());
        assert!(floor(2.5, -1.0).is_nan());
        assert!(floor(-2.5, 1.0).is_nan());

        assert_eq!(ceiling(2.5, 1.0), 3.0);
        assert_eq!(ceiling(-2.5, -2.0), -4.0);
        assert_eq!(floor(2.5, 1.0), 2.0);
        assert_eq!(floor(-2.5, -2.0), -2.0);
        assert_eq!(ceiling(0.234, 0.01), 0.24);
        assert_eq!(ceiling(0.3, 0.1), 0.3);
        assert_eq!(floor(1.58, 0.1), 1.5);
    }

    #[test]
    fn ceiling_floor_zero_cases() {
        assert_eq!(ceiling(5.0, 0.0), 0.0);
        assert_eq!(ceiling(0.0, 3.0), 0.0);
        assert_eq!(floor(0.0, 0.0), 0.0);
        assert!(floor(5.0, 0.0).is_nan());
    }

    #[test]
    fn factorial_and_combinations() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(5), 120.0);
        assert!(factorial(-1).is_nan());
        assert_eq!(factorial(171), f64::INFINITY);
        assert!(factorial(170).is_finite());

        assert_eq!(n_choose_k(5, 0), 1.0);
        assert_eq!(n_choose_k(8, 2), 28.0);
        assert_eq!(n_choose_k(50, 25), 126_410_606_437_752.0);
        assert!(n_choose_k(0, 1).is_nan());
        assert!(n_choose_k(-1, 0).is_nan());
        assert!(n_choose_k(3, -1).is_nan());
    }

    #[test]
    fn signs_and_hyperbolics() {
        assert_eq!(sign(-0.5), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign_int(-7), -1);
        assert_eq!(sign_int(0), 0);
        assert!(acosh(0.5).is_nan());
        assert_eq!(acosh(1.0), 0.0);
        assert!(atanh(1.5).is_nan());
        assert_eq!(atanh(1.0), f64::INFINITY);
        assert!((sinh(1.0) - 1.175_201_193_643_801_4).abs() < 1e-15);
        assert!((asinh(sinh(0.7)) - 0.7).abs() < 1e-15);
        assert!((tanh(0.5) - sinh(0.5) / cosh(0.5)).abs() < 1e-15);
    }
}
