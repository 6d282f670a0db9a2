//! Array statistics over `&[f64]`.
//!
//! Empty or too-short inputs give `NaN`, except [`mode`], which has a
//! dedicated "no mode" outcome and reports it as `#N/A`.

use std::cmp::Ordering;

use sheetfn_common::EvalError;

pub fn sum(v: &[f64]) -> f64 {
    v.iter().sum()
}

pub fn sumsq(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

pub fn product(v: &[f64]) -> f64 {
    v.iter().product()
}

/// `NaN` when empty.
pub fn average(v: &[f64]) -> f64 {
    if v.is_empty() {
        return f64::NAN;
    }
    sum(v) / v.len() as f64
}

/// `NaN` when empty.
pub fn max(v: &[f64]) -> f64 {
    v.iter().copied().reduce(f64::max).unwrap_or(f64::NAN)
}

/// `NaN` when empty.
pub fn min(v: &[f64]) -> f64 {
    v.iter().copied().reduce(f64::min).unwrap_or(f64::NAN)
}

/// Sum of squared deviations from the mean.
///
/// Deviations are taken from data shifted by the first element, so an
/// array of identical values yields exactly `0.0`.
pub fn devsq(v: &[f64]) -> f64 {
    let Some(&pivot) = v.first() else {
        return f64::NAN;
    };
    let n = v.len() as f64;
    let mean_shift = v.iter().map(|x| x - pivot).sum::<f64>() / n;
    v.iter()
        .map(|x| {
            let d = (x - pivot) - mean_shift;
            d * d
        })
        .sum()
}

/// Mean absolute deviation.
pub fn avedev(v: &[f64]) -> f64 {
    if v.is_empty() {
        return f64::NAN;
    }
    let m = average(v);
    v.iter().map(|x| (x - m).abs()).sum::<f64>() / v.len() as f64
}

/// Sample variance (n - 1). `NaN` below two values.
pub fn var(v: &[f64]) -> f64 {
    if v.len() < 2 {
        return f64::NAN;
    }
    devsq(v) / (v.len() - 1) as f64
}

/// Population variance. `NaN` when empty.
pub fn varp(v: &[f64]) -> f64 {
    if v.is_empty() {
        return f64::NAN;
    }
    devsq(v) / v.len() as f64
}

/// Sample standard deviation (n - 1). `NaN` below two values.
pub fn stdev(v: &[f64]) -> f64 {
    var(v).sqrt()
}

fn sorted(v: &[f64]) -> Vec<f64> {
    let mut s = v.to_vec();
    s.sort_by(f64::total_cmp);
    s
}

pub fn median(v: &[f64]) -> f64 {
    if v.is_empty() {
        return f64::NAN;
    }
    let s = sorted(v);
    let mid = s.len() / 2;
    if s.len() % 2 == 1 {
        s[mid]
    } else {
        (s[mid - 1] + s[mid]) / 2.0
    }
}

/// Most frequent value; ties go to the value that occurs first.
///
/// Returns `#N/A` when no value repeats, including inputs shorter than two.
pub fn mode(v: &[f64]) -> Result<f64, EvalError> {
    let mut best: Option<(f64, usize)> = None;
    for (i, x) in v.iter().enumerate() {
        if v[..i].contains(x) {
            continue;
        }
        let count = 1 + v[i + 1..].iter().filter(|y| *y == x).count();
        if count > 1 && best.is_none_or(|(_, c)| count > c) {
            best = Some((*x, count));
        }
    }
    best.map(|(x, _)| x)
        .ok_or_else(|| EvalError::na().with_message("no value occurs more than once"))
}

/// `k`-th largest, 1-based. `NaN` when `k` is 0 or exceeds the length.
pub fn kth_largest(v: &[f64], k: usize) -> f64 {
    kth(v, k, |a, b| b.total_cmp(a))
}

/// `k`-th smallest, 1-based. `NaN` when `k` is 0 or exceeds the length.
pub fn kth_smallest(v: &[f64], k: usize) -> f64 {
    kth(v, k, f64::total_cmp)
}

fn kth(v: &[f64], k: usize, cmp: impl Fn(&f64, &f64) -> Ordering) -> f64 {
    if k == 0 || k > v.len() {
        return f64::NAN;
    }
    let mut s = v.to_vec();
    let (_, nth, _) = s.select_nth_unstable_by(k - 1, cmp);
    *nth
}

/* ─────────────────────── paired sums of squares ─────────────────────── */

fn paired(x: &[f64], y: &[f64], f: impl Fn(f64, f64) -> f64) -> f64 {
    if x.len() != y.len() {
        return f64::NAN;
    }
    x.iter().zip(y).map(|(a, b)| f(*a, *b)).sum()
}

/// Σ(x² - y²). `NaN` on length mismatch.
pub fn sumx2my2(x: &[f64], y: &[f64]) -> f64 {
    paired(x, y, |a, b| a * a - b * b)
}

/// Σ(x² + y²). `NaN` on length mismatch.
pub fn sumx2py2(x: &[f64], y: &[f64]) -> f64 {
    paired(x, y, |a, b| a * a + b * b)
}

/// Σ(x - y)². `NaN` on length mismatch.
pub fn sumxmy2(x: &[f64], y: &[f64]) -> f64 {
    paired(x, y, |a, b| (a - b) * (a - b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetfn_common::ErrorEval;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn deviation_family() {
        let v = [4.0, 5.0, 8.0, 7.0, 11.0, 4.0, 3.0];
        assert!(close(devsq(&v), 48.0));
        assert!(close(avedev(&v), 16.0 / 7.0));
        assert!(close(stdev(&v), 2.828_427_124_746_19));
        assert!(close(var(&v), 8.0));
        assert!(close(varp(&v), 48.0 / 7.0));
        assert!(stdev(&[1.0]).is_nan());
        assert!(devsq(&[]).is_nan());
        assert_eq!(stdev(&[0.1, 0.1, 0.1]), 0.0);
    }

    #[test]
    fn median_odd_even() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn mode_signals_na_without_repeats() {
        let v: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(mode(&v).unwrap_err(), ErrorEval::Na);
        assert_eq!(mode(&[1.0]).unwrap_err(), ErrorEval::Na);
        assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0]).unwrap(), 2.0);
        // tie: first value to reach the highest count wins
        assert_eq!(mode(&[3.0, 1.0, 1.0, 3.0]).unwrap(), 3.0);
        assert_eq!(mode(&[1.0, 3.0, 3.0, 1.0, 3.0]).unwrap(), 3.0);
    }

    #[test]
    fn kth_order_statistics() {
        let v = [3.0, 9.0, -1.0, 9.0, 4.0];
        assert_eq!(kth_largest(&v, 1), 9.0);
        assert_eq!(kth_largest(&v, 2), 9.0);
        assert_eq!(kth_largest(&v, 3), 4.0);
        assert_eq!(kth_smallest(&v, 1), -1.0);
        assert_eq!(kth_smallest(&v, 5), 9.0);
        assert!(kth_largest(&v, 0).is_nan());
        assert!(kth_smallest(&v, 6).is_nan());
    }

    #[test]
    fn paired_sums() {
        let x = [2.0, 3.0, 9.0, 1.0, 8.0, 7.0, 5.0];
        let y = [6.0, 5.0, 11.0, 7.0, 5.0, 4.0, 4.0];
        assert_eq!(sumx2my2(&x, &y), -55.0);
        assert_eq!(sumx2py2(&x, &y), 521.0);
        assert_eq!(sumxmy2(&x, &y), 79.0);
        assert!(sumxmy2(&x, &y[..3]).is_nan());
    }

    #[test]
    fn simple_reductions() {
        assert_eq!(sum(&[1.0, 2.0, 3.5]), 6.5);
        assert_eq!(sumsq(&[3.0, 4.0]), 25.0);
        assert_eq!(product(&[2.0, 3.0, 4.0]), 24.0);
        assert_eq!(average(&[2.0, 4.0]), 3.0);
        assert_eq!(max(&[2.0, -4.0]), 2.0);
        assert_eq!(min(&[2.0, -4.0]), -4.0);
        assert!(max(&[]).is_nan());
        assert!(average(&[]).is_nan());
    }
}
