//! Ordinary least squares line fit and the R² linearity test.

use crate::domain::LineFit;
use crate::math::solve_line;

/// Degree-1 least squares fit.
///
/// Fewer than two points has no defined slope; we return a flat line through
/// the single value (or zero).
pub fn fit_line(xs: &[f64], ys: &[f64]) -> LineFit {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return LineFit {
            slope: 0.0,
            intercept: ys.first().copied().unwrap_or(0.0),
        };
    }

    let idx: Vec<usize> = (0..n).collect();
    match solve_line(xs, ys, &idx) {
        Some((intercept, slope)) => LineFit { slope, intercept },
        None => LineFit {
            slope: 0.0,
            intercept: mean(&ys[..n]),
        },
    }
}

/// Coefficient of determination of `line` on the series.
///
/// Zero total variance (every y equal) counts as a perfect fit.
pub fn r_squared(xs: &[f64], ys: &[f64], line: &LineFit) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 1.0;
    }
    let y_mean = mean(&ys[..n]);

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let r = y - line.predict(x);
        ss_res += r * r;
        let d = y - y_mean;
        ss_tot += d * d;
    }

    if ss_tot == 0.0 {
        return 1.0;
    }
    1.0 - ss_res / ss_tot
}

/// `R² > 1 - tolerance`. Series shorter than two points are never straight;
/// a horizontal series always is.
pub fn is_straight_line(xs: &[f64], ys: &[f64], tolerance: f64) -> bool {
    if xs.len() < 2 {
        return false;
    }
    if ys.iter().all(|&y| y == ys[0]) {
        return true;
    }
    let line = fit_line(xs, ys);
    r_squared(xs, ys, &line) > 1.0 - tolerance
}

/// Two-point representation of the OLS line over `[min x, max x]`.
pub fn line_endpoints(xs: &[f64], ys: &[f64]) -> ([f64; 2], [f64; 2]) {
    let line = fit_line(xs, ys);
    let (lo, hi) = min_max(xs).unwrap_or((0.0, 0.0));
    ([lo, hi], [line.predict(lo), line.predict(hi)])
}

pub(crate) fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((lo, hi))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
