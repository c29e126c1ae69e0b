//! Spline smoothing for rendering.
//!
//! `interpolate_curve` is total: fewer than two points returns the input
//! unchanged, so callers never have to special-case short series.

use crate::error::AnalysisError;
use crate::math::CubicSpline;

/// Build the interpolating spline for a series.
pub fn fit_spline(xs: &[f64], ys: &[f64]) -> Result<CubicSpline, AnalysisError> {
    CubicSpline::new(xs, ys)
}

/// Evaluate `spline` at `num_points` evenly spaced values across its domain
/// (both ends included).
pub fn resample(spline: &CubicSpline, num_points: usize) -> (Vec<f64>, Vec<f64>) {
    let (lo, hi) = spline.domain();
    let xs = linspace(lo, hi, num_points);
    let ys = xs.iter().map(|&x| spline.eval(x)).collect();
    (xs, ys)
}

/// Dense smooth version of a series.
pub fn interpolate_curve(
    xs: &[f64],
    ys: &[f64],
    num_points: usize,
) -> Result<(Vec<f64>, Vec<f64>), AnalysisError> {
    if xs.len() < 2 {
        return Ok((xs.to_vec(), ys.to_vec()));
    }
    let spline = fit_spline(xs, ys)?;
    Ok(resample(&spline, num_points))
}

/// `n` evenly spaced values over `[lo, hi]`; the last value is exactly `hi`.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n as f64 - 1.0);
            let mut out: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
            out[n - 1] = hi;
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn resample_on_knot_grid_reproduces_points() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 3.0, 4.0, 4.5, 4.7];
        let spline = fit_spline(&xs, &ys).unwrap();
        let (gx, gy) = resample(&spline, 5);
        for i in 0..5 {
            assert_abs_diff_eq!(gx[i], xs[i], epsilon = 1e-12);
            assert_abs_diff_eq!(gy[i], ys[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn default_resolution_has_500_points() {
        let (sx, sy) = interpolate_curve(&[0.0, 1.0, 2.0], &[1.0, 0.0, 1.0], 500).unwrap();
        assert_eq!(sx.len(), 500);
        assert_eq!(sy.len(), 500);
    }

    #[test]
    fn short_series_is_returned_unchanged() {
        assert_eq!(interpolate_curve(&[], &[], 500).unwrap(), (vec![], vec![]));
        assert_eq!(
            interpolate_curve(&[2.0], &[7.0], 500).unwrap(),
            (vec![2.0], vec![7.0])
        );
    }

    #[test]
    fn linspace_edges() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
    }

    proptest! {
        #[test]
        fn endpoints_are_preserved(
            steps in prop::collection::vec(0.05f64..3.0, 1..20),
            ys in prop::collection::vec(-10.0f64..10.0, 21),
        ) {
            let mut xs = vec![1.0];
            for s in &steps {
                let last = xs[xs.len() - 1];
                xs.push(last + s);
            }
            let ys = &ys[..xs.len()];
            let (sx, sy) = interpolate_curve(&xs, ys, 500).unwrap();
            let n = xs.len();
            prop_assert_eq!(sx[0], xs[0]);
            prop_assert_eq!(sx[499], xs[n - 1]);
            prop_assert!((sy[0] - ys[0]).abs() < 1e-9);
            prop_assert!((sy[499] - ys[n - 1]).abs() < 1e-6);
        }
    }
}
