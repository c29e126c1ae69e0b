//! Crossing point of two sampled curves.
//!
//! Two complementary checks:
//!
//! - `is_non_intersecting`: a cheap sign test on the sampled differences, used
//!   as a gate by the analyzer.
//! - `find_intersection`: the precise answer, from the roots of a spline built
//!   over the pointwise difference series.
//!
//! The difference spline is fit to `ys_a - ys_b` directly rather than taken as
//! the difference of the two per-series splines. Near inflection points the
//! two are not the same function and can produce different roots.

use crate::domain::Intersection;
use crate::error::AnalysisError;
use crate::fit::curve::fit_spline;
use crate::fit::linear::min_max;

/// Decimal places kept in reported intersections.
const ROUND_DP: i32 = 4;

/// First crossing of series A and B within `[min xs, max xs]`.
///
/// The voltage is read from A's own spline. Returns `None` for fewer than two
/// points, for series that never cross, and for identical series.
pub fn find_intersection(
    xs: &[f64],
    ys_a: &[f64],
    ys_b: &[f64],
) -> Result<Option<Intersection>, AnalysisError> {
    if xs.len() < 2 {
        return Ok(None);
    }
    if ys_a.len() != ys_b.len() {
        return Err(AnalysisError::LengthMismatch {
            x_len: ys_a.len(),
            y_len: ys_b.len(),
        });
    }

    let spline_a = fit_spline(xs, ys_a)?;
    let spline_b = fit_spline(xs, ys_b)?;
    let diff: Vec<f64> = ys_a.iter().zip(ys_b.iter()).map(|(a, b)| a - b).collect();
    let spline_diff = fit_spline(xs, &diff)?;

    let Some((lo, hi)) = min_max(xs) else {
        return Ok(None);
    };
    let Some(time) = spline_diff
        .roots()
        .into_iter()
        .find(|&r| lo <= r && r <= hi)
    else {
        return Ok(None);
    };

    let voltage = spline_a.eval(time);
    log::debug!(
        "intersection at t={time:.6}: a={voltage:.6} b={:.6}",
        spline_b.eval(time)
    );

    Ok(Some(Intersection {
        time: round_dp(time, ROUND_DP),
        voltage: round_dp(voltage, ROUND_DP),
    }))
}

/// True when `ys_a - ys_b` never changes sign over the samples.
///
/// Touching (a zero difference) does not count as crossing. Fewer than two
/// points is vacuously non-intersecting.
pub fn is_non_intersecting(xs: &[f64], ys_a: &[f64], ys_b: &[f64]) -> bool {
    if xs.len() < 2 {
        return true;
    }
    let diffs = ys_a.iter().zip(ys_b.iter()).map(|(a, b)| a - b);
    let (mut any_pos, mut any_neg) = (false, false);
    for d in diffs {
        any_pos |= d > 0.0;
        any_neg |= d < 0.0;
    }
    !(any_pos && any_neg)
}

fn round_dp(v: f64, dp: i32) -> f64 {
    let f = 10f64.powi(dp);
    (v * f).round() / f
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn charge_and_discharge_cross_between_one_and_two() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let charge = [0.0, 3.0, 4.0, 4.5];
        let discharge = [5.0, 4.0, 3.0, 2.0];

        let hit = find_intersection(&xs, &charge, &discharge).unwrap().unwrap();
        assert!(hit.time > 1.0 && hit.time < 2.0, "time {}", hit.time);
        // Between the two curves' local values on [1, 2].
        assert!(hit.voltage > 3.0 && hit.voltage < 4.0, "voltage {}", hit.voltage);
    }

    #[test]
    fn result_is_rounded_to_four_places() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let hit = find_intersection(&xs, &[0.0, 3.0, 4.0, 4.5], &[5.0, 4.0, 3.0, 2.0])
            .unwrap()
            .unwrap();
        assert_eq!(hit.time, (hit.time * 1e4).round() / 1e4);
        assert_eq!(hit.voltage, (hit.voltage * 1e4).round() / 1e4);
    }

    #[test]
    fn identical_series_have_no_intersection() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 1.0, 1.0, 1.0];
        assert_eq!(find_intersection(&xs, &ys, &ys).unwrap(), None);

        let curved = [0.0, 2.0, 3.0, 3.5];
        assert_eq!(find_intersection(&xs, &curved, &curved).unwrap(), None);
    }

    #[test]
    fn parallel_lines_have_no_intersection() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let a = [0.0, 1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0, 9.0];
        assert_eq!(find_intersection(&xs, &a, &b).unwrap(), None);
    }

    #[test]
    fn first_crossing_wins() {
        // Difference is sin-like with several zeros; expect the earliest.
        let xs: Vec<f64> = (0..=16).map(|i| 0.5 + i as f64 * 0.5).collect();
        let a: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
        let b = vec![0.0; xs.len()];
        let hit = find_intersection(&xs, &a, &b).unwrap().unwrap();
        assert!((hit.time - std::f64::consts::PI).abs() < 1e-2, "time {}", hit.time);
    }

    #[test]
    fn crossing_exactly_at_a_sample() {
        let xs = [0.0, 1.0, 2.0];
        let hit = find_intersection(&xs, &[0.0, 1.0, 2.0], &[2.0, 1.0, 0.0])
            .unwrap()
            .unwrap();
        assert_eq!(hit, Intersection { time: 1.0, voltage: 1.0 });
    }

    #[test]
    fn short_input_has_no_intersection() {
        assert_eq!(find_intersection(&[1.0], &[1.0], &[2.0]).unwrap(), None);
    }

    #[test]
    fn sign_check_truth_table() {
        let xs = [0.0, 1.0, 2.0];
        assert!(is_non_intersecting(&xs, &[3.0, 3.0, 3.0], &[1.0, 2.0, 2.5]));
        assert!(is_non_intersecting(&xs, &[0.0, 0.0, 0.0], &[1.0, 2.0, 2.5]));
        // Touching is not crossing.
        assert!(is_non_intersecting(&xs, &[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]));
        assert!(!is_non_intersecting(&xs, &[0.0, 2.0, 3.0], &[1.0, 1.0, 1.0]));
        assert!(is_non_intersecting(&[1.0], &[0.0], &[5.0]));
    }

    proptest! {
        #[test]
        fn strictly_above_never_intersects(
            b in prop::collection::vec(-50.0f64..50.0, 2..40),
            gap in prop::collection::vec(0.001f64..10.0, 40),
        ) {
            let xs: Vec<f64> = (0..b.len()).map(|i| i as f64).collect();
            let a: Vec<f64> = b.iter().zip(gap.iter()).map(|(y, g)| y + g).collect();
            prop_assert!(is_non_intersecting(&xs, &a, &b));
            prop_assert!(is_non_intersecting(&xs, &b, &a));
        }

        #[test]
        fn one_sign_flip_is_detected(
            b in prop::collection::vec(-50.0f64..50.0, 3..40),
            flip in 0usize..40,
        ) {
            let xs: Vec<f64> = (0..b.len()).map(|i| i as f64).collect();
            let flip = flip % b.len();
            let a: Vec<f64> = b
                .iter()
                .enumerate()
                .map(|(i, y)| if i == flip { y - 1.0 } else { y + 1.0 })
                .collect();
            prop_assert!(!is_non_intersecting(&xs, &a, &b));
        }
    }
}
