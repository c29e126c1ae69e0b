//! Real roots of low-degree polynomials on the unit interval.
//!
//! Spline pieces are rescaled to `u ∈ [0, 1]` before solving so that the four
//! coefficients are of comparable magnitude; degeneracy checks are then plain
//! relative comparisons.
//!
//! Numerical notes:
//! - Closed forms (trigonometric for three real roots, Cardano otherwise) give
//!   starting values, which are polished with a few Newton steps.
//! - Exact zeros at `u = 0` and `u = 1` are reported directly so knots where
//!   the data itself is zero are never lost to rounding in the closed form.

use std::f64::consts::PI;

/// Relative size below which a leading coefficient is treated as zero.
const LEAD_EPS: f64 = 1e-12;

/// Slack allowed outside `[0, 1]` before clamping a root back in.
const EDGE_EPS: f64 = 1e-9;

const NEWTON_STEPS: usize = 4;

/// Evaluate `c[0] + c[1] u + c[2] u^2 + c[3] u^3`.
pub fn eval_cubic(c: &[f64; 4], u: f64) -> f64 {
    ((c[3] * u + c[2]) * u + c[1]) * u + c[0]
}

fn eval_cubic_deriv(c: &[f64; 4], u: f64) -> f64 {
    (3.0 * c[3] * u + 2.0 * c[2]) * u + c[1]
}

/// True when every coefficient is negligible relative to `scale`.
pub fn is_zero_cubic(c: &[f64; 4], scale: f64) -> bool {
    let tol = 1e-14 * scale.max(1.0);
    c.iter().all(|v| v.abs() <= tol)
}

/// Sorted real roots of the cubic `c` in `[0, 1]`.
///
/// `zero_tol` is the absolute value below which an endpoint evaluation counts
/// as an exact zero. The identically-zero polynomial has no isolated roots and
/// yields an empty vector.
pub fn cubic_roots_unit(c: &[f64; 4], zero_tol: f64) -> Vec<f64> {
    let scale = c.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 {
        return Vec::new();
    }

    let mut roots = Vec::new();
    if c[0].abs() <= zero_tol {
        roots.push(0.0);
    }
    if eval_cubic(c, 1.0).abs() <= zero_tol {
        roots.push(1.0);
    }

    for u in cubic_roots(c, scale) {
        let u = polish(c, u);
        if (-EDGE_EPS..=1.0 + EDGE_EPS).contains(&u) {
            roots.push(u.clamp(0.0, 1.0));
        }
    }

    roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    roots.dedup_by(|a, b| (*a - *b).abs() <= EDGE_EPS);
    roots
}

fn polish(c: &[f64; 4], mut u: f64) -> f64 {
    for _ in 0..NEWTON_STEPS {
        let d = eval_cubic_deriv(c, u);
        if d == 0.0 || !d.is_finite() {
            break;
        }
        let step = eval_cubic(c, u) / d;
        if !step.is_finite() {
            break;
        }
        u -= step;
    }
    u
}

/// All real roots of the cubic, unsorted, with degenerate leading terms
/// dropped to quadratic or linear solves.
fn cubic_roots(c: &[f64; 4], scale: f64) -> Vec<f64> {
    if c[3].abs() <= LEAD_EPS * scale {
        return quadratic_roots(c[0], c[1], c[2], scale);
    }

    // Normalize to u^3 + a u^2 + b u + k and depress with u = s - a/3.
    let a = c[2] / c[3];
    let b = c[1] / c[3];
    let k = c[0] / c[3];
    let shift = a / 3.0;
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + k;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let disc = half_q * half_q + third_p * third_p * third_p;

    if disc > 0.0 {
        let sq = disc.sqrt();
        let s = (-half_q + sq).cbrt() + (-half_q - sq).cbrt();
        vec![s - shift]
    } else if p.abs() < f64::EPSILON {
        vec![-shift]
    } else {
        // Three real roots (two coincide when disc == 0).
        let r = 2.0 * (-third_p).sqrt();
        let arg = ((3.0 * q) / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = arg.acos() / 3.0;
        (0..3)
            .map(|j| r * (phi - 2.0 * PI * j as f64 / 3.0).cos() - shift)
            .collect()
    }
}

fn quadratic_roots(c0: f64, c1: f64, c2: f64, scale: f64) -> Vec<f64> {
    if c2.abs() <= LEAD_EPS * scale {
        if c1.abs() <= LEAD_EPS * scale {
            return Vec::new();
        }
        return vec![-c0 / c1];
    }

    let disc = c1 * c1 - 4.0 * c2 * c0;
    if disc < 0.0 {
        // A near-touching parabola; report the vertex and let the caller's
        // polish/tolerance decide whether it is a root.
        let vertex = -c1 / (2.0 * c2);
        let value = c0 + c1 * vertex + c2 * vertex * vertex;
        if value.abs() <= 1e-12 * scale {
            return vec![vertex];
        }
        return Vec::new();
    }

    // Numerically stable form avoiding cancellation.
    let sq = disc.sqrt();
    let t = -0.5 * (c1 + c1.signum() * sq);
    if t == 0.0 {
        return vec![0.0];
    }
    vec![t / c2, c0 / t]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn from_roots(r: [f64; 3]) -> [f64; 4] {
        // (u - r0)(u - r1)(u - r2)
        let [a, b, c] = r;
        [-a * b * c, a * b + a * c + b * c, -(a + b + c), 1.0]
    }

    #[test]
    fn three_roots_inside_unit_interval() {
        let c = from_roots([0.1, 0.5, 0.9]);
        let roots = cubic_roots_unit(&c, 1e-14);
        assert_eq!(roots.len(), 3);
        assert_abs_diff_eq!(roots[0], 0.1, epsilon = 1e-10);
        assert_abs_diff_eq!(roots[1], 0.5, epsilon = 1e-10);
        assert_abs_diff_eq!(roots[2], 0.9, epsilon = 1e-10);
    }

    #[test]
    fn roots_outside_unit_interval_are_dropped() {
        let c = from_roots([-2.0, 0.25, 3.0]);
        let roots = cubic_roots_unit(&c, 1e-14);
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], 0.25, epsilon = 1e-10);
    }

    #[test]
    fn linear_piece_has_single_root() {
        let roots = cubic_roots_unit(&[1.0, -4.0, 0.0, 0.0], 1e-14);
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn exact_zero_at_endpoints_is_reported_once() {
        // u (u - 1) has roots exactly at both endpoints.
        let roots = cubic_roots_unit(&[0.0, -1.0, 1.0, 0.0], 1e-14);
        assert_eq!(roots, vec![0.0, 1.0]);
    }

    #[test]
    fn zero_polynomial_has_no_isolated_roots() {
        assert!(cubic_roots_unit(&[0.0; 4], 1e-14).is_empty());
        assert!(is_zero_cubic(&[0.0; 4], 1.0));
    }

    #[test]
    fn one_real_root_branch() {
        // u^3 + u - 0.5: single real root near 0.4534.
        let roots = cubic_roots_unit(&[-0.5, 1.0, 0.0, 1.0], 1e-14);
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(eval_cubic(&[-0.5, 1.0, 0.0, 1.0], roots[0]), 0.0, epsilon = 1e-12);
    }
}
