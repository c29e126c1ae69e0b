//! Not-a-knot cubic spline interpolation.
//!
//! The spline passes exactly through every knot and is C² continuous. At the
//! second and second-to-last knots the third derivative is also continuous
//! ("not-a-knot"), which is the usual default for data without known end
//! slopes.
//!
//! Construction solves for the knot second derivatives `M_i`:
//!
//! ```text
//! h_{i-1} M_{i-1} + 2 (h_{i-1} + h_i) M_i + h_i M_{i+1} = 6 (δ_i - δ_{i-1})
//! ```
//!
//! The two not-a-knot rows are eliminated into the first and last interior
//! equations so the remaining system stays tridiagonal (Thomas algorithm).
//! With two knots the spline is the straight segment; with three it is the
//! single parabola through them.

use crate::error::AnalysisError;
use crate::math::poly::{cubic_roots_unit, is_zero_cubic};

/// Relative tolerance used to merge roots found on both sides of a knot.
const ROOT_MERGE_EPS: f64 = 1e-9;

/// A piecewise cubic interpolant.
///
/// Piece `i` covers `[x_i, x_{i+1}]` and is stored as
/// `y = a + b d + c d^2 + e d^3` with `d = x - x_i`.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    coeffs: Vec<[f64; 4]>,
    y_scale: f64,
}

impl CubicSpline {
    /// Build the spline through `(xs[i], ys[i])`.
    ///
    /// Errors on fewer than two points, mismatched lengths, non-finite values
    /// or `xs` that is not strictly increasing.
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, AnalysisError> {
        validate(xs, ys)?;

        let n = xs.len();
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let delta: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();
        let m = second_derivatives(&h, &delta);

        let coeffs = (0..n - 1)
            .map(|i| {
                let hi = h[i];
                [
                    ys[i],
                    delta[i] - hi * (2.0 * m[i] + m[i + 1]) / 6.0,
                    m[i] / 2.0,
                    (m[i + 1] - m[i]) / (6.0 * hi),
                ]
            })
            .collect();

        let y_scale = ys.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

        Ok(Self {
            xs: xs.to_vec(),
            coeffs,
            y_scale,
        })
    }

    /// `(first knot, last knot)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Evaluate at `x`. Outside the knot range the boundary piece is extended.
    pub fn eval(&self, x: f64) -> f64 {
        let i = self.segment_index(x);
        let [a, b, c, e] = self.coeffs[i];
        let d = x - self.xs[i];
        ((e * d + c) * d + b) * d + a
    }

    /// Real roots inside the knot domain, ascending.
    ///
    /// Pieces that are identically zero contribute nothing: a spline that is
    /// zero over a whole interval has no isolated crossing there.
    pub fn roots(&self) -> Vec<f64> {
        let zero_tol = 1e-14 * self.y_scale.max(1.0);
        let span = (self.domain().1 - self.domain().0).abs().max(1.0);

        let mut out: Vec<f64> = Vec::new();
        for (i, &[a, b, c, e]) in self.coeffs.iter().enumerate() {
            let h = self.xs[i + 1] - self.xs[i];
            // Rescale to u = d / h so all coefficients are comparable.
            let unit = [a, b * h, c * h * h, e * h * h * h];
            if is_zero_cubic(&unit, self.y_scale) {
                continue;
            }
            for u in cubic_roots_unit(&unit, zero_tol) {
                let x = self.xs[i] + u * h;
                if let Some(&last) = out.last() {
                    if (x - last).abs() <= ROOT_MERGE_EPS * span {
                        continue;
                    }
                }
                out.push(x);
            }
        }
        out
    }

    fn segment_index(&self, x: f64) -> usize {
        let last = self.coeffs.len() - 1;
        // Number of knots <= x, minus one, clamped to the valid piece range.
        let pos = self.xs.partition_point(|&k| k <= x);
        pos.saturating_sub(1).min(last)
    }
}

fn validate(xs: &[f64], ys: &[f64]) -> Result<(), AnalysisError> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::LengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(AnalysisError::InsufficientData { got: xs.len() });
    }
    if let Some(index) = xs
        .iter()
        .zip(ys.iter())
        .position(|(x, y)| !(x.is_finite() && y.is_finite()))
    {
        return Err(AnalysisError::NonFiniteValue { index });
    }
    if let Some(pos) = xs.windows(2).position(|w| w[1] <= w[0]) {
        return Err(AnalysisError::NotStrictlyIncreasing { index: pos + 1 });
    }
    Ok(())
}

/// Knot second derivatives under not-a-knot end conditions.
fn second_derivatives(h: &[f64], delta: &[f64]) -> Vec<f64> {
    let n = h.len() + 1;
    match n {
        2 => vec![0.0, 0.0],
        3 => {
            // Single parabola: constant second derivative.
            let m = 2.0 * (delta[1] - delta[0]) / (h[0] + h[1]);
            vec![m, m, m]
        }
        _ => not_a_knot_system(h, delta),
    }
}

fn not_a_knot_system(h: &[f64], delta: &[f64]) -> Vec<f64> {
    let n = h.len() + 1;
    let size = n - 2;

    let mut sub = vec![0.0; size];
    let mut diag = vec![0.0; size];
    let mut sup = vec![0.0; size];
    let mut rhs = vec![0.0; size];

    for k in 0..size {
        let i = k + 1;
        sub[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        sup[k] = h[i];
        rhs[k] = 6.0 * (delta[i] - delta[i - 1]);
    }

    // M_0 = ((h0 + h1) M_1 - h0 M_2) / h1, folded into the first row.
    let (h0, h1) = (h[0], h[1]);
    diag[0] += h0 * (h0 + h1) / h1;
    sup[0] -= h0 * h0 / h1;

    // M_{n-1} = ((a + b) M_{n-2} - b M_{n-3}) / a, folded into the last row.
    let (a, b) = (h[n - 3], h[n - 2]);
    diag[size - 1] += b * (a + b) / a;
    sub[size - 1] -= b * b / a;

    let inner = solve_tridiagonal(&sub, &diag, &sup, &rhs);

    let mut m = Vec::with_capacity(n);
    m.push(((h0 + h1) * inner[0] - h0 * inner[1]) / h1);
    m.extend_from_slice(&inner);
    m.push(((a + b) * inner[size - 1] - b * inner[size - 2]) / a);
    m
}

/// Thomas algorithm. `sub[0]` and `sup[len-1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    c_prime[0] = sup[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c_prime[i - 1];
        c_prime[i] = if i + 1 < n { sup[i] / denom } else { 0.0 };
        d_prime[i] = (rhs[i] - sub[i] * d_prime[i - 1]) / denom;
    }

    let mut out = vec![0.0; n];
    out[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = d_prime[i] - c_prime[i] * out[i + 1];
    }
    out
}
