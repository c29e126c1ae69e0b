//! Least squares solver.
//!
//! Every line in this crate (OLS slopes, RANSAC candidates and the final
//! inlier refit) is a small regression of the form:
//!
//! ```text
//! minimize Σ (y_i - (β0 + β1 x_i))^2
//! ```
//!
//! Implementation choices:
//! - The design matrix is tall (n × 2), so we solve through SVD rather than QR.
//!   (Nalgebra's `QR::solve` is intended for square systems.)
//! - SVD also gives a sensible minimum-norm answer when every `x` is equal,
//!   instead of failing outright.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = β0 + β1 x` over the selected indices.
///
/// Returns `(intercept, slope)`.
pub fn solve_line(xs: &[f64], ys: &[f64], idx: &[usize]) -> Option<(f64, f64)> {
    if idx.is_empty() {
        return None;
    }
    let n = idx.len();
    let mut design = DMatrix::<f64>::zeros(n, 2);
    let mut obs = DVector::<f64>::zeros(n);
    for (row, &i) in idx.iter().enumerate() {
        design[(row, 0)] = 1.0;
        design[(row, 1)] = xs[i];
        obs[row] = ys[i];
    }

    let beta = solve_least_squares(&design, &obs)?;
    Some((beta[0], beta[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn solve_line_uses_only_selected_rows() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 100.0, 7.0];
        let (b0, b1) = solve_line(&xs, &ys, &[0, 1, 3]).unwrap();
        assert!((b0 - 1.0).abs() < 1e-10);
        assert!((b1 - 2.0).abs() < 1e-10);
    }

    #[test]
    fn solve_line_rejects_empty_selection() {
        assert!(solve_line(&[1.0], &[1.0], &[]).is_none());
    }
}
