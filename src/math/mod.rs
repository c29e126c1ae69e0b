//! Mathematical utilities: least squares, cubic splines and polynomial roots.

pub mod ols;
pub mod poly;
pub mod spline;

pub use ols::*;
pub use spline::CubicSpline;
