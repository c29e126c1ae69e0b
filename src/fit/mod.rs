//! Curve analysis.
//!
//! Responsibilities:
//!
//! - smooth each series with a cubic spline (`curve`)
//! - OLS slope and R² linearity test (`linear`)
//! - RANSAC straight-line classification (`robust`)
//! - crossing points and the sign-based gate (`intersection`)
//! - per-series orchestration and the pair decision (`analyzer`)

pub mod analyzer;
pub mod curve;
pub mod intersection;
pub mod linear;
pub mod robust;

pub use analyzer::*;
pub use curve::*;
pub use intersection::*;
pub use linear::*;
pub use robust::*;
