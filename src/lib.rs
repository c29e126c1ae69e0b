//! `vcurves` library crate.
//!
//! The binary (`vc`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the numeric core can sit behind other front ends (HTTP, notebooks)
//!
//! Layout: `math` (spline, polynomial roots, least squares) feeds `fit`
//! (line/curve fitters, robust detection, intersection, series analyzer);
//! `io`, `report` and `plot` sit at the boundary.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
