//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input/config enums (`InputFormat`, `SampleKind`) and `AnalysisConfig`
//! - parsed columns (`SeriesTable`)
//! - fit outputs (`SeriesFit`, `FitShape`, `Intersection`, `Analysis`)
//! - the two-series decision table (`PairDecision`)

pub mod types;

pub use types::*;
