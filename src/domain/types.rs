//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - produced by the numeric core without any framework types
//! - serialized into the JSON response
//! - rendered by the text report and the terminal plot

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default number of points in a dense spline resampling.
pub const DEFAULT_RESOLUTION: usize = 500;

/// How to read the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Pick from the file extension (`.json` → json, anything else → csv).
    Auto,
    /// Header row + data rows.
    Csv,
    /// Request body with `data`, `headers`, `title`, `axis_labels`.
    Json,
}

/// Shape of a generated synthetic data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SampleKind {
    /// Exponential charge curve and a linear discharge ramp that cross.
    ChargeDischarge,
    /// Two parallel straight lines offset by a constant.
    ParallelLines,
}

/// An ordinary least squares line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Best-fit representation of a series.
#[derive(Debug, Clone, PartialEq)]
pub enum FitShape {
    /// Two-point form of a fitted line over `[x0, x1]`.
    Line { x0: f64, x1: f64, y0: f64, y1: f64 },
    /// Dense (or, for degenerate input, raw) sequence of points.
    Curve { xs: Vec<f64>, ys: Vec<f64> },
}

impl FitShape {
    /// The shape as parallel x/y vectors, ready to plot.
    pub fn to_xy(&self) -> (Vec<f64>, Vec<f64>) {
        match self {
            FitShape::Line { x0, x1, y0, y1 } => (vec![*x0, *x1], vec![*y0, *y1]),
            FitShape::Curve { xs, ys } => (xs.clone(), ys.clone()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FitShape::Line { .. } => "line",
            FitShape::Curve { .. } => "curve",
        }
    }
}

/// Robust classification + representation of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFit {
    pub shape: FitShape,
    pub is_straight: bool,
    /// `None` when the series was too short to attempt a robust fit.
    pub inlier_ratio: Option<f64>,
}

/// Crossing point of two series, rounded to 4 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub time: f64,
    pub voltage: f64,
}

/// Why an intersection is computed for a pair of series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectReason {
    BothStraightCrossing,
    FirstCurved,
    SecondCurved,
    BothCurved,
}

/// Outcome of the two-series decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairDecision {
    /// Look for a crossing point.
    Intersect(IntersectReason),
    /// Both series are straight and never cross; show slopes instead.
    ShowSlopes,
}

impl PairDecision {
    /// Decision table over `(a_straight, b_straight, non_intersecting)`.
    ///
    /// Curved series may cross anywhere, so any curve forces an intersection
    /// search. Two straight lines only get one when the sign check says they
    /// actually cross.
    pub fn decide(a_straight: bool, b_straight: bool, non_intersecting: bool) -> Self {
        match (a_straight, b_straight, non_intersecting) {
            (true, true, true) => PairDecision::ShowSlopes,
            (true, true, false) => PairDecision::Intersect(IntersectReason::BothStraightCrossing),
            (false, true, _) => PairDecision::Intersect(IntersectReason::FirstCurved),
            (true, false, _) => PairDecision::Intersect(IntersectReason::SecondCurved),
            (false, false, _) => PairDecision::Intersect(IntersectReason::BothCurved),
        }
    }

    pub fn wants_intersection(self) -> bool {
        matches!(self, PairDecision::Intersect(_))
    }
}

/// RANSAC settings for straight-line detection.
#[derive(Debug, Clone)]
pub struct RansacConfig {
    /// Largest absolute residual still counted as an inlier (series units).
    pub residual_threshold: f64,
    /// Minimum inlier share for a series to be classified straight.
    pub inlier_fraction_threshold: f64,
    /// Upper bound on sampling trials.
    pub max_trials: usize,
    /// Confidence used to shrink the trial budget once a good model is found.
    pub stop_probability: f64,
    /// Seed for the subset sampler; identical input + seed gives identical output.
    pub seed: u64,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            residual_threshold: 0.05,
            inlier_fraction_threshold: 0.80,
            max_trials: 100,
            stop_probability: 0.99,
            seed: 0,
        }
    }
}

/// A full analysis configuration as understood by the core.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub ransac: RansacConfig,
    /// `R² > 1 - tolerance` counts as straight for the OLS check.
    pub linearity_tolerance: f64,
    /// Number of points in dense spline resamplings.
    pub resolution: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ransac: RansacConfig::default(),
            linearity_tolerance: 0.01,
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

/// Parsed numeric columns. Column 0 is X; the rest are Y series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<f64>>,
}

impl SeriesTable {
    pub fn x(&self) -> &[f64] {
        self.columns.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(name, values)` for every Y column.
    pub fn y_series(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.headers
            .iter()
            .zip(self.columns.iter())
            .skip(1)
            .map(|(name, col)| (name.as_str(), col.as_slice()))
    }

    pub fn y_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }
}

/// Plot title and axis labels (pass-through metadata).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabels {
    #[serde(default = "default_x_label")]
    pub x: String,
    #[serde(default = "default_y_label")]
    pub y: String,
}

impl Default for AxisLabels {
    fn default() -> Self {
        Self {
            x: default_x_label(),
            y: default_y_label(),
        }
    }
}

pub fn default_title() -> String {
    "Graph".to_string()
}

fn default_x_label() -> String {
    "Time".to_string()
}

fn default_y_label() -> String {
    "Voltage".to_string()
}

/// Everything computed for one Y series.
#[derive(Debug, Clone)]
pub struct SeriesAnalysis {
    pub name: String,
    pub data: Vec<f64>,
    pub fit: SeriesFit,
    /// Dense spline resampling of the raw series (raw data when degenerate).
    pub smooth_x: Vec<f64>,
    pub smooth_y: Vec<f64>,
    /// OLS slope, shown regardless of classification.
    pub slope: f64,
    pub r_squared: f64,
    /// OLS-based straightness (`R² > 1 - tolerance`).
    pub ols_straight: bool,
}

/// Output of a full analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub x: Vec<f64>,
    pub series: Vec<SeriesAnalysis>,
    /// Only set when exactly two Y series are present.
    pub decision: Option<PairDecision>,
    pub intersection: Option<Intersection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_table_covers_all_cases() {
        use IntersectReason::*;
        assert_eq!(PairDecision::decide(true, true, true), PairDecision::ShowSlopes);
        assert_eq!(
            PairDecision::decide(true, true, false),
            PairDecision::Intersect(BothStraightCrossing)
        );
        for non_int in [true, false] {
            assert_eq!(PairDecision::decide(false, true, non_int), PairDecision::Intersect(FirstCurved));
            assert_eq!(PairDecision::decide(true, false, non_int), PairDecision::Intersect(SecondCurved));
            assert_eq!(PairDecision::decide(false, false, non_int), PairDecision::Intersect(BothCurved));
        }
    }

    #[test]
    fn series_table_splits_x_and_y() {
        let t = SeriesTable {
            headers: vec!["t".into(), "a".into(), "b".into()],
            columns: vec![vec![0.0, 1.0], vec![1.0, 2.0], vec![3.0, 4.0]],
        };
        assert_eq!(t.x(), &[0.0, 1.0]);
        assert_eq!(t.y_count(), 2);
        let names: Vec<&str> = t.y_series().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn line_shape_exposes_two_points() {
        let shape = FitShape::Line { x0: 0.0, x1: 4.0, y0: 1.0, y1: 9.0 };
        assert_eq!(shape.kind(), "line");
        assert_eq!(shape.to_xy(), (vec![0.0, 4.0], vec![1.0, 9.0]));
    }
}
