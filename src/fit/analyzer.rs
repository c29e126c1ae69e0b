//! Per-series analysis and the two-series intersection decision.
//!
//! For every Y series we compute:
//! - the robust (RANSAC) classification and best-fit shape
//! - the OLS slope, R² and OLS straightness (displayed regardless of class)
//! - the dense spline resampling of the raw series
//!
//! Intersection logic only activates for exactly two series. The decision is
//! the table in `PairDecision::decide`; 1 or 3+ series never get one.

use crate::domain::{Analysis, AnalysisConfig, FitShape, PairDecision, SeriesAnalysis, SeriesTable};
use crate::error::AnalysisError;
use crate::fit::curve::interpolate_curve;
use crate::fit::intersection::{find_intersection, is_non_intersecting};
use crate::fit::linear::{fit_line, is_straight_line, r_squared};
use crate::fit::robust::RobustLineDetector;

#[derive(Debug, Clone)]
pub struct SeriesAnalyzer {
    config: AnalysisConfig,
    detector: RobustLineDetector,
}

impl SeriesAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let detector = RobustLineDetector::new(config.ransac.clone());
        Self { config, detector }
    }

    /// Analyze one Y series against the shared X column.
    pub fn analyze_series(&self, name: &str, xs: &[f64], ys: &[f64]) -> Result<SeriesAnalysis, AnalysisError> {
        if xs.len() != ys.len() {
            return Err(AnalysisError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }

        let fit = self.detector.fit(xs, ys, self.config.resolution)?;
        let line = fit_line(xs, ys);
        let r2 = r_squared(xs, ys, &line);
        let ols_straight = is_straight_line(xs, ys, self.config.linearity_tolerance);
        // Curved fits already carry the dense resampling of the raw series.
        let (smooth_x, smooth_y) = match &fit.shape {
            FitShape::Curve { xs: cx, ys: cy } => (cx.clone(), cy.clone()),
            FitShape::Line { .. } => interpolate_curve(xs, ys, self.config.resolution)?,
        };

        if xs.len() >= 2 && ols_straight != fit.is_straight {
            log::debug!(
                "series '{name}': robust says straight={}, OLS says straight={ols_straight} (R²={r2:.4})",
                fit.is_straight
            );
        }

        Ok(SeriesAnalysis {
            name: name.to_string(),
            data: ys.to_vec(),
            fit,
            smooth_x,
            smooth_y,
            slope: line.slope,
            r_squared: r2,
            ols_straight,
        })
    }

    /// Decide whether a pair of analyzed series should get an intersection.
    pub fn decide_pair(xs: &[f64], a: &SeriesAnalysis, b: &SeriesAnalysis) -> PairDecision {
        let non_intersecting = is_non_intersecting(xs, &a.data, &b.data);
        PairDecision::decide(a.fit.is_straight, b.fit.is_straight, non_intersecting)
    }

    /// Analyze every Y series of the table.
    pub fn analyze(&self, table: &SeriesTable) -> Result<Analysis, AnalysisError> {
        let xs = table.x();
        let series = table
            .y_series()
            .map(|(name, ys)| self.analyze_series(name, xs, ys))
            .collect::<Result<Vec<_>, _>>()?;

        let (decision, intersection) = match series.as_slice() {
            [a, b] => {
                let decision = Self::decide_pair(xs, a, b);
                log::debug!("pair '{}' / '{}': {decision:?}", a.name, b.name);
                let intersection = if decision.wants_intersection() {
                    find_intersection(xs, &a.data, &b.data)?
                } else {
                    None
                };
                (Some(decision), intersection)
            }
            _ => (None, None),
        };

        Ok(Analysis {
            x: xs.to_vec(),
            series,
            decision,
            intersection,
        })
    }
}

impl Default for SeriesAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
