//! Outlier-tolerant straight-line detection (RANSAC).
//!
//! The detector answers one question per series: is it "effectively straight"
//! even with a few noisy points? It:
//!
//! - repeatedly samples two distinct points and draws the line through them
//! - counts inliers (`|residual| <= residual_threshold`)
//! - keeps the candidate with the most inliers (ties: higher R² on the inliers)
//! - refits by least squares on the winning inlier set
//!
//! Classification then compares `inliers / n` with `inlier_fraction_threshold`.
//! Sampling uses a `StdRng` seeded from the config on every call, so the same
//! input always produces the same answer.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use crate::domain::{FitShape, LineFit, RansacConfig, SeriesFit};
use crate::error::AnalysisError;
use crate::fit::curve::interpolate_curve;
use crate::fit::linear::{min_max, r_squared};
use crate::math::solve_line;

/// Points needed to define a candidate line.
const MIN_SAMPLES: usize = 2;

/// Result of a robust line fit.
#[derive(Debug, Clone)]
pub struct RobustLine {
    /// Least squares refit on the inliers of the best candidate.
    pub line: LineFit,
    pub inlier_mask: Vec<bool>,
    pub inlier_ratio: f64,
    /// Sampling trials actually run.
    pub trials: usize,
}

#[derive(Debug, Clone)]
struct Candidate {
    n_inliers: usize,
    score: f64,
    mask: Vec<bool>,
}

impl Candidate {
    /// More inliers wins; equal counts go to the higher R² on the inliers.
    fn beats(&self, other: &Candidate) -> bool {
        self.n_inliers > other.n_inliers || (self.n_inliers == other.n_inliers && self.score > other.score)
    }
}

#[derive(Debug, Clone)]
pub struct RobustLineDetector {
    config: RansacConfig,
}

impl RobustLineDetector {
    pub fn new(config: RansacConfig) -> Self {
        Self { config }
    }

    /// Run RANSAC. `None` when fewer than two points or no usable sample
    /// (e.g. every `x` identical).
    pub fn fit_line(&self, xs: &[f64], ys: &[f64]) -> Option<RobustLine> {
        let n = xs.len().min(ys.len());
        if n < MIN_SAMPLES {
            return None;
        }
        let xs = &xs[..n];
        let ys = &ys[..n];

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let threshold = self.config.residual_threshold;

        let mut best: Option<Candidate> = None;
        let mut budget = self.config.max_trials;
        let mut trials = 0usize;

        while trials < budget {
            trials += 1;

            let pick = index::sample(&mut rng, n, MIN_SAMPLES);
            let (i, j) = (pick.index(0), pick.index(1));
            let dx = xs[j] - xs[i];
            if dx == 0.0 || !dx.is_finite() {
                continue;
            }
            let slope = (ys[j] - ys[i]) / dx;
            let candidate_line = LineFit {
                slope,
                intercept: ys[i] - slope * xs[i],
            };

            let mask: Vec<bool> = xs
                .iter()
                .zip(ys.iter())
                .map(|(&x, &y)| (y - candidate_line.predict(x)).abs() <= threshold)
                .collect();
            let n_inliers = mask.iter().filter(|&&m| m).count();
            if n_inliers == 0 {
                continue;
            }

            let (in_x, in_y) = select(xs, ys, &mask);
            let score = r_squared(&in_x, &in_y, &candidate_line);

            let candidate = Candidate {
                n_inliers,
                score,
                mask,
            };
            if best.as_ref().is_none_or(|b| candidate.beats(b)) {
                budget = self
                    .config
                    .max_trials
                    .min(required_trials(n_inliers, n, self.config.stop_probability));
                best = Some(candidate);
            }
        }

        let best = best?;
        let idx: Vec<usize> = (0..n).filter(|&k| best.mask[k]).collect();
        let (intercept, slope) = solve_line(xs, ys, &idx)?;
        let inlier_ratio = best.n_inliers as f64 / n as f64;

        log::debug!(
            "ransac: n={n} trials={trials} inliers={} ratio={inlier_ratio:.3} slope={slope:.6}",
            best.n_inliers
        );

        Some(RobustLine {
            line: LineFit { slope, intercept },
            inlier_mask: best.mask,
            inlier_ratio,
            trials,
        })
    }

    /// Classify a series and produce its best-fit representation.
    ///
    /// Straight series get the two-point form of the robust line; everything
    /// else gets the dense spline of the raw series (outliers included).
    pub fn fit(&self, xs: &[f64], ys: &[f64], resolution: usize) -> Result<SeriesFit, AnalysisError> {
        if xs.len() < MIN_SAMPLES {
            return Ok(SeriesFit {
                shape: FitShape::Curve {
                    xs: xs.to_vec(),
                    ys: ys.to_vec(),
                },
                is_straight: false,
                inlier_ratio: None,
            });
        }

        let robust = self.fit_line(xs, ys);
        if let Some(r) = &robust {
            if r.inlier_ratio >= self.config.inlier_fraction_threshold {
                let (x0, x1) = min_max(xs).unwrap_or((0.0, 0.0));
                return Ok(SeriesFit {
                    shape: FitShape::Line {
                        x0,
                        x1,
                        y0: r.line.predict(x0),
                        y1: r.line.predict(x1),
                    },
                    is_straight: true,
                    inlier_ratio: Some(r.inlier_ratio),
                });
            }
        }

        let (cx, cy) = interpolate_curve(xs, ys, resolution)?;
        Ok(SeriesFit {
            shape: FitShape::Curve { xs: cx, ys: cy },
            is_straight: false,
            inlier_ratio: robust.map(|r| r.inlier_ratio),
        })
    }
}

impl Default for RobustLineDetector {
    fn default() -> Self {
        Self::new(RansacConfig::default())
    }
}

/// Trials needed to draw an all-inlier pair with `probability`, given the
/// current inlier share.
fn required_trials(n_inliers: usize, n: usize, probability: f64) -> usize {
    let ratio = n_inliers as f64 / n as f64;
    let nom = (1.0 - probability).max(f64::EPSILON);
    let denom = (1.0 - ratio.powi(MIN_SAMPLES as i32)).max(f64::EPSILON);
    if nom == 1.0 {
        return 0;
    }
    if denom == 1.0 {
        return usize::MAX;
    }
    (nom.ln() / denom.ln()).ceil().abs() as usize
}

fn select(xs: &[f64], ys: &[f64], mask: &[bool]) -> (Vec<f64>, Vec<f64>) {
    xs.iter()
        .zip(ys.iter())
        .zip(mask.iter())
        .filter(|(_, m)| **m)
        .map(|((&x, &y), _)| (x, y))
        .unzip()
}
