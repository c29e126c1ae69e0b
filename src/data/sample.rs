//! Synthetic charge/discharge data sets.
//!
//! Useful for demos and for exercising both sides of the pair decision:
//! - `ChargeDischarge`: an RC charge curve `v_max (1 - exp(-t/τ))` and a
//!   linear discharge ramp; they cross once inside the window.
//! - `ParallelLines`: two straight lines with equal slope, offset by a
//!   constant; they never cross.
//!
//! Gaussian noise is added to every voltage. Output is reproducible for a
//! given seed.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{SampleKind, SeriesTable};
use crate::error::AppError;

/// Peak voltage of the generated curves.
const V_MAX: f64 = 5.0;

/// Vertical gap between the two parallel lines.
const PARALLEL_OFFSET: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub kind: SampleKind,
    pub points: usize,
    pub t_max: f64,
    /// Standard deviation of the additive voltage noise.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            kind: SampleKind::ChargeDischarge,
            points: 25,
            t_max: 10.0,
            noise: 0.01,
            seed: 42,
        }
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<SeriesTable, AppError> {
    if config.points < 2 {
        return Err(AppError::new(2, "Sample needs at least 2 points."));
    }
    if !(config.t_max.is_finite() && config.t_max > 0.0) {
        return Err(AppError::new(2, "Sample time window must be finite and > 0."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Sample noise must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let step = config.t_max / (config.points as f64 - 1.0);
    let time: Vec<f64> = (0..config.points).map(|i| i as f64 * step).collect();

    let (headers, first, second): (Vec<String>, Vec<f64>, Vec<f64>) = match config.kind {
        SampleKind::ChargeDischarge => {
            let tau = config.t_max / 5.0;
            let charge = time.iter().map(|&t| V_MAX * (1.0 - (-t / tau).exp())).collect();
            let discharge = time.iter().map(|&t| V_MAX * (1.0 - t / config.t_max)).collect();
            (
                vec!["Time".into(), "Charge".into(), "Discharge".into()],
                charge,
                discharge,
            )
        }
        SampleKind::ParallelLines => {
            let slope = V_MAX / config.t_max;
            let lower = time.iter().map(|&t| slope * t).collect();
            let upper = time.iter().map(|&t| slope * t + PARALLEL_OFFSET).collect();
            (
                vec!["Time".into(), "Lower".into(), "Upper".into()],
                lower,
                upper,
            )
        }
    };

    let mut add_noise = |v: Vec<f64>| -> Vec<f64> {
        v.into_iter().map(|y| y + normal.sample(&mut rng)).collect()
    };
    let first = add_noise(first);
    let second = add_noise(second);

    Ok(SeriesTable {
        headers,
        columns: vec![time, first, second],
    })
}

/// Write a table as CSV (header row + one row per sample).
pub fn write_sample_csv(path: &Path, table: &SeriesTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;

    writer
        .write_record(&table.headers)
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;

    let rows = table.x().len();
    for r in 0..rows {
        let record: Vec<String> = table.columns.iter().map(|col| format!("{:.6}", col[r])).collect();
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))?;
    Ok(())
}
