//! Command-line parsing for the voltage-curve analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DEFAULT_RESOLUTION, InputFormat, SampleKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vc", version, about = "Curve classification and intersection finder for sampled series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify every series, find the crossing of a pair, and print or export the result.
    Analyze(AnalyzeArgs),
    /// Write a synthetic data set to CSV.
    Sample(SampleArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Input file: CSV with a header row, or a JSON request body.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format (auto picks from the file extension).
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// Seed for the robust line sampler.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Largest absolute residual still counted as an inlier.
    #[arg(long, default_value_t = 0.05)]
    pub residual_threshold: f64,

    /// Minimum inlier share for a series to count as straight.
    #[arg(long = "inlier-fraction", default_value_t = 0.8)]
    pub inlier_fraction: f64,

    /// OLS straightness tolerance (`R² > 1 - tol`).
    #[arg(long, default_value_t = 0.01)]
    pub linearity_tolerance: f64,

    /// Upper bound on robust sampling trials.
    #[arg(long, default_value_t = 100)]
    pub max_trials: usize,

    /// Number of points in the dense spline resampling.
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: usize,

    /// Plot title (overrides the request's `title`).
    #[arg(long)]
    pub title: Option<String>,

    /// X axis label (overrides the request's `axis_labels.x`).
    #[arg(long)]
    pub x_label: Option<String>,

    /// Y axis label (overrides the request's `axis_labels.y`).
    #[arg(long)]
    pub y_label: Option<String>,

    /// Write the JSON response to a file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Print the JSON response instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Default log filter when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// Shape of the generated data.
    #[arg(long, value_enum, default_value_t = SampleKind::ChargeDischarge)]
    pub kind: SampleKind,

    /// Number of samples per series.
    #[arg(long, default_value_t = 25)]
    pub points: usize,

    /// End of the time window (starts at 0).
    #[arg(long, default_value_t = 10.0)]
    pub t_max: f64,

    /// Standard deviation of Gaussian voltage noise.
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_defaults() {
        let cli = Cli::parse_from(["vc", "analyze", "data.csv"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.input, PathBuf::from("data.csv"));
        assert_eq!(args.format, InputFormat::Auto);
        assert_eq!(args.seed, 0);
        assert_eq!(args.residual_threshold, 0.05);
        assert_eq!(args.inlier_fraction, 0.8);
        assert_eq!(args.resolution, 500);
        assert!(args.plot && !args.no_plot && !args.json);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn sample_kind_is_kebab_case() {
        let cli = Cli::parse_from(["vc", "sample", "--out", "s.csv", "--kind", "parallel-lines"]);
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.kind, SampleKind::ParallelLines);
        assert_eq!(args.points, 25);
    }
}
