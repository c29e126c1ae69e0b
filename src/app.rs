//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - loads the request and runs the analysis pipeline
//! - prints the report/plot or the JSON response
//! - writes optional exports and synthetic samples

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, SampleArgs};
use crate::data::{SampleConfig, generate_sample, write_sample_csv};
use crate::domain::{AnalysisConfig, RansacConfig};
use crate::error::AppError;
use crate::io::ingest::load_request;
use crate::io::response::{render_error_json, write_response_json};

pub mod pipeline;

/// Entry point for the `vc` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may carry RUST_LOG, so load it before the logger reads the environment.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => {
            init_logging(&args.log_level);
            let json = args.json;
            handle_analyze(args).inspect_err(|err| {
                if json {
                    print_error_json(err);
                }
            })
        }
        Command::Sample(args) => {
            init_logging(&args.log_level);
            handle_sample(args)
        }
    }
}

fn init_logging(log_level: &str) {
    if let Err(e) = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).try_init() {
        log::debug!("logger already initialised: {e}");
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args)?;

    let mut request = load_request(&args.input, args.format)?;
    if let Some(title) = &args.title {
        request.title = title.clone();
    }
    if let Some(x) = &args.x_label {
        request.axis_labels.x = x.clone();
    }
    if let Some(y) = &args.y_label {
        request.axis_labels.y = y.clone();
    }

    let run = pipeline::run_analysis(request, &config)?;

    if args.json {
        let body = serde_json::to_string_pretty(&run.response)
            .map_err(|e| AppError::new(4, format!("Failed to serialize response: {e}")))?;
        println!("{body}");
    } else {
        println!(
            "{}",
            crate::report::format_analysis_summary(&run.request.title, &run.analysis)
        );
        if args.plot && !args.no_plot {
            println!(
                "{}",
                crate::plot::render_ascii_plot(&run.analysis, args.width, args.height)
            );
        }
    }

    if let Some(path) = &args.export {
        write_response_json(path, &run.response)?;
        log::info!("wrote response to {}", path.display());
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        kind: args.kind,
        points: args.points,
        t_max: args.t_max,
        noise: args.noise,
        seed: args.seed,
    };
    let table = generate_sample(&config)?;
    write_sample_csv(&args.out, &table)?;
    println!(
        "Wrote {} rows x {} series to {}",
        table.x().len(),
        table.y_count(),
        args.out.display()
    );
    Ok(())
}

fn print_error_json(err: &AppError) {
    match render_error_json(err) {
        Ok(body) => println!("{body}"),
        Err(e) => log::error!("{e}"),
    }
}

/// Resolve CLI flags into the core configuration.
pub fn analysis_config_from_args(args: &AnalyzeArgs) -> Result<AnalysisConfig, AppError> {
    if !(args.residual_threshold.is_finite() && args.residual_threshold >= 0.0) {
        return Err(AppError::new(2, "--residual-threshold must be finite and >= 0."));
    }
    if !(0.0..=1.0).contains(&args.inlier_fraction) {
        return Err(AppError::new(2, "--inlier-fraction must be within [0, 1]."));
    }
    if !(args.linearity_tolerance.is_finite() && args.linearity_tolerance >= 0.0) {
        return Err(AppError::new(2, "--linearity-tolerance must be finite and >= 0."));
    }
    if args.max_trials == 0 {
        return Err(AppError::new(2, "--max-trials must be at least 1."));
    }
    if args.resolution < 2 {
        return Err(AppError::new(2, "--resolution must be at least 2."));
    }

    Ok(AnalysisConfig {
        ransac: RansacConfig {
            residual_threshold: args.residual_threshold,
            inlier_fraction_threshold: args.inlier_fraction,
            max_trials: args.max_trials,
            seed: args.seed,
            ..RansacConfig::default()
        },
        linearity_tolerance: args.linearity_tolerance,
        resolution: args.resolution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn analyze_args(extra: &[&str]) -> AnalyzeArgs {
        let mut argv = vec!["vc", "analyze", "in.csv"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Analyze(args) => args,
            Command::Sample(_) => panic!("expected analyze"),
        }
    }

    #[test]
    fn flags_flow_into_config() {
        let args = analyze_args(&["--seed", "7", "--residual-threshold", "0.1", "--resolution", "50"]);
        let config = analysis_config_from_args(&args).unwrap();
        assert_eq!(config.ransac.seed, 7);
        assert_eq!(config.ransac.residual_threshold, 0.1);
        assert_eq!(config.ransac.stop_probability, 0.99);
        assert_eq!(config.resolution, 50);
    }

    #[test]
    fn out_of_range_flags_are_rejected() {
        let args = analyze_args(&["--inlier-fraction", "1.5"]);
        assert_eq!(analysis_config_from_args(&args).unwrap_err().exit_code(), 2);

        let args = analyze_args(&["--resolution", "1"]);
        assert!(analysis_config_from_args(&args).is_err());
    }
}
