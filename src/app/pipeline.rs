//! Shared "analysis pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! request -> numeric table -> per-series fits -> pair decision -> response
//!
//! The CLI can then focus on presentation (printing, plotting, exporting).

use crate::domain::{Analysis, AnalysisConfig, SeriesTable};
use crate::error::AppError;
use crate::fit::SeriesAnalyzer;
use crate::io::ingest::{PlotRequest, parse_table};
use crate::io::response::{AnalysisResponse, build_response};

/// All computed outputs of a single `vc analyze` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub request: PlotRequest,
    pub table: SeriesTable,
    pub analysis: Analysis,
    pub response: AnalysisResponse,
}

/// Execute the full analysis pipeline on a loaded request.
pub fn run_analysis(request: PlotRequest, config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let table = parse_table(&request)?;

    let analysis = SeriesAnalyzer::new(config.clone()).analyze(&table)?;
    log::info!(
        "analyzed {} series over {} point(s); intersection={:?}",
        analysis.series.len(),
        analysis.x.len(),
        analysis.intersection
    );

    let response = build_response(&analysis, &request);

    Ok(RunOutput {
        request,
        table,
        analysis,
        response,
    })
}
