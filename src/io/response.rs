//! JSON response shape.
//!
//! The response is what a plotting front end needs to draw the figure: raw
//! points, the best-fit shape and the dense spline for every series, the
//! crossing point (if any) and a layout block.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Analysis, Intersection, SeriesAnalysis};
use crate::error::AppError;
use crate::io::ingest::PlotRequest;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub x_data: Vec<f64>,
    pub series: Vec<SeriesPayload>,
    pub intersection: Option<Intersection>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesPayload {
    pub name: String,
    pub data: Vec<f64>,
    pub fit: FitPayload,
    pub smooth_x: Vec<f64>,
    pub smooth_y: Vec<f64>,
    pub is_straight: bool,
    pub slope: f64,
    pub r_squared: f64,
    pub inlier_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FitPayload {
    /// `"line"` or `"curve"`.
    pub kind: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: AxisTitle,
    pub yaxis: AxisTitle,
    pub annotations: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTitle {
    pub title: String,
}

/// Body printed instead of a response when a run fails.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&SeriesAnalysis> for SeriesPayload {
    fn from(s: &SeriesAnalysis) -> Self {
        let (x, y) = s.fit.shape.to_xy();
        Self {
            name: s.name.clone(),
            data: s.data.clone(),
            fit: FitPayload {
                kind: s.fit.shape.kind(),
                x,
                y,
            },
            smooth_x: s.smooth_x.clone(),
            smooth_y: s.smooth_y.clone(),
            is_straight: s.fit.is_straight,
            slope: s.slope,
            r_squared: s.r_squared,
            inlier_ratio: s.fit.inlier_ratio,
        }
    }
}

/// Assemble the response from an analysis and the request's metadata.
pub fn build_response(analysis: &Analysis, request: &PlotRequest) -> AnalysisResponse {
    AnalysisResponse {
        x_data: analysis.x.clone(),
        series: analysis.series.iter().map(SeriesPayload::from).collect(),
        intersection: analysis.intersection,
        layout: Layout {
            title: request.title.clone(),
            xaxis: AxisTitle {
                title: request.axis_labels.x.clone(),
            },
            yaxis: AxisTitle {
                title: request.axis_labels.y.clone(),
            },
            annotations: request.annotations.clone(),
        },
    }
}

pub fn write_response_json(path: &Path, response: &AnalysisResponse) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create response JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, response)
        .map_err(|e| AppError::new(2, format!("Failed to write response JSON: {e}")))?;
    Ok(())
}

/// The `{"error": ...}` body for a failed run.
pub fn render_error_json(err: &AppError) -> Result<String, AppError> {
    let body = ErrorResponse {
        error: err.message().to_string(),
    };
    serde_json::to_string(&body).map_err(|e| AppError::new(4, format!("Failed to serialize error body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::SeriesAnalyzer;
    use crate::io::ingest::parse_table;
    use serde_json::json;

    fn request(value: Value) -> PlotRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn response_carries_series_and_layout() {
        let req = request(json!({
            "data": [[0, 0, 5], [1, 3, 4], [2, 4, 3], [3, 4.5, 2]],
            "headers": ["Time", "Charge", "Discharge"],
            "annotations": [{"text": "note"}]
        }));
        let table = parse_table(&req).unwrap();
        let analysis = SeriesAnalyzer::default().analyze(&table).unwrap();
        let body = serde_json::to_value(build_response(&analysis, &req)).unwrap();

        assert_eq!(body["x_data"], json!([0.0, 1.0, 2.0, 3.0]));
        assert_eq!(body["series"][0]["name"], "Charge");
        assert_eq!(body["series"][0]["fit"]["kind"], "curve");
        assert_eq!(body["series"][1]["fit"]["kind"], "line");
        assert_eq!(body["series"][1]["fit"]["x"], json!([0.0, 3.0]));
        assert_eq!(body["series"][0]["smooth_x"].as_array().unwrap().len(), 500);
        assert!(body["intersection"]["time"].is_number());
        assert_eq!(body["layout"]["title"], "Graph");
        assert_eq!(body["layout"]["xaxis"]["title"], "Time");
        assert_eq!(body["layout"]["yaxis"]["title"], "Voltage");
        assert_eq!(body["layout"]["annotations"], json!([{"text": "note"}]));
    }

    #[test]
    fn missing_intersection_serializes_as_null() {
        let req = request(json!({
            "data": [[0, 0, 5], [1, 1, 6], [2, 2, 7]],
            "headers": ["t", "a", "b"],
            "title": "Parallel",
            "axis_labels": {"x": "s", "y": "V"}
        }));
        let table = parse_table(&req).unwrap();
        let analysis = SeriesAnalyzer::default().analyze(&table).unwrap();
        let body = serde_json::to_value(build_response(&analysis, &req)).unwrap();

        assert!(body["intersection"].is_null());
        assert_eq!(body["layout"]["title"], "Parallel");
        assert_eq!(body["layout"]["xaxis"]["title"], "s");
    }

    #[test]
    fn error_body_carries_the_message() {
        let req = request(json!({ "data": [], "headers": ["t", "v"] }));
        let err = parse_table(&req).unwrap_err();
        let body: Value = serde_json::from_str(&render_error_json(&err).unwrap()).unwrap();
        assert_eq!(body, json!({"error": "No data provided"}));
    }

    #[test]
    fn exported_response_reads_back() {
        let req = request(json!({
            "data": [[0, 0, 4], [1, 1, 3], [2, 2, 2], [3, 3, 1], [4, 4, 0]],
            "headers": ["Time", "Up", "Down"]
        }));
        let table = parse_table(&req).unwrap();
        let analysis = SeriesAnalyzer::default().analyze(&table).unwrap();
        let response = build_response(&analysis, &req);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_response_json(&path, &response).unwrap();

        let body: Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(body["x_data"], json!([0.0, 1.0, 2.0, 3.0, 4.0]));
        let series = body["series"].as_array().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0]["name"], "Up");
        assert_eq!(series[1]["name"], "Down");
        assert_eq!(series[1]["is_straight"], true);
        let time = body["intersection"]["time"].as_f64().unwrap();
        let voltage = body["intersection"]["voltage"].as_f64().unwrap();
        assert!((time - 2.0).abs() < 1e-4, "time {time}");
        assert!((voltage - 2.0).abs() < 1e-4, "voltage {voltage}");
    }

    #[test]
    fn export_to_missing_directory_is_an_input_error() {
        let req = request(json!({ "data": [[0, 1]], "headers": ["t", "v"] }));
        let table = parse_table(&req).unwrap();
        let analysis = SeriesAnalyzer::default().analyze(&table).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = write_response_json(&path, &build_response(&analysis, &req)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
