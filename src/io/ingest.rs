//! Input loading and column parsing.
//!
//! This module turns a loosely-typed table (JSON request body or CSV file)
//! into aligned numeric columns the core can analyze.
//!
//! Design goals:
//! - **Same request shape as the web endpoint** (`data`, `headers`, `title`,
//!   `axis_labels`, `annotations`)
//! - **Silent coercion** of empty or unparsable cells to `0.0`, reported once
//!   via a `warn!` with the count
//! - **Reject empty input** (no rows or no headers) before touching the core
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AxisLabels, InputFormat, SeriesTable, default_title};
use crate::error::AppError;

/// A request body: rows of cells plus presentation metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct PlotRequest {
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub axis_labels: AxisLabels,
    /// Passed through to the response layout untouched.
    #[serde(default)]
    pub annotations: Vec<Value>,
}

/// Load a request from disk.
pub fn load_request(path: &Path, format: InputFormat) -> Result<PlotRequest, AppError> {
    match resolve_format(path, format) {
        InputFormat::Json => read_json_request(path),
        _ => read_csv_request(path),
    }
}

fn resolve_format(path: &Path, format: InputFormat) -> InputFormat {
    match format {
        InputFormat::Auto => {
            let is_json = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if is_json { InputFormat::Json } else { InputFormat::Csv }
        }
        other => other,
    }
}

pub fn read_json_request(path: &Path) -> Result<PlotRequest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open request JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid request JSON: {e}")))
}

/// Read a CSV file; the header row names the columns.
pub fn read_csv_request(path: &Path) -> Result<PlotRequest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_header_name)
        .collect();

    let mut data = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;
        data.push(record.iter().map(|s| Value::String(s.to_string())).collect());
    }

    Ok(PlotRequest {
        data,
        headers,
        title: default_title(),
        axis_labels: AxisLabels::default(),
        annotations: Vec::new(),
    })
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes carry a BOM on the first header.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Transpose rows into one numeric column per header.
///
/// Column 0 is X. Missing, empty and unparsable cells become `0.0`.
pub fn parse_table(request: &PlotRequest) -> Result<SeriesTable, AppError> {
    if request.data.is_empty() || request.headers.is_empty() {
        return Err(AppError::new(2, "No data provided"));
    }

    let mut coerced = 0usize;
    let columns: Vec<Vec<f64>> = (0..request.headers.len())
        .map(|col| {
            request
                .data
                .iter()
                .map(|row| match row.get(col) {
                    Some(cell) => {
                        let (v, ok) = coerce_cell(cell);
                        if !ok {
                            coerced += 1;
                        }
                        v
                    }
                    None => {
                        coerced += 1;
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    if coerced > 0 {
        log::warn!("{coerced} empty or non-numeric cell(s) were read as 0.0");
    }
    log::info!(
        "parsed {} row(s) x {} column(s)",
        request.data.len(),
        request.headers.len()
    );

    Ok(SeriesTable {
        headers: request.headers.clone(),
        columns,
    })
}

/// Numeric value of a cell and whether it parsed cleanly.
///
/// Non-finite results (`"nan"`, `"inf"`) are treated as unparsable.
pub fn coerce_cell(cell: &Value) -> (f64, bool) {
    let parsed = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { s.parse::<f64>().ok() }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => (v, true),
        _ => (0.0, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn request(value: Value) -> PlotRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_defaults() {
        let req = request(json!({ "data": [[0, 1]], "headers": ["t", "v"] }));
        assert_eq!(req.title, "Graph");
        assert_eq!(req.axis_labels.x, "Time");
        assert_eq!(req.axis_labels.y, "Voltage");
        assert!(req.annotations.is_empty());
    }

    #[test]
    fn cells_are_coerced_not_rejected() {
        let req = request(json!({
            "data": [
                ["0", "1.5", ""],
                [1, "abc", 2.5],
                ["2", null],
                [3.0, true, " 4 "]
            ],
            "headers": ["t", "a", "b"]
        }));
        let table = parse_table(&req).unwrap();
        assert_eq!(table.columns[0], vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(table.columns[1], vec![1.5, 0.0, 0.0, 1.0]);
        assert_eq!(table.columns[2], vec![0.0, 2.5, 0.0, 4.0]);
    }

    #[test]
    fn empty_input_is_rejected() {
        let no_rows = request(json!({ "data": [], "headers": ["t", "v"] }));
        let err = parse_table(&no_rows).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.message(), "No data provided");

        let no_headers = request(json!({ "data": [[1, 2]], "headers": [] }));
        assert!(parse_table(&no_headers).is_err());
    }

    #[test]
    fn non_finite_strings_become_zero() {
        assert_eq!(coerce_cell(&json!("NaN")), (0.0, false));
        assert_eq!(coerce_cell(&json!("inf")), (0.0, false));
        assert_eq!(coerce_cell(&json!("1e3")), (1000.0, true));
    }

    #[test]
    fn csv_file_is_read_with_headers() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "\u{feff}Time,Charge,Discharge").unwrap();
        writeln!(file, "0,0,5").unwrap();
        writeln!(file, "1,3,4").unwrap();
        writeln!(file, "2,,3").unwrap();

        let req = load_request(file.path(), InputFormat::Auto).unwrap();
        assert_eq!(req.headers, vec!["Time", "Charge", "Discharge"]);
        let table = parse_table(&req).unwrap();
        assert_eq!(table.columns[1], vec![0.0, 3.0, 0.0]);
    }

    #[test]
    fn json_file_is_detected_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"data": [[0, 1], [1, 2]], "headers": ["x", "y"], "title": "Run 7"}}"#
        )
        .unwrap();
        let req = load_request(file.path(), InputFormat::Auto).unwrap();
        assert_eq!(req.title, "Run 7");
        assert_eq!(req.data.len(), 2);
    }
}
