//! CSV ingest of survival observations.
//!
//! Expected columns (case-insensitive, BOM-tolerant):
//!
//! - event indicator: `event` (aliases `status`, `observed`), `1` = observed, `0` = censored
//! - time: `time` (aliases `duration`, `t`)
//! - optional `weight`
//!
//! Rows that fail to parse are skipped and reported with their line number.
//! Parsed values are not range-checked; a negative time or an event flag
//! outside `{0, 1}` flows through to the scores as-is.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::SurvivalData;
use crate::error::AppError;

const EVENT_COLUMNS: [&str; 3] = ["event", "status", "observed"];
const TIME_COLUMNS: [&str; 3] = ["time", "duration", "t"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: observations + optional weights + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub data: SurvivalData,
    pub weights: Option<Vec<f64>>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load `event,time[,weight]` rows from a CSV file.
pub fn load_survival_csv(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_survival_csv(file)
}

/// Same as [`load_survival_csv`] for any reader.
pub fn read_survival_csv<R: std::io::Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let event_idx = find_column(&header_map, &EVENT_COLUMNS)
        .ok_or_else(|| AppError::input("Missing required column: `event` (or `status`/`observed`)"))?;
    let time_idx = find_column(&header_map, &TIME_COLUMNS)
        .ok_or_else(|| AppError::input("Missing required column: `time` (or `duration`/`t`)"))?;
    let weight_idx = header_map.get("weight").copied();

    let mut event = Vec::new();
    let mut time = Vec::new();
    let mut weights = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header line, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, event_idx, time_idx, weight_idx) {
            Ok((e, t, w)) => {
                event.push(e);
                time.push(t);
                weights.push(w);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = time.len();
    if rows_used == 0 {
        return Err(AppError::no_data("No valid rows in CSV."));
    }

    Ok(IngestedData {
        data: SurvivalData::new(event, time)?,
        weights: weight_idx.map(|_| weights),
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| header_map.get(*n).copied())
}

fn parse_row(
    record: &StringRecord,
    event_idx: usize,
    time_idx: usize,
    weight_idx: Option<usize>,
) -> Result<(f64, f64, f64), String> {
    let event = parse_event(get_field(record, event_idx, "event")?)?;
    let time = parse_f64(get_field(record, time_idx, "time")?, "time")?;
    let weight = match weight_idx {
        Some(idx) => parse_f64(get_field(record, idx, "weight")?, "weight")?,
        None => 1.0,
    };
    Ok((event, time, weight))
}

fn get_field<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    match record.get(idx) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(format!("Missing `{name}` value.")),
    }
}

fn parse_event(s: &str) -> Result<f64, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" => Ok(1.0),
        "false" | "no" => Ok(0.0),
        other => parse_f64(other, "event"),
    }
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value: '{s}'."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_aliases_and_skips_bad_rows() {
        let csv = "\u{feff}Status,Duration\n1,2.0\n0,3.5\nx,1.0\n1,\ntrue,0.5\n";
        let ingest = read_survival_csv(csv.as_bytes()).unwrap();

        assert_eq!(ingest.rows_read, 5);
        assert_eq!(ingest.rows_used, 3);
        assert_eq!(ingest.data.event(), &[1.0, 0.0, 1.0]);
        assert_eq!(ingest.data.time(), &[2.0, 3.5, 0.5]);
        assert!(ingest.weights.is_none());

        let lines: Vec<usize> = ingest.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![4, 5]);
    }

    #[test]
    fn reads_optional_weights() {
        let csv = "event,time,weight\n1,1.0,2.0\n0,2.0,0.5\n";
        let ingest = read_survival_csv(csv.as_bytes()).unwrap();
        assert_eq!(ingest.weights, Some(vec![2.0, 0.5]));
    }

    #[test]
    fn values_are_not_range_checked() {
        let csv = "event,time\n2,-1.0\n";
        let ingest = read_survival_csv(csv.as_bytes()).unwrap();
        assert_eq!(ingest.data.event(), &[2.0]);
        assert_eq!(ingest.data.time(), &[-1.0]);
    }

    #[test]
    fn missing_columns_and_empty_files_fail() {
        let err = read_survival_csv("event,value\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = read_survival_csv("event,time\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
