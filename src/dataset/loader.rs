use super::Dataset;
use crate::config::ColumnConfig;
use crate::model::{CellValue, DatasetError};
use serde_json::Value as JsonValue;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Loads a dataset from disk, dispatching on the file extension.
///
/// Supported formats:
/// * `.csv`  – header row followed by data rows
/// * `.json` – `[{ "final location": "...", "year": 2021, ... }, ...]`
pub fn load_file(path: &Path, layout: &ColumnConfig) -> Result<Dataset, DatasetError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(std::fs::File::open(path)?, layout)?,
        "json" => load_json(&std::fs::read_to_string(path)?, layout)?,
        other => return Err(DatasetError::UnsupportedFormat(other.to_string())),
    };

    info!(
        "Loaded dataset {}: {} rows, {} columns",
        path.display(),
        dataset.len(),
        dataset.columns().len()
    );
    Ok(dataset)
}

pub fn load_csv<R: Read>(reader: R, layout: &ColumnConfig) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(DatasetError::Malformed("CSV has no header row".into()));
    }

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }
    debug!("Parsed {} CSV rows", rows.len());

    Ok(Dataset::from_rows(headers, rows, layout))
}

/// Records-oriented JSON: an array of flat objects. Column order follows the
/// first appearance of each key; keys differing only in surrounding whitespace
/// share one column.
pub fn load_json(text: &str, layout: &ColumnConfig) -> Result<Dataset, DatasetError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DatasetError::Malformed("expected a top-level JSON array".into()))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DatasetError::Malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            let name = key.trim();
            if !headers.iter().any(|h| h == name) {
                headers.push(name.to_string());
            }
        }
    }

    let rows: Vec<Vec<CellValue>> = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| {
                    obj.iter()
                        .find(|(key, _)| key.trim() == h)
                        .map(|(_, value)| CellValue::from_json(value))
                        .unwrap_or(CellValue::Null)
                })
                .collect()
        })
        .collect();

    Ok(Dataset::from_rows(headers, rows, layout))
}
