// Core structs: CellValue, Record, YearlyAggregate, ChartSeries and error types
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A raw dataset cell, typed the way a spreadsheet reader would guess it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    /// Guesses the type of a CSV cell. Empty cells become `Null`.
    pub fn from_text(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s.to_ascii_lowercase().as_str() {
            "true" => CellValue::Bool(true),
            "false" => CellValue::Bool(false),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::String(s) => CellValue::Text(s.clone()),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    CellValue::Float(f)
                } else {
                    CellValue::Text(n.to_string())
                }
            }
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Null => CellValue::Null,
            other => CellValue::Text(other.to_string()),
        }
    }

    /// Numeric view of the cell. Non-finite floats count as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) if f.is_finite() => Some(*f),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Year view of the cell: integers, or floats without a fractional part.
    pub fn as_year(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            _ => self
                .as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64),
        }
    }

    /// Text view of the cell, used for locality names.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(f) if f.is_finite() => Some(f.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            CellValue::Text(s) => JsonValue::String(s.clone()),
            CellValue::Integer(i) => JsonValue::from(*i),
            CellValue::Float(f) => finite_json(Some(*f)),
            CellValue::Bool(b) => JsonValue::Bool(*b),
            CellValue::Null => JsonValue::Null,
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Converts an optional float to JSON, mapping NaN and infinities to `null`.
pub fn finite_json(value: Option<f64>) -> JsonValue {
    value
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// One dataset row: the fields the pipeline computes on, plus every other column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub locality: Option<String>,
    pub year: Option<i64>,
    pub price: Option<f64>,
    pub demand: Option<f64>,
    pub extra: BTreeMap<String, CellValue>,
}

/// Mean price and demand of one locality in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAggregate {
    pub locality: String,
    pub year: i64,
    pub price: Option<f64>,
    pub demand: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub year: Option<i64>,
    pub price: Option<f64>,
    pub demand: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Upward,
    Downward,
    Stable,
}

impl Trend {
    /// Classifies a growth percentage: above 5 is upward, below -5 downward.
    pub fn from_growth(growth: f64) -> Self {
        if growth > 5.0 {
            Trend::Upward
        } else if growth < -5.0 {
            Trend::Downward
        } else {
            Trend::Stable
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Upward => "upward",
            Trend::Downward => "downward",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported dataset format: .{0}")]
    UnsupportedFormat(String),
    #[error("malformed dataset: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation is not configured")]
    NotConfigured,
    #[error("no statistics to describe")]
    NoStats,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service responded with status {0}: {1}")]
    Status(u16, String),
    #[error("service returned no text")]
    EmptyResponse,
}
