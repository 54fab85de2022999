/// Dataset layer: the in-memory table and its loaders.
///
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → header + cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  Vec<Record>, column order, column layout
///   └──────────┘
/// ```
pub mod loader;

pub use loader::load_file;

use crate::config::ColumnConfig;
use crate::model::{CellValue, PipelineError, Record};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;

/// Read-only table loaded once at startup.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    layout: ColumnConfig,
    records: Vec<Record>,
}

impl Dataset {
    /// Builds a dataset from a header row and raw cell rows. Column names are
    /// trimmed; short rows are padded with nulls.
    pub fn from_rows(
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        layout: &ColumnConfig,
    ) -> Self {
        let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

        let records = rows
            .into_iter()
            .map(|cells| {
                let mut record = Record::default();
                let mut cells = cells.into_iter();
                for column in &columns {
                    let cell = cells.next().unwrap_or(CellValue::Null);
                    if *column == layout.locality {
                        record.locality = cell.as_text();
                    } else if *column == layout.year {
                        record.year = cell.as_year();
                    } else if *column == layout.price {
                        record.price = cell.as_f64();
                    } else if *column == layout.demand {
                        record.demand = cell.as_f64();
                    } else {
                        record.extra.insert(column.clone(), cell);
                    }
                }
                record
            })
            .collect();

        Self {
            columns,
            layout: layout.clone(),
            records,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn layout(&self) -> &ColumnConfig {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn has_demand(&self) -> bool {
        self.has_column(&self.layout.demand)
    }

    /// Required columns (locality, year, price) absent from the header.
    pub fn missing_required_columns(&self) -> Vec<String> {
        [&self.layout.locality, &self.layout.year, &self.layout.price]
            .into_iter()
            .filter(|name| !self.has_column(name))
            .cloned()
            .collect()
    }

    pub fn require_columns(&self) -> Result<(), PipelineError> {
        let missing = self.missing_required_columns();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::MissingColumns(missing))
        }
    }

    /// Distinct, non-blank locality names in order of first appearance.
    pub fn localities(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter_map(|r| r.locality.as_deref())
            .filter(|name| !name.trim().is_empty())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Rows whose locality is one of `areas`, in dataset order.
    pub fn filter_localities(&self, areas: &[String]) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| {
                r.locality
                    .as_deref()
                    .is_some_and(|loc| areas.iter().any(|a| a == loc))
            })
            .collect()
    }

    /// JSON object for a row with every column in dataset order.
    /// Non-finite numbers become `null`.
    pub fn row_to_json(&self, record: &Record) -> Map<String, JsonValue> {
        self.columns
            .iter()
            .map(|column| {
                let value = if *column == self.layout.locality {
                    record
                        .locality
                        .clone()
                        .map(JsonValue::String)
                        .unwrap_or(JsonValue::Null)
                } else if *column == self.layout.year {
                    record.year.map(JsonValue::from).unwrap_or(JsonValue::Null)
                } else if *column == self.layout.price {
                    crate::model::finite_json(record.price)
                } else if *column == self.layout.demand {
                    crate::model::finite_json(record.demand)
                } else {
                    record
                        .extra
                        .get(column)
                        .map(CellValue::to_json)
                        .unwrap_or(JsonValue::Null)
                };
                (column.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn layout() -> ColumnConfig {
        ColumnConfig {
            locality: "area".into(),
            year: "year".into(),
            price: "price".into(),
            demand: "demand".into(),
        }
    }

    pub(crate) fn dataset(rows: &[(&str, &str, &str, &str)]) -> Dataset {
        let headers = vec!["area".into(), "year".into(), "price".into(), "demand".into()];
        let rows = rows
            .iter()
            .map(|(a, y, p, d)| {
                [a, y, p, d]
                    .into_iter()
                    .map(|cell| CellValue::from_text(cell))
                    .collect()
            })
            .collect();
        Dataset::from_rows(headers, rows, &layout())
    }

    #[test]
    fn trims_headers_and_types_known_columns() {
        let headers = vec![" area ".into(), "year".into(), "price ".into(), "note".into()];
        let rows = vec![vec![
            CellValue::Text("Wakad".into()),
            CellValue::Float(2021.0),
            CellValue::Integer(5000),
            CellValue::Text("new".into()),
        ]];
        let ds = Dataset::from_rows(headers, rows, &layout());

        assert_eq!(ds.columns(), ["area", "year", "price", "note"]);
        let record = &ds.records()[0];
        assert_eq!(record.locality.as_deref(), Some("Wakad"));
        assert_eq!(record.year, Some(2021));
        assert_eq!(record.price, Some(5000.0));
        assert_eq!(record.demand, None);
        assert_eq!(record.extra.get("note"), Some(&CellValue::Text("new".into())));
        assert!(!ds.has_demand());
        assert!(ds.require_columns().is_ok());
    }

    #[test]
    fn reports_missing_required_columns() {
        let headers = vec!["area".into(), "demand".into()];
        let ds = Dataset::from_rows(headers, Vec::new(), &layout());
        assert_eq!(ds.missing_required_columns(), ["year", "price"]);
        assert!(matches!(
            ds.require_columns(),
            Err(PipelineError::MissingColumns(cols)) if cols.len() == 2
        ));
    }

    #[test]
    fn localities_are_distinct_in_first_seen_order() {
        let ds = dataset(&[
            ("Wakad", "2021", "1", ""),
            ("Aundh", "2021", "1", ""),
            ("Wakad", "2022", "1", ""),
            ("", "2022", "1", ""),
        ]);
        assert_eq!(ds.localities(), ["Wakad", "Aundh"]);
        assert_eq!(ds.filter_localities(&["Wakad".into()]).len(), 2);
    }

    #[test]
    fn row_json_keeps_column_order_and_nulls_non_finite() {
        let ds = dataset(&[("Wakad", "2021", "NaN", "inf")]);
        let row = ds.row_to_json(&ds.records()[0]);
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, ["area", "year", "price", "demand"]);
        assert_eq!(row["price"], JsonValue::Null);
        assert_eq!(row["demand"], JsonValue::Null);
        assert_eq!(row["year"], serde_json::json!(2021));
    }
}
