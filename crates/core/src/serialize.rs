//! JSON-safe result documents.

use crate::date::DatePair;
use crate::diagnostics::Warning;
use crate::error::ReportError;
use crate::report::ReportKind;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};
use wmsreport_sheet::CellValue;

/// Rows shown in a preview when the caller does not say otherwise.
pub const DEFAULT_PREVIEW_LIMIT: usize = 100;

/// A cell of the aggregated output table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableCell {
    Value(CellValue),
    Date(DatePair),
    Quantity(i64),
}

impl TableCell {
    /// Convert to a JSON primitive.
    ///
    /// Null and NaN become `""`, integral floats become integers and dates
    /// become their display string. Booleans and text are emitted as strings.
    pub fn to_json(&self) -> Value {
        match self {
            TableCell::Quantity(q) => Value::from(*q),
            TableCell::Date(pair) => Value::String(pair.display.clone()),
            TableCell::Value(cell) => cell_to_json(cell),
        }
    }
}

fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::String(String::new()),
        CellValue::Int(i) => Value::from(*i),
        CellValue::Float(f) if f.is_nan() => Value::String(String::new()),
        CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Value::from(*f as i64),
        CellValue::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        CellValue::Bool(_) | CellValue::String(_) => Value::String(cell.as_str()),
    }
}

/// Convert a table to JSON rows.
pub fn table_to_json(rows: &[Vec<TableCell>]) -> Vec<Vec<Value>> {
    rows.iter()
        .map(|row| row.iter().map(TableCell::to_json).collect())
        .collect()
}

/// Bounds as actually applied by the date filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedFilters {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Statistics block of a successful result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    /// Output rows after grouping.
    pub total_filtered: usize,
    pub showing: usize,
    pub rejected_by_status: usize,
    pub rejected_by_date: usize,
    pub iso_min: Option<String>,
    pub iso_max: Option<String>,
    pub sheet: String,
    pub total_units: i64,
    pub total_boxes: i64,
    pub total_pallets: i64,
    pub total_units_display: String,
    pub total_boxes_display: String,
    pub total_pallets_display: String,
    pub source_rows: usize,
    pub dropped_empty_keys: usize,
    pub rows_before_grouping: usize,
    pub grouped_rows: usize,
    pub grouping_reduction: usize,
    pub unresolved_dates: usize,
    pub quantity_parse_failures: usize,
    pub unique_primary_keys: usize,
    pub applied_filters: AppliedFilters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub report_type: ReportKind,
    pub request_id: String,
    pub elapsed_seconds: f64,
}

/// A successful pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub success: bool,
    pub total_records: usize,
    pub headers: Vec<String>,
    pub preview_rows: Vec<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_rows: Option<Vec<Vec<Value>>>,
    pub stats: ProcessingStats,
    pub messages: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
    pub metadata: Metadata,
}

/// An aborted pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResult {
    pub success: bool,
    pub error: String,
    pub error_kind: String,
    pub elapsed_seconds: f64,
    pub request_id: String,
}

impl FailureResult {
    pub fn from_error(err: &ReportError, request_id: impl Into<String>, elapsed_seconds: f64) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            error_kind: err.kind().to_string(),
            elapsed_seconds: round2(elapsed_seconds),
            request_id: request_id.into(),
        }
    }
}

/// Result of [`crate::ReportPipeline::process`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success(Box<ProcessingResult>),
    Failure(FailureResult),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Round to two decimals for elapsed-time reporting.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
