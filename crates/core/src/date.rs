//! Date normalization for spreadsheet cells.
//!
//! Cells arrive either as spreadsheet serial numbers or as locale date
//! strings. Both are reduced to a [`DatePair`]: a `dd/mm/yyyy` display string
//! and an ISO `yyyy-mm-dd` key used only for ordering and range filtering.
//! Time components are always dropped.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use wmsreport_sheet::CellValue;

/// Serials at or below this are not treated as dates.
const SERIAL_DATE_THRESHOLD: f64 = 40000.0;

/// Candidate string formats, tried in order; first match wins.
const DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

const DISPLAY_FORMAT: &str = "%d/%m/%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Spreadsheet epoch, 1899-12-30.
///
/// Day 60 of the 1900 date system is the nonexistent 1900-02-29; counting
/// from the 30th keeps every serial after it aligned with the source files.
fn spreadsheet_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// A normalized date: display form plus an optional ISO sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePair {
    pub display: String,
    pub iso_key: Option<String>,
}

impl DatePair {
    /// A resolved date.
    pub fn resolved(date: NaiveDate) -> Self {
        Self {
            display: date.format(DISPLAY_FORMAT).to_string(),
            iso_key: Some(date.format(ISO_FORMAT).to_string()),
        }
    }

    /// An unresolved value kept for display only.
    pub fn unresolved(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            iso_key: None,
        }
    }

    /// Whether a recognized format matched.
    pub fn is_resolved(&self) -> bool {
        self.iso_key.is_some()
    }
}

/// Convert a spreadsheet serial (days since 1899-12-30) to a date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    if days.abs() > 3_000_000.0 {
        return None;
    }
    spreadsheet_epoch().checked_add_signed(Duration::days(days as i64))
}

/// Parse a date string, ignoring anything after the first space.
pub fn parse_date_str(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split(' ').next().unwrap_or_default();
    if date_part.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Normalize a raw cell into a [`DatePair`].
///
/// Numbers above the serial threshold are spreadsheet dates; strings are
/// matched against the known formats. Anything else keeps its stringified
/// form with no ISO key.
pub fn normalize(raw: &CellValue) -> DatePair {
    match raw {
        CellValue::Int(_) | CellValue::Float(_) => {
            let serial = raw.as_float().unwrap_or(f64::NAN);
            if serial > SERIAL_DATE_THRESHOLD {
                if let Some(date) = serial_to_date(serial) {
                    return DatePair::resolved(date);
                }
            }
            DatePair::unresolved(raw.as_str())
        }
        CellValue::String(s) => match parse_date_str(s) {
            Some(date) => DatePair::resolved(date),
            None => DatePair::unresolved(s.trim()),
        },
        CellValue::Null | CellValue::Bool(_) => DatePair::unresolved(raw.as_str()),
    }
}

/// Reduce a caller-supplied bound to a `yyyy-mm-dd` string.
///
/// A time component after a space is dropped. Returns `None` if the date
/// part does not have the `yyyy-mm-dd` shape (length 10, hyphens at 4 and 7).
pub fn bound_date_part(bound: &str) -> Option<&str> {
    let date_part = bound.trim().split(' ').next().unwrap_or_default();
    let bytes = date_part.as_bytes();
    if bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-' {
        Some(date_part)
    } else {
        None
    }
}
