//! Whole-unit quantity parsing for comma-decimal business numbers.
//!
//! Exports write quantities like `144,00000` or `1.234,5`: dot groups
//! thousands and comma starts the fraction. Only whole units matter, so the
//! fraction is dropped rather than rounded.

use thiserror::Error;
use wmsreport_sheet::CellValue;

/// A quantity cell that could not be read as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read '{0}' as a quantity")]
pub struct QuantityParseError(pub String);

/// Parse a raw cell into a whole-unit quantity.
///
/// Numbers truncate toward zero. Strings keep the part before the first
/// comma with dots and spaces stripped; without a comma, every comma, dot and
/// space is stripped. Empty cells are zero.
pub fn try_parse_integer(raw: &CellValue) -> Result<i64, QuantityParseError> {
    match raw {
        CellValue::Null => Ok(0),
        CellValue::Bool(b) => Ok(i64::from(*b)),
        CellValue::Int(i) => Ok(*i),
        CellValue::Float(f) if f.is_nan() => Ok(0),
        CellValue::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
        CellValue::Float(f) => Err(QuantityParseError(f.to_string())),
        CellValue::String(s) => parse_str(s),
    }
}

/// Like [`try_parse_integer`], but a failure reads as zero.
pub fn parse_integer(raw: &CellValue) -> i64 {
    try_parse_integer(raw).unwrap_or_else(|err| {
        tracing::warn!("{err}, counted as 0");
        0
    })
}

fn parse_str(value: &str) -> Result<i64, QuantityParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let digits: String = match trimmed.split_once(',') {
        Some((integer_part, _)) => integer_part
            .chars()
            .filter(|c| *c != '.' && *c != ' ')
            .collect(),
        None => trimmed
            .chars()
            .filter(|c| !matches!(c, ',' | '.' | ' '))
            .collect(),
    };

    // ",5" is a pure fraction
    if digits.is_empty() {
        return Ok(0);
    }

    digits
        .parse::<i64>()
        .map_err(|_| QuantityParseError(value.to_string()))
}
