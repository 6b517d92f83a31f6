use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a raw, untyped cell value as read from a workbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    /// Check if the value is null (a NaN float counts as null)
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Check if the value is null or a whitespace-only string
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::String(s) => s.trim().is_empty(),
            other => other.is_null(),
        }
    }

    /// Try to get the value as a float
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => s.trim().parse().ok(),
            CellValue::Null => None,
        }
    }

    /// Get the value as a string
    ///
    /// Integral floats render without a fractional part, so a status code
    /// stored as `11.0` reads back as `"11"`.
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Float(f) if f.is_nan() => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
        }
    }

    /// Parse a string into a `CellValue` with type inference
    /// Tries: null -> bool -> int -> float -> string
    #[must_use]
    pub fn parse(s: &str) -> CellValue {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Null;
        }

        match trimmed.to_lowercase().as_str() {
            "true" => return CellValue::Bool(true),
            "false" => return CellValue::Bool(false),
            _ => {}
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }

        // Only plain decimal floats; "nan"/"inf" stay text
        if trimmed.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(f) = trimmed.parse::<f64>() {
                if f.is_finite() {
                    return CellValue::Float(f);
                }
            }
        }

        CellValue::String(s.to_string())
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}
