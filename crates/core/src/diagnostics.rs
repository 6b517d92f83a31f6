//! Per-invocation warning collection.

use serde::Serialize;
use std::fmt;

/// Per-cell entries kept for each warning kind; counters stay exact.
const MAX_CELL_WARNINGS: usize = 50;

/// A non-fatal problem absorbed by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Warning {
    /// A schema column lies beyond the sheet's last column; the field reads empty.
    SchemaColumnOutOfRange {
        field: String,
        column: String,
        index: usize,
        available: usize,
    },
    /// A date cell matched no known format.
    DateParseFailure { row: usize, value: String },
    /// A quantity cell could not be parsed and counts as zero.
    QuantityParseFailure { row: usize, value: String },
    /// A caller-supplied date bound is not `yyyy-mm-dd` and was ignored.
    InvalidDateBound { bound: String, value: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SchemaColumnOutOfRange {
                field,
                column,
                index,
                available,
            } => write!(
                f,
                "{field} column {column} (index {index}) out of range; sheet has {available} columns"
            ),
            Warning::DateParseFailure { row, value } => {
                write!(f, "Unrecognized date '{value}' at row {row}")
            }
            Warning::QuantityParseFailure { row, value } => {
                write!(f, "Unparseable quantity '{value}' at row {row}, counted as 0")
            }
            Warning::InvalidDateBound { bound, value } => {
                write!(f, "Unrecognized {bound} bound '{value}', ignored")
            }
        }
    }
}

/// Collects warnings raised during one pipeline run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    date_failures: usize,
    quantity_failures: usize,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn push(&mut self, warning: Warning) {
        let counter = match warning {
            Warning::DateParseFailure { .. } => Some(&mut self.date_failures),
            Warning::QuantityParseFailure { .. } => Some(&mut self.quantity_failures),
            _ => None,
        };

        match counter {
            Some(count) => {
                *count += 1;
                tracing::debug!("{warning}");
                if *count <= MAX_CELL_WARNINGS {
                    self.warnings.push(warning);
                }
            }
            None => {
                tracing::warn!("{warning}");
                self.warnings.push(warning);
            }
        }
    }

    /// Number of date cells that did not resolve.
    pub fn date_failures(&self) -> usize {
        self.date_failures
    }

    /// Number of quantity cells that counted as zero after a parse failure.
    pub fn quantity_failures(&self) -> usize {
        self.quantity_failures
    }

    /// Recorded warnings, in the order they were raised.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Consume the collector, returning the recorded warnings.
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
