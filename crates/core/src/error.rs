//! Error types for report processing.

use thiserror::Error;
use wmsreport_sheet::SheetError;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Structural failures that abort a pipeline run.
///
/// Per-cell and per-row problems never surface here; they are recorded as
/// [`crate::Warning`]s and reflected in the statistics.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A schema column is not valid letter notation.
    #[error("Invalid column reference '{column}' for field {field}")]
    InvalidColumnReference { field: String, column: String },

    /// The workbook has no worksheets.
    #[error("Workbook contains no sheets")]
    NoSheetsAvailable,

    /// The requested report type does not exist.
    #[error("Unknown report type: {0}")]
    UnknownReport(String),

    /// Failure reading the workbook source.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl ReportError {
    /// Stable classification carried in failure results.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidColumnReference { .. } => "InvalidColumnReference",
            Self::NoSheetsAvailable => "NoSheetsAvailable",
            Self::UnknownReport(_) => "UnknownReport",
            Self::Sheet(err) => match err {
                SheetError::InvalidColumnReference(_) => "InvalidColumnReference",
                SheetError::NoSheetsAvailable => "NoSheetsAvailable",
                SheetError::SheetNotFound { .. } => "SheetNotFound",
                SheetError::SheetAlreadyExists { .. } => "SheetAlreadyExists",
                SheetError::UnsupportedFormat(_) => "UnsupportedFormat",
                SheetError::Workbook(_) | SheetError::Csv(_) => "UnreadableWorkbook",
                SheetError::Io(_) => "Io",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = ReportError::InvalidColumnReference {
            field: "TYPE".to_string(),
            column: "??".to_string(),
        };
        assert_eq!(err.kind(), "InvalidColumnReference");
        assert_eq!(err.to_string(), "Invalid column reference '??' for field TYPE");

        let err: ReportError = SheetError::NoSheetsAvailable.into();
        assert_eq!(err.kind(), "NoSheetsAvailable");

        let err: ReportError = SheetError::Workbook("zip".to_string()).into();
        assert_eq!(err.kind(), "UnreadableWorkbook");
    }
}
