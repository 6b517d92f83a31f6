use crate::csv::CsvSource;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use crate::xlsx::XlsxSource;
use std::path::Path;

/// Extensions accepted by [`open_source`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods", "csv"];

/// A workbook-like provider of raw tables
///
/// Implementations read a whole worksheet into memory; row 0 of the returned
/// sheet is the worksheet's first row and column 0 is column `A`.
pub trait TableSource {
    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Materialize one worksheet by name
    fn read_sheet(&mut self, name: &str) -> Result<Sheet>;
}

/// Open a workbook file, picking the reader from its extension
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn TableSource>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(Box::new(CsvSource::open(path)?)),
        ext if SUPPORTED_EXTENSIONS.contains(&ext) => Ok(Box::new(XlsxSource::open(path)?)),
        "" => Err(SheetError::UnsupportedFormat(path.display().to_string())),
        other => Err(SheetError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            open_source("report.pdf"),
            Err(SheetError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
        assert!(matches!(
            open_source("report"),
            Err(SheetError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_csv_is_io_error() {
        assert!(matches!(
            open_source("/nonexistent/report.CSV"),
            Err(SheetError::Io(_))
        ));
    }
}
