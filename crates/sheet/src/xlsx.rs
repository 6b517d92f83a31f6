use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use crate::source::TableSource;
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const DATETIME_ISO_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Date-formatted cells keep their type as ISO text; durations stay serial
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if dt.is_datetime() => {
                CellValue::String(datetime.format(DATETIME_ISO_FORMAT).to_string())
            }
            _ => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => {
            tracing::debug!("Cell error {e:?} read as empty");
            CellValue::Null
        }
    }
}

/// Copy a calamine range into a sheet anchored at A1
///
/// calamine ranges begin at the first used cell, so leading empty rows and
/// columns are padded back in to keep column letters absolute.
fn range_to_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut data: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut row_data = vec![CellValue::Null; col_offset];
        row_data.extend(row.iter().map(data_to_cell_value));
        data.push(row_data);
    }

    let mut sheet = Sheet::with_name(name);
    *sheet.data_mut() = data;
    sheet
}

/// Workbook source backed by calamine (xls, xlsx, xlsm, xlsb, ods)
pub struct XlsxSource {
    workbook: Sheets<BufReader<File>>,
}

impl XlsxSource {
    /// Open a workbook, detecting the container format from the extension
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or is not a readable workbook.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let workbook = open_workbook_auto(path.as_ref())?;
        Ok(XlsxSource { workbook })
    }
}

impl TableSource for XlsxSource {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        if !self.workbook.sheet_names().iter().any(|n| n == name) {
            return Err(SheetError::SheetNotFound {
                name: name.to_string(),
            });
        }
        let range = self.workbook.worksheet_range(name)?;
        let sheet = range_to_sheet(name, &range);
        tracing::debug!(
            "Read sheet '{}': {} rows, {} columns",
            name,
            sheet.row_count(),
            sheet.col_count()
        );
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
    use tempfile::tempdir;

    #[test]
    fn test_sheet_names_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("multi.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Header").unwrap();
        workbook.add_worksheet().set_name("Detail").unwrap();
        workbook.save(&path).unwrap();

        let source = XlsxSource::open(&path).unwrap();
        assert_eq!(source.sheet_names(), vec!["Header", "Detail"]);
    }

    #[test]
    fn test_read_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("types.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Detail").unwrap();
        worksheet.write_string(0, 0, "text").unwrap();
        worksheet.write_number(0, 1, 42.0).unwrap();
        worksheet.write_number(0, 2, 45292.5).unwrap();
        worksheet.write_boolean(0, 3, true).unwrap();
        workbook.save(&path).unwrap();

        let mut source = XlsxSource::open(&path).unwrap();
        let sheet = source.read_sheet("Detail").unwrap();

        assert_eq!(sheet.get(0, 0), Some(&CellValue::String("text".to_string())));
        assert!(matches!(sheet.get(0, 1), Some(CellValue::Float(f)) if (*f - 42.0).abs() < 1e-9));
        assert!(matches!(sheet.get(0, 2), Some(CellValue::Float(f)) if (*f - 45292.5).abs() < 1e-9));
        assert_eq!(sheet.get(0, 3), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_date_cells_read_as_iso_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dates.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let format = Format::new().set_num_format("dd/mm/yyyy");
        let date = ExcelDateTime::from_ymd(2005, 1, 1).unwrap();
        worksheet.write_datetime_with_format(0, 0, &date, &format).unwrap();
        workbook.save(&path).unwrap();

        let mut source = XlsxSource::open(&path).unwrap();
        let sheet = source.read_sheet("Sheet1").unwrap();

        assert_eq!(
            sheet.get(0, 0),
            Some(&CellValue::String("2005-01-01 00:00:00".to_string()))
        );
    }

    #[test]
    fn test_leading_empty_cells_are_padded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(1, 2, "C2").unwrap();
        worksheet.write_string(2, 3, "D3").unwrap();
        workbook.save(&path).unwrap();

        let mut source = XlsxSource::open(&path).unwrap();
        let sheet = source.read_sheet("Sheet1").unwrap();

        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.get(1, 2), Some(&CellValue::String("C2".to_string())));
        assert_eq!(sheet.get(2, 3), Some(&CellValue::String("D3".to_string())));
        assert_eq!(sheet.get(1, 0), Some(&CellValue::Null));
    }

    #[test]
    fn test_missing_sheet_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        workbook.save(&path).unwrap();

        let mut source = XlsxSource::open(&path).unwrap();
        assert!(matches!(
            source.read_sheet("Nope"),
            Err(SheetError::SheetNotFound { name }) if name == "Nope"
        ));
    }
}
