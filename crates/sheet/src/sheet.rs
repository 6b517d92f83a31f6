use crate::cell::CellValue;

/// A named, row-major grid of raw cell values
///
/// Rows may be ragged; `col_count` reports the widest row and `get` treats
/// missing cells as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
        }
    }

    /// Create a sheet from anything convertible into cell values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(rows: Vec<Vec<T>>) -> Self {
        let data = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Sheet {
            name: "Sheet1".to_string(),
            data,
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Number of rows, header row included
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Width of the widest row
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Get a cell; out-of-range positions read as `None`
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    /// Mutably borrow the underlying rows
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.data
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.data.iter().map(Vec::as_slice)
    }
}
