use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use crate::source::TableSource;
use indexmap::IndexMap;

/// An in-memory book of sheets (preserves insertion order)
#[derive(Debug, Clone, Default)]
pub struct Book {
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Add a sheet to the book
    pub fn add_sheet(&mut self, name: &str, sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }

        let mut sheet = sheet;
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Builder-style variant of `add_sheet`
    pub fn with_sheet(mut self, name: &str, sheet: Sheet) -> Result<Self> {
        self.add_sheet(name, sheet)?;
        Ok(self)
    }
}

impl TableSource for Book {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        self.get_sheet(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_preserves_order() {
        let mut book = Book::new();
        book.add_sheet("Header", Sheet::new()).unwrap();
        book.add_sheet("Detail", Sheet::new()).unwrap();
        book.add_sheet("Summary", Sheet::new()).unwrap();

        assert_eq!(book.sheet_names(), vec!["Header", "Detail", "Summary"]);
    }

    #[test]
    fn test_duplicate_sheet_rejected() {
        let mut book = Book::new();
        book.add_sheet("Detail", Sheet::new()).unwrap();
        let result = book.add_sheet("Detail", Sheet::new());
        assert!(matches!(result, Err(SheetError::SheetAlreadyExists { .. })));
    }

    #[test]
    fn test_read_sheet_renames_and_clones() {
        let mut book = Book::new()
            .with_sheet("Detail", Sheet::from_data(vec![vec!["a", "b"]]))
            .unwrap();

        let sheet = book.read_sheet("Detail").unwrap();
        assert_eq!(sheet.name(), "Detail");
        assert_eq!(sheet.col_count(), 2);
        assert!(matches!(
            book.read_sheet("Missing"),
            Err(SheetError::SheetNotFound { name }) if name == "Missing"
        ));
    }
}
