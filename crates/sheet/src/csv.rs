use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use crate::source::TableSource;
use std::fs;
use std::io::Read;
use std::path::Path;

/// CSV reader options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter; `None` sniffs `;` or `,` from the first line
    pub delimiter: Option<u8>,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Whether to use type inference when reading
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: None,
            quote: b'"',
            infer_types: true,
        }
    }
}

impl CsvOptions {
    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set whether to infer types
    #[must_use]
    pub fn with_type_inference(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

/// Guess the delimiter from the header line: semicolon exports are the norm
/// for comma-decimal locales.
fn sniff_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or_default();
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    if semicolons >= commas && semicolons > 0 {
        b';'
    } else {
        b','
    }
}

/// Parse CSV text into a sheet
pub fn parse_csv(name: &str, content: &str, options: &CsvOptions) -> Result<Sheet> {
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| sniff_delimiter(content));

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(options.quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut data: Vec<Vec<CellValue>> = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let row: Vec<CellValue> = record
            .iter()
            .map(|field| {
                if options.infer_types {
                    CellValue::parse(field)
                } else if field.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::String(field.to_string())
                }
            })
            .collect();
        data.push(row);
    }

    let mut sheet = Sheet::with_name(name);
    *sheet.data_mut() = data;
    Ok(sheet)
}

/// Single-sheet source backed by a CSV file
pub struct CsvSource {
    sheet: Sheet,
}

impl CsvSource {
    /// Read and parse a CSV file; the sheet is named after the file stem
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, &CsvOptions::default())
    }

    /// Read and parse a CSV file with custom options
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        fs::File::open(path)?.read_to_end(&mut bytes)?;
        // Non-UTF-8 bytes are replaced, not rejected
        let content = String::from_utf8_lossy(&bytes);
        let content = content.trim_start_matches('\u{feff}');

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1");
        let sheet = parse_csv(name, content, options)?;
        Ok(CsvSource { sheet })
    }
}

impl TableSource for CsvSource {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.sheet.name().to_string()]
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        if name == self.sheet.name() {
            Ok(self.sheet.clone())
        } else {
            Err(SheetError::SheetNotFound {
                name: name.to_string(),
            })
        }
    }
}
