//! Positional extraction of typed records from a raw sheet.

use crate::date::{self, DatePair};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{ReportError, ReportResult};
use indexmap::IndexMap;
use wmsreport_sheet::{column_index, CellValue, Sheet};

/// How a column's cells are normalized at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Float,
    Date,
}

/// One declared column of a report schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: &'static str,
    /// Column in letter notation, e.g. `"AH"`.
    pub column: &'static str,
    pub kind: ValueKind,
}

impl ColumnSpec {
    pub const fn new(field: &'static str, column: &'static str, kind: ValueKind) -> Self {
        Self {
            field,
            column,
            kind,
        }
    }

    /// Resolve the column letters to a 0-based offset.
    pub fn index(&self) -> ReportResult<usize> {
        column_index(self.column).map_err(|_| ReportError::InvalidColumnReference {
            field: self.field.to_string(),
            column: self.column.to_string(),
        })
    }
}

/// A normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// String and float columns keep the raw cell; quantities are parsed later.
    Cell(CellValue),
    Date(DatePair),
}

impl FieldValue {
    /// Whether the field counts as missing for the empty-key rule.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Cell(cell) => cell.is_blank(),
            FieldValue::Date(pair) => !pair.is_resolved() && pair.display.trim().is_empty(),
        }
    }

    /// String form used for keys, status codes and display.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Cell(cell) => cell.as_str(),
            FieldValue::Date(pair) => pair.display.clone(),
        }
    }
}

/// One extracted line item.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based sheet row the record came from.
    pub row: usize,
    fields: IndexMap<&'static str, FieldValue>,
}

impl Record {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, field: &'static str, value: FieldValue) -> Self {
        self.fields.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Raw cell of a string or float field.
    pub fn cell(&self, field: &str) -> Option<&CellValue> {
        match self.fields.get(field)? {
            FieldValue::Cell(cell) => Some(cell),
            FieldValue::Date(_) => None,
        }
    }

    /// Normalized date of a date field.
    pub fn date(&self, field: &str) -> Option<&DatePair> {
        match self.fields.get(field)? {
            FieldValue::Date(pair) => Some(pair),
            FieldValue::Cell(_) => None,
        }
    }

    /// Field as text; missing fields read as empty.
    pub fn text(&self, field: &str) -> String {
        self.fields
            .get(field)
            .map(FieldValue::as_text)
            .unwrap_or_default()
    }
}

/// Records produced by [`extract`].
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    /// Rows dropped because every key field was empty.
    pub dropped_empty_keys: usize,
}

/// Map raw rows to records using the declared schema.
///
/// Row 0 is the header and is skipped. Schema columns past the sheet's last
/// column read as empty and raise a warning. A record is kept when at least
/// one of `key_fields` is non-empty.
pub fn extract(
    sheet: &Sheet,
    schema: &[ColumnSpec],
    key_fields: &[&str],
    diagnostics: &mut Diagnostics,
) -> ReportResult<Extraction> {
    let available = sheet.col_count();

    let mut columns = Vec::with_capacity(schema.len());
    for spec in schema {
        let index = spec.index()?;
        if index < available {
            tracing::debug!("{} in column {} (index {})", spec.field, spec.column, index);
            columns.push((spec, Some(index)));
        } else {
            diagnostics.push(Warning::SchemaColumnOutOfRange {
                field: spec.field.to_string(),
                column: spec.column.to_string(),
                index,
                available,
            });
            columns.push((spec, None));
        }
    }

    let mut extraction = Extraction::default();
    for (row_idx, row) in sheet.rows().enumerate().skip(1) {
        let mut record = Record::new(row_idx + 1);
        for (spec, index) in &columns {
            let raw = index
                .and_then(|i| row.get(i))
                .cloned()
                .unwrap_or(CellValue::Null);
            let value = match spec.kind {
                ValueKind::Date => {
                    let pair = date::normalize(&raw);
                    if !pair.is_resolved() && !pair.display.trim().is_empty() {
                        diagnostics.push(Warning::DateParseFailure {
                            row: record.row,
                            value: pair.display.clone(),
                        });
                    }
                    FieldValue::Date(pair)
                }
                ValueKind::String | ValueKind::Float => FieldValue::Cell(raw),
            };
            record.fields.insert(spec.field, value);
        }

        let has_key = key_fields
            .iter()
            .any(|key| record.get(key).is_some_and(|v| !v.is_blank()));
        if has_key {
            extraction.records.push(record);
        } else {
            extraction.dropped_empty_keys += 1;
        }
    }

    tracing::info!(
        "Extracted {} records ({} dropped with empty keys)",
        extraction.records.len(),
        extraction.dropped_empty_keys
    );
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[ColumnSpec] = &[
        ColumnSpec::new("KEY", "A", ValueKind::String),
        ColumnSpec::new("SKU", "B", ValueKind::String),
        ColumnSpec::new("QTY", "C", ValueKind::Float),
        ColumnSpec::new("DATE", "D", ValueKind::Date),
        ColumnSpec::new("EXTRA", "Z", ValueKind::String),
    ];

    fn sheet() -> Sheet {
        let mut sheet = Sheet::with_name("Detail");
        *sheet.data_mut() = vec![
            vec!["KEY".into(), "SKU".into(), "QTY".into(), "DATE".into()],
            vec!["R1".into(), "S1".into(), "10,0".into(), CellValue::Float(45292.0)],
            vec![CellValue::Null, CellValue::Null, "5,0".into()],
            vec![CellValue::Null, "S2".into()],
            vec!["  ".into(), CellValue::Null, "1".into()],
        ];
        sheet
    }

    #[test]
    fn test_extract_positional_fields() {
        let mut diagnostics = Diagnostics::new();
        let extraction = extract(&sheet(), SCHEMA, &["KEY", "SKU"], &mut diagnostics).unwrap();

        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.dropped_empty_keys, 2);

        let first = &extraction.records[0];
        assert_eq!(first.row, 2);
        assert_eq!(first.text("KEY"), "R1");
        assert_eq!(first.cell("QTY"), Some(&CellValue::from("10,0")));
        assert_eq!(
            first.date("DATE").and_then(|d| d.iso_key.as_deref()),
            Some("2024-01-01")
        );

        // Retained with only one key present
        let second = &extraction.records[1];
        assert_eq!(second.row, 4);
        assert_eq!(second.text("KEY"), "");
        assert_eq!(second.text("SKU"), "S2");
        assert_eq!(second.cell("QTY"), Some(&CellValue::Null));
    }

    #[test]
    fn test_out_of_range_column_warns_and_reads_empty() {
        let mut diagnostics = Diagnostics::new();
        let extraction = extract(&sheet(), SCHEMA, &["KEY", "SKU"], &mut diagnostics).unwrap();

        assert!(extraction
            .records
            .iter()
            .all(|r| r.cell("EXTRA") == Some(&CellValue::Null)));
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::SchemaColumnOutOfRange {
                field: "EXTRA".to_string(),
                column: "Z".to_string(),
                index: 25,
                available: 4,
            }]
        );
    }

    #[test]
    fn test_invalid_column_reference_is_fatal() {
        let schema = [ColumnSpec::new("TYPE", "??", ValueKind::String)];
        let mut diagnostics = Diagnostics::new();
        let result = extract(&sheet(), &schema, &["TYPE"], &mut diagnostics);
        assert!(matches!(
            result,
            Err(ReportError::InvalidColumnReference { field, column }) if field == "TYPE" && column == "??"
        ));
    }

    #[test]
    fn test_unrecognized_dates_are_reported() {
        let mut sheet = sheet();
        sheet.data_mut()[2] = vec!["R2".into(), "S1".into(), "1".into(), "pending".into()];
        let mut diagnostics = Diagnostics::new();
        let extraction = extract(&sheet, &SCHEMA[..4], &["KEY", "SKU"], &mut diagnostics).unwrap();

        assert_eq!(extraction.records.len(), 3);
        assert_eq!(diagnostics.date_failures(), 1);
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::DateParseFailure {
                row: 3,
                value: "pending".to_string(),
            }]
        );
        // Missing dates are not failures
        assert_eq!(extraction.records[2].date("DATE"), Some(&DatePair::unresolved("")));
    }

    #[test]
    fn test_header_only_sheet() {
        let mut sheet = Sheet::with_name("Detail");
        *sheet.data_mut() = vec![vec!["KEY".into(), "SKU".into()]];
        let mut diagnostics = Diagnostics::new();
        let extraction = extract(&sheet, &SCHEMA[..2], &["KEY", "SKU"], &mut diagnostics).unwrap();
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.dropped_empty_keys, 0);
    }
}
