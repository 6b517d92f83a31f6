//! Raw workbook access for warehouse export spreadsheets
//!
//! Provides the untyped cell model, column-letter indexing, detail-sheet
//! selection, and [`TableSource`] readers for calamine workbooks and CSV files.
//!
//! # Examples
//!
//! ## Selecting the detail sheet of an in-memory book
//!
//! ```
//! use wmsreport_sheet::{select_detail_sheet, Book, Sheet, TableSource};
//!
//! let mut book = Book::new();
//! book.add_sheet("Header", Sheet::new()).unwrap();
//! book.add_sheet("Detail Report", Sheet::from_data(vec![vec!["RECEIPTKEY"]])).unwrap();
//! book.add_sheet("Summary", Sheet::new()).unwrap();
//!
//! let names = book.sheet_names();
//! let selected = select_detail_sheet(&names).unwrap();
//! assert_eq!(selected, "Detail Report");
//!
//! let sheet = book.read_sheet(selected).unwrap();
//! assert_eq!(sheet.row_count(), 1);
//! ```
//!
//! ## Column letters
//!
//! ```
//! use wmsreport_sheet::{column_index, column_letters};
//!
//! assert_eq!(column_index("AH").unwrap(), 33);
//! assert_eq!(column_letters(33), "AH");
//! ```
//!
//! ## Opening a file
//!
//! ```no_run
//! use wmsreport_sheet::open_source;
//!
//! let source = open_source("reception.xlsx").unwrap();
//! println!("{:?}", source.sheet_names());
//! ```

mod a1_notation;
mod book;
mod cell;
mod csv;
mod error;
mod select;
mod sheet;
mod source;
mod xlsx;

/// Re-export column-letter conversions.
pub use a1_notation::{column_index, column_letters};
/// Re-export the in-memory book.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV reader types.
pub use csv::{parse_csv, CsvOptions, CsvSource};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export detail-sheet selection.
pub use select::select_detail_sheet;
/// Re-export sheet type.
pub use sheet::Sheet;
/// Re-export the source abstraction.
pub use source::{open_source, TableSource, SUPPORTED_EXTENSIONS};
/// Re-export the calamine-backed source.
pub use xlsx::XlsxSource;
