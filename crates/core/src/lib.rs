//! # wmsreport-core
//!
//! Turns warehouse-management export spreadsheets into grouped, JSON-ready
//! summary tables.
//!
//! A [`ReportPipeline`] runs one report configuration over a
//! [`TableSource`](wmsreport_sheet::TableSource):
//! - positional record extraction with an empty-key drop
//! - date and comma-decimal quantity normalization
//! - status whitelist and date range filtering
//! - composite-key grouping into unit-of-measure buckets
//! - JSON-safe serialization with a bounded preview
//!
//! ```
//! use wmsreport_core::{Outcome, PipelineOptions, ReportKind, ReportPipeline};
//! use wmsreport_sheet::{Book, Sheet};
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["CODIGO", "PRODUCTO", "UBICACION", "STOCK"],
//!     vec!["P1", "Widget", "A-01", "1.200,00"],
//! ]);
//! let mut book = Book::new().with_sheet("Stock", sheet).unwrap();
//!
//! let pipeline = ReportPipeline::new(ReportKind::Storage);
//! match pipeline.process(&mut book, &PipelineOptions::default()) {
//!     Outcome::Success(result) => assert_eq!(result.stats.total_units, 1200),
//!     Outcome::Failure(failure) => panic!("{}", failure.error),
//! }
//! ```

/// Composite-key grouping.
pub mod aggregate;
/// Date normalization.
pub mod date;
/// Non-fatal warnings.
pub mod diagnostics;
/// Error types and result aliases.
pub mod error;
/// Status and date range filters.
pub mod filter;
/// Locale number rendering.
pub mod format;
/// The orchestrator.
pub mod pipeline;
/// Quantity parsing.
pub mod quantity;
/// Record extraction.
pub mod record;
/// Report configurations.
pub mod report;
/// Result documents.
pub mod serialize;

/// Re-export grouping types.
pub use aggregate::{Group, GroupAggregator, UomBucket};
/// Re-export date normalization.
pub use date::{normalize as normalize_date, DatePair};
/// Re-export warning collection.
pub use diagnostics::{Diagnostics, Warning};
/// Re-export core error types.
pub use error::{ReportError, ReportResult};
/// Re-export record filters.
pub use filter::{DateRangeFilter, FilterStats, StatusFilter};
/// Re-export locale number formatting.
pub use format::format_locale;
/// Re-export the pipeline entry points.
pub use pipeline::{generate_request_id, PipelineOptions, ReportPipeline};
/// Re-export quantity parsing.
pub use quantity::{parse_integer, try_parse_integer, QuantityParseError};
/// Re-export record extraction.
pub use record::{extract, ColumnSpec, Extraction, FieldValue, Record, ValueKind};
/// Re-export report configurations.
pub use report::{ColumnSource, OutputColumn, ReportConfig, ReportKind, StatusRule};
/// Re-export result documents.
pub use serialize::{
    FailureResult, Metadata, Outcome, ProcessingResult, ProcessingStats, TableCell,
    DEFAULT_PREVIEW_LIMIT,
};
