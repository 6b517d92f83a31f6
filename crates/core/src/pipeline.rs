//! The report pipeline: extract, filter, group, serialize.

use crate::aggregate::{Group, GroupAggregator, UomBucket};
use crate::diagnostics::Diagnostics;
use crate::error::{ReportError, ReportResult};
use crate::filter::{DateRangeFilter, FilterStats, StatusFilter};
use crate::format::format_locale;
use crate::record::{extract, Record};
use crate::report::{ColumnSource, ReportConfig, ReportKind};
use crate::serialize::{
    round2, table_to_json, AppliedFilters, FailureResult, Metadata, Outcome, ProcessingResult,
    ProcessingStats, TableCell, DEFAULT_PREVIEW_LIMIT,
};
use indexmap::{IndexMap, IndexSet};
use std::time::Instant;
use tracing::{debug, info, info_span};
use wmsreport_sheet::{select_detail_sheet, CellValue, SheetError, TableSource};

/// Runtime options for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Lower date bound, `yyyy-mm-dd` with optional time.
    pub from: Option<String>,
    /// Upper date bound, `yyyy-mm-dd` with optional time.
    pub to: Option<String>,
    pub preview_limit: usize,
    /// Include every output row; `None` uses the report's default.
    pub include_full_rows: Option<bool>,
    /// Sheet to read instead of the auto-selected detail sheet.
    pub sheet: Option<String>,
    pub request_id: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            include_full_rows: None,
            sheet: None,
            request_id: None,
        }
    }
}

impl PipelineOptions {
    pub fn with_range(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.from = from.map(str::to_string);
        self.to = to.map(str::to_string);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// A timestamp identifier, `YYYYmmdd_HHMMSS_ffffff`.
pub fn generate_request_id() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S_%6f").to_string()
}

/// Runs one report configuration over a table source.
#[derive(Debug, Clone, Copy)]
pub struct ReportPipeline {
    config: &'static ReportConfig,
}

impl ReportPipeline {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            config: kind.config(),
        }
    }

    pub fn config(&self) -> &'static ReportConfig {
        self.config
    }

    /// Run the pipeline and fold any fatal error into a failure result.
    pub fn process(&self, source: &mut dyn TableSource, options: &PipelineOptions) -> Outcome {
        let start = Instant::now();
        let request_id = options
            .request_id
            .clone()
            .unwrap_or_else(generate_request_id);

        match self.execute(source, options, &request_id, start) {
            Ok(result) => Outcome::Success(Box::new(result)),
            Err(err) => {
                tracing::error!(request_id = %request_id, kind = err.kind(), "{err}");
                Outcome::Failure(FailureResult::from_error(
                    &err,
                    request_id,
                    start.elapsed().as_secs_f64(),
                ))
            }
        }
    }

    /// Run the pipeline, returning fatal errors to the caller.
    pub fn run(
        &self,
        source: &mut dyn TableSource,
        options: &PipelineOptions,
    ) -> ReportResult<ProcessingResult> {
        let start = Instant::now();
        let request_id = options
            .request_id
            .clone()
            .unwrap_or_else(generate_request_id);
        self.execute(source, options, &request_id, start)
    }

    fn execute(
        &self,
        source: &mut dyn TableSource,
        options: &PipelineOptions,
        request_id: &str,
        start: Instant,
    ) -> ReportResult<ProcessingResult> {
        let config = self.config;
        let span = info_span!("report", kind = %config.kind, request_id = %request_id);
        let _guard = span.enter();
        let mut diagnostics = Diagnostics::new();

        // Sheet
        let sheet_names = source.sheet_names();
        debug!("Sheets available: {:?}", sheet_names);
        let sheet_name = match options.sheet.as_deref() {
            Some(name) => name.to_string(),
            None => select_detail_sheet(&sheet_names)
                .map_err(|err| match err {
                    SheetError::NoSheetsAvailable => ReportError::NoSheetsAvailable,
                    other => ReportError::Sheet(other),
                })?
                .to_string(),
        };
        info!("Reading sheet '{}'", sheet_name);
        let sheet = source.read_sheet(&sheet_name)?;
        info!(
            rows = sheet.row_count(),
            columns = sheet.col_count(),
            "sheet loaded"
        );

        // Extraction
        let extraction = extract(
            &sheet,
            config.schema,
            &config.key_field_list(),
            &mut diagnostics,
        )?;
        drop(sheet);
        let source_rows = extraction.records.len();
        let unresolved_dates = config.date_field.map_or(0, |field| {
            extraction
                .records
                .iter()
                .filter(|r| r.date(field).is_some_and(|d| !d.is_resolved()))
                .count()
        });
        let mut records = extraction.records;

        // Filters
        let mut stats = FilterStats::default();
        if let Some(rule) = config.status {
            let (kept, rejected) = StatusFilter::new(rule.field, rule.allowed).filter(records);
            records = kept;
            stats.rejected_by_status = rejected;
        }

        let mut applied = AppliedFilters::default();
        match config.date_field {
            Some(field) => {
                let range = DateRangeFilter::new(
                    options.from.as_deref(),
                    options.to.as_deref(),
                    &mut diagnostics,
                );
                records = range.filter(records, field, &mut stats);
                applied.from = range.from().map(str::to_string);
                applied.to = range.to().map(str::to_string);
            }
            None if options.from.is_some() || options.to.is_some() => {
                debug!("{} has no date column; bounds ignored", config.kind);
            }
            None => {}
        }

        // Grouping
        let rows_before_grouping = records.len();
        let aggregator = GroupAggregator {
            key_fields: config.key_fields,
            quantity: config.quantity_field,
            uom: config.uom_field,
            date: config.date_field,
        };
        let groups = aggregator.aggregate(records, &mut diagnostics);

        let table: Vec<Vec<TableCell>> = groups.iter().map(|g| self.output_row(g)).collect();
        let total = table.len();
        let preview_len = total.min(options.preview_limit);
        let include_full_rows = options
            .include_full_rows
            .unwrap_or(config.full_rows_by_default);

        let totals = |bucket: UomBucket| {
            groups
                .iter()
                .map(|g| g.bucket_total(bucket))
                .fold(0, i64::saturating_add)
        };
        let (total_units, total_boxes, total_pallets) = (
            totals(UomBucket::Units),
            totals(UomBucket::Boxes),
            totals(UomBucket::Pallets),
        );
        let unique_primary_keys = groups
            .iter()
            .map(|g| g.first.text(config.key_fields.0))
            .collect::<IndexSet<_>>()
            .len();

        let stats = ProcessingStats {
            total_filtered: total,
            showing: preview_len,
            rejected_by_status: stats.rejected_by_status,
            rejected_by_date: stats.rejected_by_date,
            iso_min: stats.iso_min,
            iso_max: stats.iso_max,
            sheet: sheet_name,
            total_units,
            total_boxes,
            total_pallets,
            total_units_display: format_locale(total_units as f64, 0),
            total_boxes_display: format_locale(total_boxes as f64, 0),
            total_pallets_display: format_locale(total_pallets as f64, 0),
            source_rows,
            dropped_empty_keys: extraction.dropped_empty_keys,
            rows_before_grouping,
            grouped_rows: total,
            grouping_reduction: rows_before_grouping - total,
            unresolved_dates,
            quantity_parse_failures: diagnostics.quantity_failures(),
            unique_primary_keys,
            applied_filters: applied,
        };
        let messages = self.messages(&stats);

        info!(
            source_rows,
            rejected_by_status = stats.rejected_by_status,
            rejected_by_date = stats.rejected_by_date,
            groups = total,
            total_units,
            total_boxes,
            total_pallets,
            "report complete"
        );

        Ok(ProcessingResult {
            success: true,
            total_records: total,
            headers: config.headers(),
            preview_rows: table_to_json(&table[..preview_len]),
            full_rows: include_full_rows.then(|| table_to_json(&table)),
            stats,
            messages,
            warnings: diagnostics.into_warnings(),
            metadata: Metadata {
                report_type: config.kind,
                request_id: request_id.to_string(),
                elapsed_seconds: round2(start.elapsed().as_secs_f64()),
            },
        })
    }

    fn output_row(&self, group: &Group) -> Vec<TableCell> {
        self.config
            .output
            .iter()
            .map(|column| match column.source {
                ColumnSource::Field(field) => field_cell(&group.first, field),
                ColumnSource::Date => group
                    .date
                    .clone()
                    .map_or(TableCell::Value(CellValue::Null), TableCell::Date),
                ColumnSource::Bucket(bucket) => TableCell::Quantity(group.bucket_total(bucket)),
            })
            .collect()
    }

    fn messages(&self, stats: &ProcessingStats) -> IndexMap<String, String> {
        let mut messages = IndexMap::new();
        messages.insert(
            "sheet".to_string(),
            format!("Data extracted from sheet '{}'", stats.sheet),
        );
        messages.insert(
            "grouping".to_string(),
            format!(
                "Grouped {} records into {} groups (reduction of {} rows)",
                stats.rows_before_grouping, stats.grouped_rows, stats.grouping_reduction
            ),
        );
        if stats.rejected_by_status > 0 {
            if let Some(rule) = self.config.status {
                messages.insert(
                    "status".to_string(),
                    format!(
                        "Filtered out {} records with {} other than {}",
                        stats.rejected_by_status,
                        rule.field,
                        rule.allowed.join("/")
                    ),
                );
            }
        }
        if stats.rejected_by_date > 0 {
            messages.insert(
                "date".to_string(),
                format!(
                    "Filtered out {} records outside the date range",
                    stats.rejected_by_date
                ),
            );
        }
        if stats.grouped_rows == 0 {
            messages.insert(
                "empty".to_string(),
                format!("No {} match the applied filters", self.config.primary_label),
            );
        }
        messages
    }
}

fn field_cell(record: &Record, field: &str) -> TableCell {
    if let Some(date) = record.date(field) {
        return TableCell::Date(date.clone());
    }
    TableCell::Value(record.cell(field).cloned().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wmsreport_sheet::{Book, Sheet};

    fn storage_book() -> Book {
        let sheet = Sheet::from_data(vec![
            vec!["CODIGO", "PRODUCTO", "UBICACION", "STOCK"],
            vec!["P1", "Widget", "A-01", "10"],
            vec!["P1", "Widget", "A-01", "5"],
            vec!["P1", "Widget", "B-02", "1,5"],
            vec!["", "Orphan", "", "99"],
        ]);
        Book::new().with_sheet("Inventario", sheet).unwrap()
    }

    #[test]
    fn test_storage_report_groups_by_code_and_location() {
        let pipeline = ReportPipeline::new(ReportKind::Storage);
        let options = PipelineOptions::default().with_request_id("t-1");
        let result = pipeline.run(&mut storage_book(), &options).unwrap();

        assert_eq!(result.total_records, 2);
        assert_eq!(result.headers[3], "STOCK");
        assert_eq!(result.preview_rows[0][3], serde_json::json!(15));
        assert_eq!(result.preview_rows[1][3], serde_json::json!(1));
        assert_eq!(result.stats.total_units, 16);
        assert_eq!(result.stats.dropped_empty_keys, 1);
        assert_eq!(result.stats.unique_primary_keys, 1);
        assert_eq!(result.stats.iso_min, None);
        assert!(result.full_rows.is_none());
        assert_eq!(result.metadata.request_id, "t-1");
        // Out-of-range STOCK_MIN/STOCK_MAX/VALOR columns
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let sheet = Sheet::from_data(vec![vec!["CODIGO", "PRODUCTO", "UBICACION", "STOCK"]]);
        let mut book = Book::new().with_sheet("Inventario", sheet).unwrap();
        let result = ReportPipeline::new(ReportKind::Storage)
            .run(&mut book, &PipelineOptions::default())
            .unwrap();
        assert_eq!(result.total_records, 0);
        assert!(result.preview_rows.is_empty());
        assert_eq!(result.stats.total_units_display, "0");
        assert!(result.messages.contains_key("empty"));
    }

    #[test]
    fn test_no_sheets_is_a_failure_result() {
        let outcome = ReportPipeline::new(ReportKind::Reception)
            .process(&mut Book::new(), &PipelineOptions::default().with_request_id("r"));
        match outcome {
            Outcome::Failure(failure) => {
                assert!(!failure.success);
                assert_eq!(failure.error_kind, "NoSheetsAvailable");
                assert_eq!(failure.request_id, "r");
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_missing_override_sheet() {
        let options = PipelineOptions {
            sheet: Some("Nope".to_string()),
            ..PipelineOptions::default()
        };
        let err = ReportPipeline::new(ReportKind::Storage)
            .run(&mut storage_book(), &options)
            .unwrap_err();
        assert_eq!(err.kind(), "SheetNotFound");
    }

    #[test]
    fn test_request_id_shape() {
        let id = generate_request_id();
        assert_eq!(id.len(), 22);
        assert_eq!(&id[8..9], "_");
        assert_eq!(&id[15..16], "_");
    }
}
