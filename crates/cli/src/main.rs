//! # wmsreport-cli
//!
//! Runs one warehouse report over an export file and prints the JSON result.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use wmsreport_core::{
    generate_request_id, FailureResult, Outcome, PipelineOptions, ReportError, ReportKind,
    ReportPipeline, DEFAULT_PREVIEW_LIMIT,
};
use wmsreport_sheet::open_source;

/// wmsreport - Summarize warehouse export spreadsheets
#[derive(Parser, Debug)]
#[command(name = "wmsreport")]
#[command(author, version, about = "Group and summarize warehouse export spreadsheets", long_about = None)]
struct Cli {
    /// Export file (xls, xlsx, xlsm, xlsb, ods or csv)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Report type
    #[arg(short, long, value_enum)]
    report: ReportArg,

    /// Earliest date to keep (yyyy-mm-dd)
    #[arg(long, value_name = "DATE")]
    from: Option<String>,

    /// Latest date to keep (yyyy-mm-dd)
    #[arg(long, value_name = "DATE")]
    to: Option<String>,

    /// Include every output row, not just the preview
    #[arg(long)]
    full_rows: bool,

    /// Number of rows in the preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_LIMIT)]
    preview_limit: usize,

    /// Read this sheet instead of auto-selecting the detail sheet
    #[arg(short, long)]
    sheet: Option<String>,

    /// Identifier echoed in the result and logs
    #[arg(long)]
    request_id: Option<String>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Report selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum ReportArg {
    /// Goods received
    Reception,
    /// Orders shipped
    Dispatch,
    /// Packages
    Packaging,
    /// Stock by location
    Storage,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Reception => ReportKind::Reception,
            ReportArg::Dispatch => ReportKind::Dispatch,
            ReportArg::Packaging => ReportKind::Packaging,
            ReportArg::Storage => ReportKind::Storage,
        }
    }
}

impl Cli {
    fn options(&self, request_id: &str) -> PipelineOptions {
        PipelineOptions {
            from: self.from.clone(),
            to: self.to.clone(),
            preview_limit: self.preview_limit,
            include_full_rows: self.full_rows.then_some(true),
            sheet: self.sheet.clone(),
            request_id: Some(request_id.to_string()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; stdout carries only the JSON document
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    match run(&cli, &mut stdout.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Run the selected report and write the outcome as JSON.
///
/// Returns whether the pipeline succeeded. Files that cannot be opened are
/// reported as failure results, like any other structural error.
fn run(cli: &Cli, out: &mut impl Write) -> Result<bool> {
    let start = Instant::now();
    let request_id = cli.request_id.clone().unwrap_or_else(generate_request_id);
    let kind = ReportKind::from(cli.report);
    tracing::info!("Processing {} as {}", cli.file.display(), kind);

    let outcome = match open_source(&cli.file) {
        Ok(mut source) => {
            ReportPipeline::new(kind).process(source.as_mut(), &cli.options(&request_id))
        }
        Err(err) => {
            let err = ReportError::from(err);
            tracing::error!(request_id = %request_id, kind = err.kind(), "{err}");
            Outcome::Failure(FailureResult::from_error(
                &err,
                request_id,
                start.elapsed().as_secs_f64(),
            ))
        }
    };

    let json = outcome
        .to_json_string(cli.pretty)
        .context("Failed to serialize result")?;
    writeln!(out, "{json}").context("Failed to write result")?;
    Ok(outcome.is_success())
}
