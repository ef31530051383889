// LogTally - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Import into the selected record store
// 4. Date-range filtering, optional export, and report output

use chrono::{DateTime, Utc};
use clap::Parser;
use logtally::app::import::{import_file, ImportSummary};
use logtally::app::report::{AnalysisReport, ReportOptions};
use logtally::app::store::{JsonLinesStore, MemoryStore, RecordStore};
use logtally::core::export;
use logtally::core::filter::{apply_filter, RecordFilter};
use logtally::core::model::{LogRecord, ParsePolicy};
use logtally::core::parser::parse_timestamp;
use logtally::platform::config::{load_config, AppConfig, PlatformPaths};
use logtally::util;
use logtally::util::error::{AppError, ExportError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// LogTally - log file parser and analyser
#[derive(Parser, Debug)]
#[command(name = "logtally", version, about)]
struct Cli {
    /// Log file to import.
    file: PathBuf,

    /// Only analyse records at or after this date-time.
    #[arg(long = "start-date", value_parser = parse_date_arg)]
    start_date: Option<DateTime<Utc>>,

    /// Only analyse records at or before this date-time.
    #[arg(long = "end-date", value_parser = parse_date_arg)]
    end_date: Option<DateTime<Utc>>,

    /// Number of most frequent error messages to show.
    #[arg(long = "top")]
    top: Option<usize>,

    /// Find the first occurrence of a term and list matching records.
    #[arg(long = "search")]
    search: Option<String>,

    /// Report a diagnostic for every line that could not be parsed.
    #[arg(long = "strict")]
    strict: bool,

    /// Persistent record store (JSON lines). Records accumulate across runs.
    #[arg(long = "store")]
    store: Option<PathBuf>,

    /// Export the analysed records (.json for JSON, anything else for CSV).
    #[arg(long = "export")]
    export: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long = "json")]
    json: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn parse_date_arg(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_timestamp(raw).ok_or_else(|| format!("'{raw}' is not a recognised date-time"))
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let (config, config_warnings) = load_config(&platform_paths.config_file());

    // Initialise logging subsystem
    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LogTally starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Err(e) = run(&cli, &config, &platform_paths) {
        tracing::error!(error = %e, "LogTally failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &AppConfig, paths: &PlatformPaths) -> Result<()> {
    let policy = if cli.strict {
        ParsePolicy::Strict
    } else {
        config.parse_policy
    };

    let mut store: Box<dyn RecordStore> =
        match select_store_path(cli.store.as_deref(), config, paths) {
            Some(path) => Box::new(JsonLinesStore::open(path)),
            None => Box::new(MemoryStore::new()),
        };

    let summary = import_file(store.as_mut(), &cli.file, policy)?;
    report_diagnostics(&summary);

    let records = store.read_all()?;
    let filter = RecordFilter::time_range(cli.start_date, cli.end_date);
    let records = if filter.is_empty() {
        records
    } else {
        let filtered = apply_filter(&records, &filter);
        tracing::info!(
            total = records.len(),
            kept = filtered.len(),
            "Date range filter applied"
        );
        filtered
    };

    if let Some(ref export_path) = cli.export {
        let rows = export_records(&records, export_path)?;
        tracing::info!(path = %export_path.display(), rows, "Export complete");
    }

    let options = ReportOptions {
        top: cli.top.unwrap_or(config.top_errors),
        search_term: cli.search.clone(),
    };
    let report = AnalysisReport::build(&records, &options);

    write_report(&report, cli.json, io::stdout().lock())
}

/// CLI override > config > in-memory. A `--store` path is used as given; a
/// relative `[storage] path` resolves under the platform data directory.
fn select_store_path(
    cli_store: Option<&Path>,
    config: &AppConfig,
    paths: &PlatformPaths,
) -> Option<PathBuf> {
    match cli_store {
        Some(path) => Some(path.to_path_buf()),
        None => config.store_path.as_deref().map(|path| paths.store_path(path)),
    }
}

fn write_report<W: Write>(report: &AnalysisReport, as_json: bool, mut out: W) -> Result<()> {
    let print_err = |source: io::Error| AppError::Io {
        path: PathBuf::from("<stdout>"),
        operation: "print",
        source,
    };

    if as_json {
        serde_json::to_writer_pretty(&mut out, report)
            .map_err(io::Error::from)
            .map_err(print_err)?;
        writeln!(out).map_err(print_err)?;
    } else {
        out.write_all(report.render_text().as_bytes())
            .map_err(print_err)?;
    }
    out.flush().map_err(print_err)
}

fn report_diagnostics(summary: &ImportSummary) {
    for diagnostic in &summary.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    let undiagnosed = summary.lines_skipped - summary.diagnostics.len() as u64;
    if !summary.diagnostics.is_empty() && undiagnosed > 0 {
        eprintln!("warning: {undiagnosed} further lines skipped without diagnostics");
    }
}

fn export_records(records: &[LogRecord], path: &Path) -> Result<usize> {
    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let writer = BufWriter::new(file);

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let rows = if is_json {
        export::export_json(records, writer, path)?
    } else {
        export::export_csv(records, writer, path)?
    };
    Ok(rows)
}
