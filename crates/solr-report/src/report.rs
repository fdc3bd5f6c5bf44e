use crate::prelude::{eprintln, print, *};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// Import domain models and pure functions from core
use solr_report_core::callnumber::classify_call_number;
use solr_report_core::record::Record;
use solr_report_core::report::{
    render_csv, render_json, render_text, Report, SortKeyPolicy, SortOutcome,
};

/// Platform the report is produced on.
///
/// Accepted for compatibility with existing invocations. Output is UTF-8 with CRLF-terminated
/// CSV rows on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Platform {
    Win,
    Mac,
}

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ConsoleFormat {
    /// Header line plus `main, raw, title` per record
    #[default]
    Plain,
    /// Aligned table with the same columns as plain
    Table,
    /// JSON array with all fields
    Json,
}

/// Handling of call numbers that yield no sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OnBadKey {
    /// Abort without producing any output
    #[default]
    Error,
    /// Leave the record out of the report
    Skip,
    /// List the record after all sorted records
    Last,
}

impl From<OnBadKey> for SortKeyPolicy {
    fn from(value: OnBadKey) -> Self {
        match value {
            OnBadKey::Error => SortKeyPolicy::Error,
            OnBadKey::Skip => SortKeyPolicy::Skip,
            OnBadKey::Last => SortKeyPolicy::Last,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct ReportOptions {
    /// Platform the report is produced on
    #[arg(value_enum, value_name = "PLATFORM")]
    pub platform: Platform,

    /// Search results exported as JSON
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// CSV file to write in addition to the console report
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Console output format
    #[arg(long, value_enum, env = "SOLR_REPORT_FORMAT", default_value = "plain")]
    pub format: ConsoleFormat,

    /// What to do with call numbers that have no numeric part after their prefix
    #[arg(long, value_enum, env = "SOLR_REPORT_ON_BAD_KEY", default_value = "error")]
    pub on_bad_key: OnBadKey,
}

/// Module entry point
pub fn run(options: ReportOptions, global: crate::Global) -> Result<()> {
    log::debug!("Platform {:?}", options.platform);

    let text = load_input(&options.input)?;

    let report = Report::from_json(&text)
        .with_context(|| f!("Failed to load {}", options.input.display()))?;
    if let Some(found) = report.num_found() {
        log::debug!("Search service reported {found} matches");
    }
    log::debug!("Built {} records", report.len());

    for record in report.records() {
        log::debug!(
            "{:?} -> {:?} ({:?})",
            record.raw_call_number,
            record.main_call_number,
            classify_call_number(&record.raw_call_number)
        );
    }

    let outcome = report.sorted(options.on_bad_key.into())?;
    log_rejected(&outcome, options.on_bad_key);

    // Nothing reaches stdout until the console text is rendered and the CSV is on disk
    let console = render_console(&outcome, options.format)?;

    let staged = match &options.output {
        Some(path) => Some((path, stage_output(path, &render_csv(&outcome.records)?)?)),
        None => None,
    };

    print!("{console}");

    if let Some((path, staged)) = staged {
        persist_output(staged, path)?;
        log::info!("Wrote {} records to {}", outcome.records.len(), path.display());
    }

    if global.verbose {
        eprintln!();
        eprintln!("Records: {}", outcome.records.len());
        eprintln!("Without sort key: {}", outcome.rejected.len());
        if let Some(path) = &options.output {
            eprintln!("CSV: {}", path.display());
        }
    }

    Ok(())
}

/// Read the whole search export
fn load_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::InputPath(path.display().to_string()).into());
    }

    fs::read_to_string(path).with_context(|| f!("Failed to read {}", path.display()))
}

fn log_rejected(outcome: &SortOutcome, on_bad_key: OnBadKey) {
    let action = match on_bad_key {
        OnBadKey::Skip => "skipped",
        OnBadKey::Last => "listed last",
        OnBadKey::Error => return,
    };

    for err in &outcome.rejected {
        log::warn!("{err}; {action}");
    }
}

fn render_console(outcome: &SortOutcome, format: ConsoleFormat) -> Result<String> {
    let console = match format {
        ConsoleFormat::Plain => render_text(&outcome.records),
        ConsoleFormat::Table => render_table(&outcome.records).to_string(),
        ConsoleFormat::Json => f!("{}\n", render_json(&outcome.records)?),
    };

    Ok(console)
}

/// Same columns as the plain console report
pub fn render_table(records: &[Record]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row![
        "main call number",
        "all call numbers",
        "title"
    ]);

    for record in records {
        table.add_row(prettytable::row![
            &record.main_call_number,
            &record.raw_call_number,
            &record.title
        ]);
    }

    table
}

/// Write the CSV to a temporary file in the target's directory.
///
/// The file is removed when dropped, so any failure before [`persist_output`] leaves the
/// target untouched.
fn stage_output(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let output_err = |e: std::io::Error| Error::OutputPath(path.display().to_string(), e);

    let mut staged = NamedTempFile::new_in(dir).map_err(output_err)?;
    staged.write_all(bytes).map_err(output_err)?;
    staged.flush().map_err(output_err)?;

    Ok(staged)
}

/// Move a staged CSV over the target
fn persist_output(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged
        .persist(path)
        .map_err(|e| Error::OutputPath(path.display().to_string(), e.error))?;

    Ok(())
}
