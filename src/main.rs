//! `wearable-ingest` command line
//!
//! ## Usage
//!
//! ```bash
//! # Classify and validate one saved payload
//! wearable-ingest classify --label "Sleep Log by Date" --user-id ABC123 sleep.json
//!
//! # Process an orchestrator fetch job and export JSONL per table
//! wearable-ingest job fetch-job.json --out-dir ./export
//!
//! # List the tables of the active catalog
//! wearable-ingest tables
//! ```
//!
//! Tracing is off unless `WI_TRACE_LEVEL` or `WI_TRACE_FILE` is set; both
//! fall back to the `[logging]` section of the configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use wearable_ingest::config::LoggingConfig;
use wearable_ingest::{BatchReport, Config, FetchJob, Pipeline, TableRows};

static TRACE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Wearable payload classifier and row validator
#[derive(Parser, Debug)]
#[command(name = "wearable-ingest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: config.toml + config.local.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify and validate one payload file
    Classify {
        /// Endpoint label, e.g. "HRV Summary by Date"
        #[arg(long)]
        label: String,

        /// User id stamped on every row
        #[arg(long)]
        user_id: String,

        /// JSON payload file
        payload: PathBuf,

        /// Print the full per-field report instead of the summary
        #[arg(long)]
        report: bool,
    },

    /// Process an orchestrator fetch job
    Job {
        /// Fetch job JSON file
        job: PathBuf,

        /// Write the corrected rows as `<project>-<date>-<table>.jsonl`
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// List the tables of the active schema catalog
    Tables {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct TableLine<'a> {
    table: &'a str,
    rows: usize,
    rejected: usize,
    warnings: usize,
    errors: usize,
}

#[derive(Serialize)]
struct SummaryView<'a> {
    successes: usize,
    warnings: usize,
    errors: usize,
    tables: Vec<TableLine<'a>>,
}

impl<'a> SummaryView<'a> {
    fn new(batch: &'a BatchReport) -> Self {
        SummaryView {
            successes: batch.success_count,
            warnings: batch.warning_count,
            errors: batch.error_count,
            tables: batch
                .table_reports
                .iter()
                .map(|t| TableLine {
                    table: &t.table_name,
                    rows: t.corrected_rows.len(),
                    rejected: t.rows_rejected,
                    warnings: t.warnings.len(),
                    errors: t.errors.len(),
                })
                .collect(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(&path.to_string_lossy())
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Using default configuration ({e})");
            Config::default()
        }),
    };

    init_tracing(&config.logging);

    let pipeline = Pipeline::from_config(&config).context("building pipeline")?;

    match cli.command {
        Command::Classify {
            label,
            user_id,
            payload,
            report,
        } => {
            let payload: Value = read_json(&payload)?;
            let batch = pipeline.classify_and_validate(&label, &payload, &user_id);
            if report {
                print_json(&batch)?;
            } else {
                print_json(&SummaryView::new(&batch))?;
                print_json(&batch.corrected_payload())?;
            }
        }
        Command::Job { job, out_dir } => {
            let job = FetchJob::from_file(&job)
                .with_context(|| format!("reading fetch job {}", job.display()))?;
            let report = pipeline.process_fetch_job(&job)?;

            print_json(&SummaryView::new(&report.batch))?;
            for skip in &report.skipped {
                eprintln!("skipped: {} ({}) {}", skip.sensor, skip.user_id, skip.reason);
            }

            if let Some(dir) = out_dir {
                let summary = report.summary();
                let written = export_jsonl(
                    &dir,
                    &report.project_id,
                    &report.date,
                    &summary.corrected_payload,
                    config.ingest.chunk_size,
                )?;
                for path in written {
                    eprintln!("wrote {}", path.display());
                }
            }
        }
        Command::Tables { json } => {
            let registry = pipeline.registry();
            if json {
                println!("{}", registry.to_catalog_json()?);
            } else {
                println!("catalog {} ({} tables)", registry.version(), registry.len());
                for schema in registry.tables() {
                    println!("  {schema}");
                }
            }
        }
    }

    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One JSONL file per table; rows are written `chunk_size` lines at a time.
fn export_jsonl(
    dir: &Path,
    project: &str,
    date: &str,
    payload: &TableRows,
    chunk_size: usize,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::new();
    for (table, rows) in payload.iter() {
        let path = dir.join(format!("{project}-{date}-{table}.jsonl"));
        let file = fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);

        for chunk in rows.chunks(chunk_size.max(1)) {
            let mut buf = String::new();
            for row in chunk {
                buf.push_str(&serde_json::to_string(row)?);
                buf.push('\n');
            }
            out.write_all(buf.as_bytes())?;
        }
        out.flush()?;

        tracing::info!(table = %table, rows = rows.len(), path = %path.display(), "table_exported");
        written.push(path);
    }
    Ok(written)
}

fn init_tracing(logging_config: &LoggingConfig) {
    // Environment variables take precedence over config file values
    let level_env = env::var("WI_TRACE_LEVEL").ok();
    let file_env = env::var("WI_TRACE_FILE").ok();
    if level_env.is_none() && file_env.is_none() {
        return;
    }

    let log_path = file_env.unwrap_or_else(|| "wi_trace.log".to_string());

    let json = env::var("WI_TRACE_JSON")
        .ok()
        .map_or_else(|| logging_config.format == "json", |v| v != "0");

    let level = level_env.unwrap_or_else(|| logging_config.level.clone());

    let file = match fs::OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("ERROR: Unable to open WI_TRACE_FILE '{log_path}': {e}");
            return;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let _ = TRACE_GUARD.set(guard);

    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let base = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(non_blocking)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if json {
        Box::new(base.json().finish())
    } else {
        Box::new(base.compact().finish())
    };

    let _ = tracing::subscriber::set_global_default(subscriber);
}
