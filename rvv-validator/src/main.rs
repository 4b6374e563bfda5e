//! rvv-validator - disclosure report validator
//!
//! Validates one or more CSV import files of a single report kind against the
//! catalog for that kind and prints a completion summary per file.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rvv_common::config::{load_config, resolve_catalog_dir};
use rvv_common::ReportKind;
use rvv_validator::export::TemplateSheet;
use rvv_validator::{BatchReport, BatchValidator, FileOutcome};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for rvv-validator
#[derive(Parser, Debug)]
#[command(name = "rvv-validator")]
#[command(about = "Validate company, fund and GP disclosure reports")]
#[command(version)]
struct Args {
    /// Report kind: company, fund or gp
    kind: ReportKind,

    /// CSV import files, one entity each
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory holding <kind>.toml catalogs
    #[arg(long)]
    catalog_dir: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the populated template to this file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Template workbook to fill; without one the export is a CSV grid
    #[arg(short, long)]
    template: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    match &config.logging.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    info!(
        "Starting rvv-validator v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let catalog_dir = resolve_catalog_dir(args.catalog_dir.as_deref(), &config);
    let validator = BatchValidator::load(args.kind, catalog_dir.as_deref())
        .with_context(|| format!("Failed to load {} catalog", args.kind))?;
    let report = validator.run(args.files).await;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_text(&report),
    }

    if let Some(path) = args.export.or(config.export.output) {
        let Some(layout) = validator.catalog().export.as_ref() else {
            bail!("The {} catalog has no export layout", validator.catalog().kind);
        };
        let sheet = TemplateSheet::populate(layout, report.summaries());
        if sheet.is_empty() {
            warn!("Nothing to export");
        }
        match args.template.or(config.export.template) {
            Some(template) => sheet
                .write_workbook(&template, &path)
                .with_context(|| format!("Failed to fill template {}", template.display()))?,
            None => sheet
                .write_csv_file(&path)
                .with_context(|| format!("Failed to write template grid {}", path.display()))?,
        }
    }

    if report.all_rejected() {
        bail!("All {} input files were rejected", report.files.len());
    }
    Ok(())
}

fn print_text(report: &BatchReport) {
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Validated { summary } => {
                let c = &summary.counts;
                println!(
                    "{} [{}]: valid {}, error {}, blank {}, missing {}, recommended but missing {}, unknown {}, warnings {} | {}",
                    file.file,
                    summary.entity_name,
                    c.valid,
                    c.error,
                    c.blank,
                    c.missing,
                    c.recommended_but_missing,
                    c.unknown,
                    c.warning,
                    summary.completion.display_string()
                );
            }
            FileOutcome::Rejected { message } => println!("{}", message),
        }
    }
}
