//! sheetcmp CLI - batch spreadsheet comparison tool

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetcmp::prelude::*;
use sheetcmp::{render_report, write_pair_reports};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const TABLE_RULE_WIDTH: usize = 120;

#[derive(Parser)]
#[command(name = "sheetcmp")]
#[command(
    author,
    version,
    about = "Compare pairs of spreadsheet files with staged early stopping"
)]
struct Cli {
    /// More log output on stderr (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every target folder under a root folder
    Compare {
        /// Root folder holding one sub-folder per target
        folder: PathBuf,

        #[command(flatten)]
        options: CompareArgs,

        /// Worker threads (default: available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Difference file format
        #[arg(short, long)]
        format: Option<ReportFormat>,
    },

    /// Compare two files directly
    Pair {
        /// V1 file
        v1: PathBuf,

        /// V2 file
        v2: PathBuf,

        #[command(flatten)]
        options: CompareArgs,

        /// Folder to write report.txt and the difference files into
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Difference file format
        #[arg(short, long)]
        format: Option<ReportFormat>,
    },

    /// List the sheets of a file with their shape and column types
    Sheets {
        /// Input spreadsheet file (xlsx, xlsm, csv)
        input: PathBuf,
    },
}

/// Comparison settings shared by `compare` and `pair`
#[derive(Args)]
struct CompareArgs {
    /// Skip rows with matching fingerprints before comparing cells
    #[arg(long)]
    hash: bool,

    /// Abort a sheet once this fraction of its data differs
    #[arg(long, value_name = "RATIO")]
    abort_ratio: Option<f64>,

    /// What the abort ratio counts (rows or cells)
    #[arg(long)]
    basis: Option<MismatchBasis>,

    /// Row limit of one difference sheet, header included
    #[arg(long, value_name = "ROWS")]
    max_rows_per_segment: Option<usize>,

    /// TOML settings file, overridden by command-line options
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl CompareArgs {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("Failed to load settings from '{}'", path.display()))?,
            None => RunConfig::default(),
        };

        if self.hash {
            config.compare.hash_mode = true;
        }
        if let Some(ratio) = self.abort_ratio {
            config.compare.mismatch_abort_ratio = ratio;
        }
        if let Some(basis) = self.basis {
            config.compare.mismatch_basis = basis;
        }
        if let Some(rows) = self.max_rows_per_segment {
            config.compare.max_rows_per_segment = rows;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Compare {
            folder,
            options,
            jobs,
            format,
        } => {
            let mut config = options.run_config()?;
            if jobs.is_some() {
                config.jobs = jobs;
            }
            if let Some(format) = format {
                config.report_format = format;
            }
            compare_folder(&folder, config)
        }
        Commands::Pair {
            v1,
            v2,
            options,
            output,
            format,
        } => {
            let mut config = options.run_config()?;
            if let Some(format) = format {
                config.report_format = format;
            }
            compare_files(&v1, &v2, output.as_deref(), &config)
        }
        Commands::Sheets { input } => list_sheets(&input),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn compare_folder(folder: &Path, config: RunConfig) -> Result<()> {
    if !folder.is_dir() {
        bail!("'{}' is not a folder", folder.display());
    }
    let runner = BatchRunner::new(config).context("Invalid settings")?;
    tracing::info!(folder = %folder.display(), jobs = runner.config().worker_count(), "comparing folder");

    print_table_header();
    let sink = |row: ProgressRow| print_row(&row);
    let reports = runner
        .run(folder, &sink)
        .with_context(|| format!("Failed to compare '{}'", folder.display()))?;
    println!("{}", "=".repeat(TABLE_RULE_WIDTH));

    let compared = reports.iter().filter(|r| r.summary().is_some()).count();
    let failed = reports
        .iter()
        .filter(|r| matches!(r.outcome, TargetOutcome::Failed(_)))
        .count();
    println!(
        "{} targets: {} compared, {} failed, {} skipped",
        reports.len(),
        compared,
        failed,
        reports.len() - compared - failed
    );
    Ok(())
}

fn compare_files(v1: &Path, v2: &Path, output: Option<&Path>, config: &RunConfig) -> Result<()> {
    config.validate().context("Invalid settings")?;
    let session = ComparisonSession::new(config.compare).context("Invalid settings")?;

    let mut source_v1 = FileTableSource::open(v1)
        .with_context(|| format!("Failed to open '{}'", v1.display()))?;
    let mut source_v2 = FileTableSource::open(v2)
        .with_context(|| format!("Failed to open '{}'", v2.display()))?;
    let summary = session
        .run(&mut source_v1, &mut source_v2)
        .context("Comparison failed")?;
    tracing::debug!(status = %summary.status(), segments = summary.segments.len(), "pair done");

    match output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create '{}'", dir.display()))?;
            let written = write_pair_reports(dir, &summary, config.report_format)
                .with_context(|| format!("Failed to write reports into '{}'", dir.display()))?;
            print!("{}", render_report(&summary));
            for path in written {
                eprintln!("Wrote '{}'", path.display());
            }
        }
        None => print!("{}", render_report(&summary)),
    }
    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let workbook =
        Workbook::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;

    for (name, table) in workbook.sheets() {
        let dtypes: Vec<&str> = table.dtypes().iter().map(|d| d.as_str()).collect();
        println!("{}\t{}\t[{}]", name, table.shape(), dtypes.join(", "));
    }

    Ok(())
}

fn print_table_header() {
    println!("{}", "=".repeat(TABLE_RULE_WIDTH));
    println!(
        "{:<30} | {:<15} | {:<15} | {:<25} | {}",
        "Target", "Shape V1", "Shape V2", "Status", "Details"
    );
    println!("{}", "=".repeat(TABLE_RULE_WIDTH));
}

fn print_row(row: &ProgressRow) {
    println!(
        "{:<30} | {:<15} | {:<15} | {:<25} | {}",
        row.target, row.shape_v1, row.shape_v2, row.status, row.details
    );
}
