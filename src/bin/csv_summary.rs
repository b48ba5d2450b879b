/// CSV Quick Summary - rows, columns, missing values, numeric stats and
/// top categories for a CSV file
///
/// The entry point parses command-line arguments, loads the table and hands
/// the finished report to stdout or to a file.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{info, LevelFilter};

use data_toolkit::app;
use data_toolkit::config::{SummaryConfig, SummarySettings};
use data_toolkit::utils::file_utils::resolve_user_path;
use data_toolkit::utils::logging::setup_logging;
use data_toolkit::utils::output_formatter::ReportSink;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "csv_summary",
    version,
    about = "Generate a quick summary report for a CSV file."
)]
struct Args {
    /// Path to CSV file
    #[arg(long = "file")]
    file: String,

    /// Optional output path for the report (txt). If omitted, prints to console.
    #[arg(long = "out")]
    out: Option<String>,

    /// Top N categories for non-numeric columns (default: 5)
    #[arg(long = "top-n", value_parser = clap::value_parser!(u64).range(1..))]
    top_n: Option<u64>,

    /// Field delimiter (default: ',')
    #[arg(long = "delimiter")]
    delimiter: Option<char>,

    /// Path to JSON configuration file
    #[arg(long = "config")]
    config: Option<String>,

    /// Set logging level (default: WARN)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,

    /// Log file path (default: stderr)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    setup_logging(args.log_level, args.log_file.as_deref())?;

    let config = match &args.config {
        Some(path) => SummaryConfig::load(&resolve_user_path(path)?)?,
        None => SummaryConfig::default(),
    };
    let top_n = args
        .top_n
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX));
    let settings = SummarySettings::resolve(top_n, args.delimiter, &config)
        .map_err(anyhow::Error::msg)
        .context("Invalid summary settings")?;

    let file = resolve_user_path(&args.file)?;
    let report = app::run_summary(&file, &settings)?;

    match &args.out {
        Some(out) => {
            let out = resolve_user_path(out)?;
            ReportSink::File(&out).write(&report)?;
            info!("Report written to {}", out.display());
            println!("Saved report to: {}", out.display());
        }
        None => ReportSink::Stdout.write(&report)?,
    }

    Ok(())
}
