/// Batch Renamer - add a prefix to every file in a folder
///
/// Shows the planned renames first; nothing is renamed on a dry run or
/// when any target name already exists.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgAction, Parser};
use colored::Colorize;
use log::LevelFilter;

use data_toolkit::app::{self, RenameOptions};
use data_toolkit::utils::file_utils::resolve_user_path;
use data_toolkit::utils::logging::setup_logging;
use data_toolkit::utils::output_formatter;
use data_toolkit::PlanOutcome;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "rename_files",
    version,
    about = "Batch rename files in a folder by adding a prefix."
)]
struct Args {
    /// Folder containing files to rename
    #[arg(long = "path")]
    path: String,

    /// Prefix to add to each filename (e.g., basel_)
    #[arg(long = "prefix")]
    prefix: String,

    /// Show changes without renaming
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Include dotfiles like .DS_Store
    #[arg(long = "include-hidden", action = ArgAction::SetTrue)]
    include_hidden: bool,

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

    let options = RenameOptions {
        folder: resolve_user_path(&args.path)?,
        prefix: args.prefix.clone(),
        dry_run: args.dry_run,
        include_hidden: args.include_hidden,
    };

    let plan = match app::plan_rename(&options)? {
        PlanOutcome::Planned(plan) => plan,
        other => {
            if let Some(notice) = output_formatter::format_plan_notice(&other) {
                println!("{notice}");
            }
            return Ok(());
        }
    };

    print!("{}", output_formatter::format_plan(&options.folder, &plan));

    let outcome = app::apply_rename(&plan, &options)?;
    print!("{}", output_formatter::format_outcome(&outcome));

    Ok(())
}
