/// Data Toolkit - quick CSV summaries and safe batch file prefixing
///
/// This library backs two small command-line tools: `csv_summary`, which
/// turns a CSV file into a plain-text overview, and `rename_files`, which
/// adds a prefix to every file in a directory after checking for collisions.

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

// Re-export the main types for convenience
pub use crate::core::rename::{ExecutionOutcome, PlanOutcome, RenameExecutor, RenamePlanner};
pub use crate::core::report::{build_report, Report, ReportBuilder};
pub use crate::core::table::{Table, TableLoader};
pub use crate::error::{Result, ToolkitError};

/// Load a CSV file and build its summary report
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
/// * `top_n` - Number of categories listed per text column
///
/// # Returns
///
/// The summary report, loaded with the default delimiter and NA tokens.
///
/// # Errors
///
/// `FileNotFound` if `file_path` is not an existing file, or any CSV error.
pub fn summarize_file<P: AsRef<std::path::Path>>(file_path: P, top_n: usize) -> Result<Report> {
    let table = TableLoader::new().load_path(file_path.as_ref())?;
    build_report(&table, top_n)
}

/// Command-line application functionality
pub mod app {
    use std::path::{Path, PathBuf};

    use log::info;

    use crate::config::SummarySettings;
    use crate::core::rename::{
        ExecutionOutcome, PlanOutcome, RenameExecutor, RenamePlan, RenamePlanner,
    };
    use crate::core::report::{Report, ReportBuilder};
    use crate::core::table::TableLoader;
    use crate::error::{Result, ToolkitError};
    use crate::utils::file_utils::DirectoryLister;

    /// Load `file` with the given settings and build its report
    ///
    /// # Arguments
    ///
    /// * `file` - Resolved path of the CSV file
    /// * `settings` - Delimiter, extra NA tokens and top-N after precedence
    ///
    /// # Returns
    ///
    /// The report, ready for a `ReportSink`.
    ///
    /// # Errors
    ///
    /// `FileNotFound` when `file` is missing, otherwise load errors.
    pub fn run_summary(file: &Path, settings: &SummarySettings) -> Result<Report> {
        if !file.is_file() {
            return Err(ToolkitError::FileNotFound(file.to_path_buf()));
        }

        let loader = TableLoader::new()
            .with_delimiter(settings.delimiter)
            .with_na_values(settings.na_values.iter().cloned());
        let table = loader.load_path(file)?;
        info!(
            "Summarizing {} ({} rows, {} columns)",
            file.display(),
            table.row_count(),
            table.column_count()
        );

        ReportBuilder::new(settings.top_n).build(&table)
    }

    /// Options of one rename run
    #[derive(Debug, Clone)]
    pub struct RenameOptions {
        pub folder: PathBuf,
        pub prefix: String,
        pub dry_run: bool,
        pub include_hidden: bool,
    }

    /// List the folder and plan the renames, without touching anything
    ///
    /// The folder is checked before the prefix, so a missing folder is
    /// always reported as such.
    ///
    /// # Errors
    ///
    /// `NotADirectory` or `InvalidPrefix`.
    pub fn plan_rename(options: &RenameOptions) -> Result<PlanOutcome> {
        let files = DirectoryLister::new(options.include_hidden).list(&options.folder)?;
        let planner = RenamePlanner::new(options.prefix.clone())?;
        Ok(planner.plan(&files))
    }

    /// Apply a plan produced by `plan_rename`, honouring the dry-run flag
    ///
    /// Nothing is renamed on a dry run or when any target already exists.
    ///
    /// # Errors
    ///
    /// The I/O error of a failed rename.
    pub fn apply_rename(plan: &RenamePlan, options: &RenameOptions) -> Result<ExecutionOutcome> {
        RenameExecutor::new(options.dry_run).execute(plan)
    }
}
