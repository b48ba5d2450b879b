/// Output formatter for reports and rename runs
///
/// This module writes finished summary reports to disk or stdout, and
/// renders rename plans and their outcomes for the console.

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::rename::{ExecutionOutcome, PlanOutcome, RenamePlan};
use crate::core::report::Report;

/// Where a finished report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSink<'a> {
    Stdout,
    File(&'a Path),
}

impl ReportSink<'_> {
    /// Write the report; files are overwritten and parent directories created
    ///
    /// # Errors
    ///
    /// Any I/O failure while creating directories or writing.
    pub fn write(&self, report: &Report) -> Result<()> {
        match self {
            ReportSink::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "{report}").context("Failed to write report to stdout")?;
            }
            ReportSink::File(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
                fs::write(path, report.render())
                    .with_context(|| format!("Failed to write report: {}", path.display()))?;
            }
        }
        Ok(())
    }
}

/// Console notice for a planning outcome that has nothing to rename
pub fn format_plan_notice(outcome: &PlanOutcome) -> Option<&'static str> {
    match outcome {
        PlanOutcome::NoFiles => Some("No files found."),
        PlanOutcome::AlreadyPrefixed => Some("Nothing to rename (files already have the prefix?)."),
        PlanOutcome::Planned(_) => None,
    }
}

/// Plan listing: folder, count, then one `old  ->  new` line per entry
///
/// # Arguments
///
/// * `folder` - The folder being renamed, as resolved
/// * `plan` - Non-empty plan from the planner
///
/// # Returns
///
/// The console text, each line ending in a newline.
pub fn format_plan(folder: &Path, plan: &RenamePlan) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{} {}", "Folder:".bold(), folder.display());
    let heading = format!("Planned renames ({}):", plan.len());
    let _ = writeln!(output, "{}", heading.as_str().bold());
    for entry in plan.entries() {
        let _ = writeln!(
            output,
            "  {}  ->  {}",
            entry.current_name(),
            entry.proposed_name().as_str().green()
        );
    }

    output
}

/// Closing notice for an execution outcome
pub fn format_outcome(outcome: &ExecutionOutcome) -> String {
    let mut output = String::new();

    match outcome {
        ExecutionOutcome::DryRun { collisions } => {
            let _ = writeln!(output, "\n{}", "Dry run: no files were renamed.".yellow());
            if !collisions.is_empty() {
                let _ = writeln!(
                    output,
                    "{}",
                    "Warning: these target filenames already exist:".yellow()
                );
                push_names(&mut output, collisions);
            }
        }
        ExecutionOutcome::Aborted { collisions } => {
            let _ = writeln!(
                output,
                "\n{}",
                "ERROR: These target filenames already exist:".red().bold()
            );
            push_names(&mut output, collisions);
            let _ = writeln!(output, "{}", "Aborting to avoid overwriting.".red());
        }
        ExecutionOutcome::Renamed { .. } => {
            let _ = writeln!(output, "\n{}", "Done.".green().bold());
        }
    }

    output
}

fn push_names(output: &mut String, paths: &[std::path::PathBuf]) {
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let _ = writeln!(output, "  {name}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rename::RenamePlanner;
    use crate::core::table::{Column, Table};
    use std::path::PathBuf;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_plan_lists_entries() {
        plain();
        let planner = RenamePlanner::new("x_").expect("valid prefix");
        let files = vec![PathBuf::from("/d/a.txt"), PathBuf::from("/d/b.txt")];
        let PlanOutcome::Planned(plan) = planner.plan(&files) else {
            panic!("expected a plan");
        };

        let text = format_plan(Path::new("/d"), &plan);
        assert!(text.contains("Folder: /d"));
        assert!(text.contains("Planned renames (2):"));
        assert!(text.contains("  a.txt  ->  x_a.txt"));
        assert!(text.contains("  b.txt  ->  x_b.txt"));
    }

    #[test]
    fn test_format_outcome_lists_collisions() {
        plain();
        let text = format_outcome(&ExecutionOutcome::Aborted {
            collisions: vec![PathBuf::from("/d/x_a"), PathBuf::from("/d/x_c")],
        });
        assert!(text.contains("ERROR: These target filenames already exist:"));
        assert!(text.contains("  x_a\n"));
        assert!(text.contains("  x_c\n"));
        assert!(text.contains("Aborting to avoid overwriting."));
    }

    #[test]
    fn test_plan_notices_are_distinct() {
        assert_ne!(
            format_plan_notice(&PlanOutcome::NoFiles),
            format_plan_notice(&PlanOutcome::AlreadyPrefixed)
        );
        assert_eq!(
            format_plan_notice(&PlanOutcome::Planned(RenamePlan::default())),
            None
        );
    }

    #[test]
    fn test_file_sink_creates_parents_and_overwrites() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let out = temp_dir.path().join("nested").join("dir").join("report.txt");
        std::fs::create_dir_all(out.parent().unwrap()).expect("Failed to create dir");
        std::fs::write(&out, "stale content that is longer than the report").expect("write");

        let table = Table::new(vec![Column::numeric("v", vec![Some(1.0)])]).expect("table");
        let report = crate::core::report::build_report(&table, 5).expect("Failed to build report");
        ReportSink::File(&out).write(&report).expect("Failed to write report");

        let written = std::fs::read_to_string(&out).expect("Failed to read report");
        assert_eq!(written, report.render());

        let fresh = temp_dir.path().join("a").join("b").join("r.txt");
        ReportSink::File(&fresh).write(&report).expect("Failed to write report");
        assert!(fresh.exists());
    }
}
