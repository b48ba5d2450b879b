/// Batch prefix renaming: plan first, then validate and apply
///
/// Planning never touches the filesystem. Execution checks every target for
/// an existing entry before the first rename and aborts the whole batch on
/// any collision.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Result, ToolkitError};

/// One proposed rename inside a single directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlanEntry {
    pub current: PathBuf,
    pub proposed: PathBuf,
}

impl RenamePlanEntry {
    pub fn current_name(&self) -> String {
        file_name_lossy(&self.current)
    }

    pub fn proposed_name(&self) -> String {
        file_name_lossy(&self.proposed)
    }
}

/// Ordered list of renames, in directory-listing order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenamePlan {
    entries: Vec<RenamePlanEntry>,
}

impl RenamePlan {
    pub fn entries(&self) -> &[RenamePlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The directory listing as it would look once the plan is applied
    pub fn simulated_listing(&self, untouched: &[PathBuf]) -> Vec<PathBuf> {
        let renamed: Vec<&Path> = self.entries.iter().map(|e| e.current.as_path()).collect();
        let mut listing: Vec<PathBuf> = untouched
            .iter()
            .filter(|p| !renamed.contains(&p.as_path()))
            .cloned()
            .chain(self.entries.iter().map(|e| e.proposed.clone()))
            .collect();
        listing.sort_by_key(|p| p.file_name().map(OsString::from));
        listing
    }
}

/// Why planning produced (or did not produce) work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The listing was empty
    NoFiles,
    /// Files exist but every one already carries the prefix
    AlreadyPrefixed,
    /// At least one file needs renaming
    Planned(RenamePlan),
}

/// Computes prefix renames for a sorted file listing
#[derive(Debug, Clone)]
pub struct RenamePlanner {
    prefix: String,
}

impl RenamePlanner {
    /// # Errors
    ///
    /// `InvalidPrefix` when the prefix contains a path separator. An empty
    /// prefix is accepted; every name already starts with it.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.chars().any(std::path::is_separator) {
            return Err(ToolkitError::InvalidPrefix(
                prefix,
                "prefix must not contain a path separator",
            ));
        }
        Ok(Self { prefix })
    }

    pub fn needs_prefix(&self, path: &Path) -> bool {
        !file_name_lossy(path).starts_with(&self.prefix)
    }

    /// Plan renames for `files`, keeping their order
    pub fn plan(&self, files: &[PathBuf]) -> PlanOutcome {
        if files.is_empty() {
            return PlanOutcome::NoFiles;
        }

        let entries: Vec<RenamePlanEntry> = files
            .iter()
            .filter(|path| {
                let keep = self.needs_prefix(path);
                if !keep {
                    debug!("Skipping already prefixed {}", path.display());
                }
                keep
            })
            .filter_map(|path| {
                let name = path.file_name()?;
                let mut new_name = OsString::from(&self.prefix);
                new_name.push(name);
                Some(RenamePlanEntry {
                    current: path.clone(),
                    proposed: path.with_file_name(new_name),
                })
            })
            .collect();

        if entries.is_empty() {
            PlanOutcome::AlreadyPrefixed
        } else {
            info!("Planned {} renames with prefix {:?}", entries.len(), self.prefix);
            PlanOutcome::Planned(RenamePlan { entries })
        }
    }
}

/// What happened when a plan was handed to the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Nothing was renamed; `collisions` lists targets that already exist
    DryRun { collisions: Vec<PathBuf> },
    /// Targets already exist, so nothing was renamed
    Aborted { collisions: Vec<PathBuf> },
    /// Every entry was renamed
    Renamed { count: usize },
}

/// Validates and applies a rename plan
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameExecutor {
    dry_run: bool,
}

impl RenameExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Targets that already exist on disk, in plan order
    pub fn find_collisions(plan: &RenamePlan) -> Vec<PathBuf> {
        plan.entries()
            .iter()
            .filter(|e| e.proposed.symlink_metadata().is_ok())
            .map(|e| e.proposed.clone())
            .collect()
    }

    /// Apply `plan` unless this is a dry run or a target already exists
    ///
    /// # Errors
    ///
    /// Propagates the I/O error of the first rename that fails; renames
    /// before it stay applied.
    pub fn execute(&self, plan: &RenamePlan) -> Result<ExecutionOutcome> {
        let collisions = Self::find_collisions(plan);

        if self.dry_run {
            if !collisions.is_empty() {
                warn!("Dry run: {} targets already exist", collisions.len());
            }
            return Ok(ExecutionOutcome::DryRun { collisions });
        }

        if !collisions.is_empty() {
            warn!("Aborting batch: {} targets already exist", collisions.len());
            return Ok(ExecutionOutcome::Aborted { collisions });
        }

        for entry in plan.entries() {
            debug!(
                "Renaming {} -> {}",
                entry.current.display(),
                entry.proposed.display()
            );
            std::fs::rename(&entry.current, &entry.proposed)?;
        }

        info!("Renamed {} files", plan.len());
        Ok(ExecutionOutcome::Renamed { count: plan.len() })
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
