/// File handling utilities
///
/// This module resolves user-supplied paths and lists the files of a
/// directory for the renamer.

use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Result, ToolkitError};

/// Expand a leading `~` and make the path absolute.
///
/// Existing paths are canonicalized; paths that do not exist yet (such as a
/// report destination) are joined onto the current directory.
///
/// # Errors
///
/// Fails only when the current directory cannot be determined.
pub fn resolve_user_path(raw: &str) -> Result<PathBuf> {
    let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());

    if let Ok(canonical) = expanded.canonicalize() {
        return Ok(canonical);
    }

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(std::env::current_dir()?.join(expanded))
    }
}

/// Dotfiles such as `.DS_Store`
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Lists the regular files directly inside a directory, sorted by name
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryLister {
    include_hidden: bool,
}

impl DirectoryLister {
    pub fn new(include_hidden: bool) -> Self {
        Self { include_hidden }
    }

    /// # Errors
    ///
    /// `NotADirectory` when `dir` is missing or not a directory, or the
    /// underlying I/O error if the listing fails.
    pub fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(ToolkitError::NotADirectory(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();

            // is_file follows symlinks, so links to files are listed too
            if !path.is_file() {
                continue;
            }
            if !self.include_hidden && is_hidden(path) {
                debug!("Skipping hidden file {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        debug!("Listed {} files in {}", files.len(), dir.display());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_lists_sorted_files_without_hidden() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let dir = temp_dir.path();
        for name in ["b.txt", ".hidden", "a.txt"] {
            std::fs::write(dir.join(name), "").expect("Failed to write file");
        }
        std::fs::create_dir(dir.join("sub")).expect("Failed to create dir");
        std::fs::write(dir.join("sub").join("nested.txt"), "").expect("Failed to write file");

        let files = DirectoryLister::new(false).list(dir).expect("Listing failed");
        assert_eq!(names(&files), vec!["a.txt", "b.txt"]);

        let files = DirectoryLister::new(true).list(dir).expect("Listing failed");
        assert_eq!(names(&files), vec![".hidden", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope");
        let err = DirectoryLister::default().list(&missing).unwrap_err();
        assert!(matches!(err, ToolkitError::NotADirectory(_)));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file = temp_dir.path().join("f");
        std::fs::write(&file, "").expect("Failed to write file");
        assert!(DirectoryLister::default().list(&file).is_err());
    }

    #[test]
    fn test_resolve_user_path_is_absolute() {
        let resolved = resolve_user_path("some/relative/report.txt").expect("resolve failed");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/relative/report.txt"));
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new("/x/.DS_Store")));
        assert!(!is_hidden(Path::new("/x/visible")));
    }
}
