//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use soliton_gen_core::application::ApplicationError;
use soliton_gen_core::application::ports::Filesystem;
use soliton_gen_core::error::{SolitonError, SolitonResult};
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> SolitonResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> SolitonResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> SolitonResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove_file(&self, path: &Path) -> SolitonResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> SolitonResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn rename(&self, from: &Path, to: &Path) -> SolitonResult<()> {
        // Same-directory renames are atomic on every supported platform.
        std::fs::rename(from, to).map_err(|e| {
            map_io_error(to, e, &format!("move {} into place", from.display()))
        })
    }

    fn list_dir(&self, path: &Path) -> SolitonResult<Vec<PathBuf>> {
        if !path.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = std::fs::read_dir(path)
            .map_err(|e| map_io_error(path, e, "list directory"))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| map_io_error(path, e, "list directory"))?;
        entries.sort();
        Ok(entries)
    }

    fn walk_files(&self, path: &Path) -> SolitonResult<Vec<PathBuf>> {
        if !path.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let at = e.path().unwrap_or(path).to_path_buf();
                map_io_error(&at, io::Error::other(e.to_string()), "walk directory")
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> SolitonError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn listing_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        assert!(fs.list_dir(&dir.path().join("nope")).unwrap().is_empty());
        assert!(fs.walk_files(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn walk_is_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        fs.create_dir_all(&dir.path().join("b/c")).unwrap();
        fs.write_file(&dir.path().join("b/c/z.go"), "z").unwrap();
        fs.write_file(&dir.path().join("a.go"), "a").unwrap();

        let files = fs.walk_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.go"), dir.path().join("b/c/z.go")]);

        let children = fs.list_dir(dir.path()).unwrap();
        assert_eq!(children, vec![dir.path().join("a.go"), dir.path().join("b")]);
    }

    #[test]
    fn rename_replaces_destination() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let from = dir.path().join(".x.go.tmp");
        let to = dir.path().join("x.go");
        fs.write_file(&to, "old").unwrap();
        fs.write_file(&from, "new").unwrap();

        fs.rename(&from, &to).unwrap();
        assert_eq!(fs.read_to_string(&to).unwrap(), "new");
        assert!(!fs.exists(&from));
    }

    #[test]
    fn errors_name_the_operation() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_to_string(&dir.path().join("missing.go"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
