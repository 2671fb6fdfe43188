//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `soliton-gen-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{MigrationRequest, MigrationResult};
use crate::error::SolitonResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `soliton_gen_adapters::filesystem::LocalFilesystem` (production)
/// - `soliton_gen_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Paths are absolute; services join them from resolved layout roots
/// - `rename` must replace the destination atomically; the mutation
///   executor builds its all-or-nothing commit on it
/// - Listing is shallow, `walk_files` is recursive
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SolitonResult<()>;

    /// Write content to a file, replacing it when present.
    fn write_file(&self, path: &Path, content: &str) -> SolitonResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> SolitonResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> SolitonResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> SolitonResult<()>;

    /// Move `from` over `to` atomically.
    fn rename(&self, from: &Path, to: &Path) -> SolitonResult<()>;

    /// Direct children of a directory, sorted. Empty when it does not exist.
    fn list_dir(&self, path: &Path) -> SolitonResult<Vec<PathBuf>>;

    /// Every file below a directory, sorted. Empty when it does not exist.
    fn walk_files(&self, path: &Path) -> SolitonResult<Vec<PathBuf>>;
}

/// Port for the external build/migration tool.
///
/// Implemented by:
/// - `soliton_gen_adapters::migration::ProcessMigrationRunner` (`go run`)
#[cfg_attr(test, mockall::automock)]
pub trait MigrationRunner: Send + Sync {
    /// Run the migration. `Err` only when the tool could not be started;
    /// a failing run is reported in the result.
    fn run(&self, request: &MigrationRequest) -> SolitonResult<MigrationResult>;

    /// Refresh module dependencies only. `auto_tidy` is ignored.
    fn tidy(&self, request: &MigrationRequest) -> SolitonResult<MigrationResult>;
}
