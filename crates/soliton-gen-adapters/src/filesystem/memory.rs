//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use soliton_gen_core::application::ApplicationError;
use soliton_gen_core::application::ports::Filesystem;
use soliton_gen_core::error::SolitonResult;

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hand one clone to a service and
/// inspect the other. Writes and renames can be made to fail for chosen
/// paths to exercise rollback.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    failing_writes: HashSet<PathBuf>,
    failing_renames: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_string());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let mut files: Vec<_> = inner.files.keys().cloned().collect();
        files.sort();
        files
    }

    /// Make every later write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing_writes.insert(path.into());
        }
    }

    /// Make every later rename onto `path` fail.
    pub fn fail_renames_to(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing_renames.insert(path.into());
        }
    }

    fn read(&self) -> SolitonResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }

    fn write(&self) -> SolitonResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.directories.contains(parent),
            _ => true,
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> SolitonResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(ApplicationError::filesystem(path, "A file exists at this path").into());
        }
        inner.add_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> SolitonResult<()> {
        let mut inner = self.write()?;

        if inner.failing_writes.contains(path) {
            return Err(ApplicationError::filesystem(path, "Injected write failure").into());
        }
        if !inner.parent_exists(path) {
            return Err(
                ApplicationError::filesystem(path, "Parent directory does not exist").into(),
            );
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> SolitonResult<String> {
        let inner = self.read()?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::filesystem(path, "No such file").into())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }

    fn remove_file(&self, path: &Path) -> SolitonResult<()> {
        let mut inner = self.write()?;
        match inner.files.remove(path) {
            Some(_) => Ok(()),
            None => Err(ApplicationError::filesystem(path, "No such file").into()),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> SolitonResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::filesystem(path, "No such directory").into());
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));

        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> SolitonResult<()> {
        let mut inner = self.write()?;

        if inner.failing_renames.contains(to) {
            return Err(ApplicationError::filesystem(to, "Injected rename failure").into());
        }
        if !inner.parent_exists(to) {
            return Err(ApplicationError::filesystem(to, "Parent directory does not exist").into());
        }

        if let Some(content) = inner.files.remove(from) {
            inner.files.insert(to.to_path_buf(), content);
            return Ok(());
        }

        if inner.directories.contains(from) {
            let moved_dirs: Vec<_> = inner
                .directories
                .iter()
                .filter(|p| p.starts_with(from))
                .cloned()
                .collect();
            for dir in moved_dirs {
                inner.directories.remove(&dir);
                if let Ok(rest) = dir.strip_prefix(from) {
                    inner.directories.insert(to.join(rest));
                }
            }
            let moved_files: Vec<_> = inner
                .files
                .keys()
                .filter(|p| p.starts_with(from))
                .cloned()
                .collect();
            for file in moved_files {
                if let (Some(content), Ok(rest)) =
                    (inner.files.remove(&file), file.strip_prefix(from))
                {
                    inner.files.insert(to.join(rest), content);
                }
            }
            return Ok(());
        }

        Err(ApplicationError::filesystem(from, "No such file or directory").into())
    }

    fn list_dir(&self, path: &Path) -> SolitonResult<Vec<PathBuf>> {
        let inner = self.read()?;
        let children: BTreeSet<PathBuf> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        Ok(children.into_iter().collect())
    }

    fn walk_files(&self, path: &Path) -> SolitonResult<Vec<PathBuf>> {
        let inner = self.read()?;
        let mut files: Vec<_> = inner
            .files
            .keys()
            .filter(|p| p.starts_with(path) && p.as_path() != path)
            .cloned()
            .collect();
        files.sort();
        Ok(files)
    }
}
