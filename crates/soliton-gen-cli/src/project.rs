//! The project a command operates on.
//!
//! Resolves the start directory from `-C`, the `project.path` config key or
//! the current directory, runs layout discovery on the real filesystem and
//! hands out core services sharing one [`Filesystem`] adapter.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use soliton_gen_adapters::{LocalFilesystem, ProcessMigrationRunner};
use soliton_gen_core::prelude::*;

use crate::cli::GlobalArgs;
use crate::config::AppConfig;
use crate::error::{CliError, CliResult, IntoCli};

/// A resolved project on disk.
pub struct Project {
    filesystem: Arc<dyn Filesystem>,
    layout: ProjectLayout,
}

impl Project {
    /// Locate the project or fail with [`CliError::ProjectNotFound`].
    pub fn open(global: &GlobalArgs, config: &AppConfig) -> CliResult<Self> {
        let start = start_dir(global, config)?;
        let project = Self::discover(&start);
        if !project.layout.found {
            return Err(CliError::ProjectNotFound {
                start,
                reason: project.layout.reason(),
            });
        }
        Ok(project)
    }

    /// Run layout discovery without failing when nothing is found.
    pub fn discover(start: &Path) -> Self {
        let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
        let layout = LayoutResolver::new(filesystem.clone()).resolve(start);
        debug!(found = layout.found, start = %start.display(), "layout discovery");
        Self { filesystem, layout }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Roots of a found layout.
    pub fn roots(&self) -> CliResult<&LayoutRoots> {
        self.layout.roots().ok_or_else(|| CliError::ProjectNotFound {
            start: PathBuf::from("."),
            reason: self.layout.reason(),
        })
    }

    pub fn planner(&self) -> GenerationPlanner {
        GenerationPlanner::new(self.filesystem.clone())
    }

    pub fn registry(&self) -> ArtifactRegistry {
        ArtifactRegistry::new(self.filesystem.clone())
    }

    pub fn classifier(&self) -> ServiceClassifier {
        ServiceClassifier::new(self.filesystem.clone())
    }

    pub fn executor(&self) -> MutationExecutor {
        MutationExecutor::new(self.filesystem.clone())
    }

    pub fn migrations(&self) -> MigrationService {
        MigrationService::new(
            Arc::new(ProcessMigrationRunner::new()),
            self.filesystem.clone(),
        )
    }

    /// Current content of a project-relative file, if readable.
    pub fn read_relative(&self, relative: &str) -> Option<String> {
        let roots = self.layout.roots()?;
        self.filesystem
            .read_to_string(&roots.module_dir.join(relative))
            .ok()
    }
}

/// Absolute directory to start the project search from.
pub fn start_dir(global: &GlobalArgs, config: &AppConfig) -> CliResult<PathBuf> {
    let start = global
        .project
        .clone()
        .or_else(|| config.project.path.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    absolute(&start)
}

/// `path` made absolute against the current directory.
pub fn absolute(path: &Path) -> CliResult<PathBuf> {
    std::path::absolute(path)
        .with_cli_context(|| format!("Cannot resolve path '{}'", path.display()))
}
