//! Plans and results of a generation request.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-file outcome of planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Created,
    Skipped,
    Overwritten,
}

impl FileStatus {
    /// Status for a destination given whether it exists and the force flag.
    pub fn resolve(exists: bool, force: bool) -> Self {
        match (exists, force) {
            (false, _) => Self::Created,
            (true, true) => Self::Overwritten,
            (true, false) => Self::Skipped,
        }
    }

    pub fn writes(self) -> bool {
        !matches!(self, Self::Skipped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Skipped => "skipped",
            Self::Overwritten => "overwritten",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Compute everything, write nothing.
    Preview,
    Apply,
}

impl GenerationMode {
    pub fn is_preview(self) -> bool {
        matches!(self, Self::Preview)
    }
}

/// One file of a computed plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Absolute destination.
    pub path: PathBuf,
    /// Destination relative to the project root, `/`-separated.
    pub relative: String,
    pub status: FileStatus,
    pub content: String,
}

/// Fully computed set of file operations. Nothing has been written yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Directories to create even when no planned file lands in them.
    pub directories: Vec<PathBuf>,
    pub files: Vec<PlannedFile>,
    /// Informational notes gathered while planning.
    pub notes: Vec<String>,
}

impl Plan {
    pub fn push(&mut self, file: PlannedFile) {
        self.files.push(file);
    }

    pub fn directory(&mut self, path: PathBuf) {
        self.directories.push(path);
    }

    /// Whether the plan already targets `path`.
    pub fn contains(&self, path: &std::path::Path) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn writes(&self) -> impl Iterator<Item = &PlannedFile> {
        self.files.iter().filter(|f| f.status.writes())
    }
}

/// A file as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Result of any generation call. Failures are data, not `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    pub files: Vec<GeneratedFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GenerationResult {
    /// Build the caller-facing result of a plan. `errors` are per-file
    /// write failures; content is kept only in preview mode.
    pub fn from_plan(plan: Plan, mode: GenerationMode, errors: Vec<String>) -> Self {
        let files = plan
            .files
            .into_iter()
            .map(|f| GeneratedFile {
                path: f.relative,
                status: f.status,
                content: mode.is_preview().then_some(f.content),
            })
            .collect::<Vec<_>>();

        let mut result = Self {
            success: errors.is_empty(),
            files,
            errors,
            message: None,
        };

        let mut message = result.summary();
        if mode.is_preview() {
            message = format!("Preview: {message}");
        }
        if !plan.notes.is_empty() {
            message = format!("{message}. {}", plan.notes.join(". "));
        }
        result.message = Some(message);
        result
    }

    /// A request that could not be planned at all.
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            files: Vec::new(),
            message: Some(error.clone()),
            errors: vec![error],
        }
    }

    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} created, {} overwritten, {} skipped",
            self.count(FileStatus::Created),
            self.count(FileStatus::Overwritten),
            self.count(FileStatus::Skipped)
        )
    }
}

/// Plain `{success, message}` answer of delete and rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Project-relative paths touched by the mutation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl MutationOutcome {
    pub fn ok(message: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            files,
        }
    }
}
