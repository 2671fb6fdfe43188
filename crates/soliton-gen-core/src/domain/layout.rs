//! Target project layout.
//!
//! ```text
//! <module root>/
//! ├── go.mod                               module_path
//! ├── cmd/main.go                          wiring markers
//! └── internal/                            internal_dir
//!     ├── domain/                          domain_dir
//!     ├── application/                     app_dir
//!     ├── infrastructure/persistence/      infra_dir
//!     └── interfaces/http/                 interfaces_dir
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

pub const MODULE_FILE: &str = "go.mod";
pub const INTERNAL_DIR: &str = "internal";
pub const DOMAIN_DIR: &str = "internal/domain";
pub const APP_DIR: &str = "internal/application";
pub const INFRA_DIR: &str = "internal/infrastructure/persistence";
pub const INTERFACES_DIR: &str = "internal/interfaces/http";
pub const MAIN_FILE: &str = "cmd/main.go";
/// Directory holding cross-domain services under the application root.
pub const SERVICES_DIR: &str = "services";
/// Fx module file of every application package.
pub const APP_MODULE_FILE: &str = "module.go";

/// Resolved roots of a project. All present or none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutRoots {
    pub module_path: String,
    pub module_dir: PathBuf,
    pub internal_dir: PathBuf,
    pub domain_dir: PathBuf,
    pub app_dir: PathBuf,
    pub infra_dir: PathBuf,
    pub interfaces_dir: PathBuf,
}

impl LayoutRoots {
    pub fn new(module_path: impl Into<String>, module_dir: impl Into<PathBuf>) -> Self {
        let module_dir = module_dir.into();
        Self {
            module_path: module_path.into(),
            internal_dir: module_dir.join(INTERNAL_DIR),
            domain_dir: module_dir.join(DOMAIN_DIR),
            app_dir: module_dir.join(APP_DIR),
            infra_dir: module_dir.join(INFRA_DIR),
            interfaces_dir: module_dir.join(INTERFACES_DIR),
            module_dir,
        }
    }

    pub fn main_file(&self) -> PathBuf {
        self.module_dir.join(MAIN_FILE)
    }

    pub fn domain_package_dir(&self, package: &str) -> PathBuf {
        self.domain_dir.join(package)
    }

    pub fn app_package_dir(&self, package: &str) -> PathBuf {
        self.app_dir.join(package)
    }

    pub fn services_dir(&self) -> PathBuf {
        self.app_dir.join(SERVICES_DIR)
    }

    /// Path relative to the module root, `/`-separated, for reporting.
    pub fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.module_dir).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Outcome of layout discovery. Absence is a normal state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLayout {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub roots: Option<LayoutRoots>,
}

impl ProjectLayout {
    pub fn found(roots: LayoutRoots) -> Self {
        Self {
            found: true,
            message: None,
            roots: Some(roots),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            found: false,
            message: Some(message.into()),
            roots: None,
        }
    }

    pub fn roots(&self) -> Option<&LayoutRoots> {
        self.roots.as_ref()
    }

    /// Reason the layout is unusable.
    pub fn reason(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "project layout not found".to_string())
    }
}
