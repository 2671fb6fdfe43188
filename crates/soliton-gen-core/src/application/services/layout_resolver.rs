//! Layout Resolver - discovers the target project's roots.
//!
//! Search order from a start directory `d`:
//!
//! ```text
//! d, d/application, parent(d), parent(d)/application, ... , /
//! ```
//!
//! The first directory holding both `go.mod` and `internal/` wins. Nothing
//! is cached: every request re-reads the disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ports::Filesystem;
use crate::domain::layout::{INTERNAL_DIR, LayoutRoots, MODULE_FILE, ProjectLayout};
use crate::domain::source;

/// Name of the nested module directory checked at each level.
const NESTED_MODULE_DIR: &str = "application";

pub struct LayoutResolver {
    filesystem: Arc<dyn Filesystem>,
}

impl LayoutResolver {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Resolve the layout around `start`. Absence is reported, never raised.
    #[instrument(skip_all, fields(start = %start.display()))]
    pub fn resolve(&self, start: &Path) -> ProjectLayout {
        let Some(module_dir) = self.find_module_dir(start) else {
            debug!("no module root found");
            return ProjectLayout::not_found(format!(
                "no go.mod with an internal/ directory found at or above {}",
                start.display()
            ));
        };

        let go_mod = module_dir.join(MODULE_FILE);
        let content = match self.filesystem.read_to_string(&go_mod) {
            Ok(content) => content,
            Err(e) => {
                return ProjectLayout::not_found(format!("cannot read {}: {e}", go_mod.display()));
            }
        };

        match source::module_path(&content) {
            Some(module_path) => {
                debug!(module = %module_path, root = %module_dir.display(), "layout resolved");
                ProjectLayout::found(LayoutRoots::new(module_path, module_dir))
            }
            None => ProjectLayout::not_found(format!(
                "{} has no module declaration",
                go_mod.display()
            )),
        }
    }

    fn find_module_dir(&self, start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            [dir.to_path_buf(), dir.join(NESTED_MODULE_DIR)]
                .into_iter()
                .find(|candidate| self.is_module_root(candidate))
        })
    }

    fn is_module_root(&self, dir: &Path) -> bool {
        self.filesystem.is_file(&dir.join(MODULE_FILE))
            && self.filesystem.is_dir(&dir.join(INTERNAL_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;

    fn project_at(root: &'static str, go_mod: &'static str) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_is_file()
            .returning(move |p| p == Path::new(root).join("go.mod"));
        fs.expect_is_dir()
            .returning(move |p| p == Path::new(root).join("internal"));
        fs.expect_read_to_string().returning(move |p| {
            assert_eq!(p, Path::new(root).join("go.mod"));
            Ok(go_mod.to_string())
        });
        fs
    }

    #[test]
    fn resolves_from_nested_directory() {
        let fs = project_at("/work/shop", "module example.com/shop\n\ngo 1.22\n");
        let resolver = LayoutResolver::new(Arc::new(fs));

        let layout = resolver.resolve(Path::new("/work/shop/internal/domain/order"));
        assert!(layout.found);
        let roots = layout.roots().unwrap();
        assert_eq!(roots.module_path, "example.com/shop");
        assert_eq!(roots.module_dir, PathBuf::from("/work/shop"));
    }

    #[test]
    fn resolves_application_subdirectory() {
        let fs = project_at("/work/application", "module example.com/app\n");
        let resolver = LayoutResolver::new(Arc::new(fs));

        let layout = resolver.resolve(Path::new("/work"));
        assert_eq!(layout.roots().unwrap().module_dir, PathBuf::from("/work/application"));
    }

    #[test]
    fn missing_module_line_is_not_found() {
        let fs = project_at("/work/shop", "go 1.22\n");
        let resolver = LayoutResolver::new(Arc::new(fs));

        let layout = resolver.resolve(Path::new("/work/shop"));
        assert!(!layout.found);
        assert!(layout.roots().is_none());
        assert!(layout.reason().contains("no module declaration"));
    }

    #[test]
    fn empty_tree_is_not_found() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_file().return_const(false);
        fs.expect_is_dir().return_const(false);
        let resolver = LayoutResolver::new(Arc::new(fs));

        let layout = resolver.resolve(Path::new("/tmp/nothing"));
        assert!(!layout.found);
        assert!(layout.message.is_some());
    }
}
