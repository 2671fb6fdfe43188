//! Shared fixtures: a freshly initialised project in memory.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use soliton_gen_adapters::MemoryFilesystem;
use soliton_gen_core::prelude::*;

pub const PARENT: &str = "/work";
pub const PROJECT: &str = "/work/shop";

pub struct Project {
    pub fs: MemoryFilesystem,
    pub layout: ProjectLayout,
    pub planner: GenerationPlanner,
}

impl Project {
    pub fn roots(&self) -> &LayoutRoots {
        self.layout.roots().expect("project layout")
    }

    pub fn read(&self, relative: &str) -> String {
        self.fs
            .read_file(&Path::new(PROJECT).join(relative))
            .unwrap_or_else(|| panic!("{relative} missing"))
    }

    pub fn has(&self, relative: &str) -> bool {
        self.fs.is_file(&Path::new(PROJECT).join(relative))
    }

    pub fn apply(&self, request: impl Into<GenerationRequest>) -> GenerationResult {
        self.planner
            .generate(&request.into(), &self.layout, GenerationMode::Apply)
            .expect("generation")
    }

    pub fn registry(&self) -> ArtifactRegistry {
        ArtifactRegistry::new(Arc::new(self.fs.clone()))
    }

    pub fn executor(&self) -> MutationExecutor {
        MutationExecutor::new(Arc::new(self.fs.clone()))
    }
}

/// `shop` initialised under `/work` and resolved.
pub fn project() -> Project {
    let fs = MemoryFilesystem::new();
    fs.create_dir_all(Path::new(PARENT)).unwrap();
    let shared: Arc<dyn Filesystem> = Arc::new(fs.clone());
    let planner = GenerationPlanner::new(shared.clone());

    let init = planner
        .init_project(
            &ProjectInitConfig::new("shop"),
            Path::new(PARENT),
            GenerationMode::Apply,
        )
        .unwrap();
    assert!(init.success, "{:?}", init.errors);

    let layout = LayoutResolver::new(shared).resolve(Path::new(PROJECT));
    assert!(layout.found, "{}", layout.reason());
    Project {
        fs,
        layout,
        planner,
    }
}

/// A project holding the `Invoice` domain.
pub fn invoice_project() -> Project {
    let project = project();
    let result = project.apply(invoice());
    assert!(result.success, "{:?}", result.errors);
    project
}

pub fn invoice() -> DomainConfig {
    let mut config = DomainConfig::new("Invoice").with_field(FieldConfig::new("amount", "decimal"));
    config.soft_delete = true;
    config
}
