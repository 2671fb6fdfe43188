//! soliton-gen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the soliton-gen
//! scaffolding engine for layered DDD Go services, following hexagonal
//! (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          soliton-gen-cli (CLI)          │
//! │        (Drives the use cases)           │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │  LayoutResolver  GenerationPlanner      │
//! │  ArtifactRegistry  ServiceClassifier    │
//! │  MutationExecutor  MigrationService     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │      (Filesystem, MigrationRunner)      │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    soliton-gen-adapters (Infrastructure)│
//! │ (LocalFilesystem, MemoryFilesystem, ...)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Identifier, Field, templates, wiring,  │
//! │  source grammar)   No I/O               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use soliton_gen_core::prelude::*;
//!
//! # fn run(filesystem: Arc<dyn Filesystem>) -> SolitonResult<()> {
//! // 1. Find the project
//! let layout = LayoutResolver::new(filesystem.clone()).resolve(Path::new("."));
//!
//! // 2. Preview a domain
//! let request = DomainConfig::new("Invoice")
//!     .with_field(FieldConfig::new("amount", "decimal"));
//! let planner = GenerationPlanner::new(filesystem);
//! let result = planner.generate(&request.into(), &layout, GenerationMode::Preview)?;
//! println!("{}", result.summary());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ArtifactRegistry, GenerationPlanner, LayoutResolver, MigrationService, MutationExecutor,
        ServiceClassifier, ServiceDetection,
        ports::{Filesystem, MigrationRunner},
    };
    pub use crate::domain::{
        ArtifactDetail, ArtifactId, ArtifactKind, ArtifactSource, DomainConfig, EventConfig,
        EventHandlerConfig, FieldConfig, FieldTypeInfo, FileStatus, GenerationMode,
        GenerationRequest, GenerationResult, LayoutRoots, MigrationRequest, MigrationResult,
        MutationOutcome, PolicyConfig, ProjectInitConfig, ProjectLayout, ProjectListing,
        ServiceConfig, ServiceMethodConfig, ServiceType, SpecificationConfig, ValueObjectConfig,
    };
    pub use crate::error::{SolitonError, SolitonResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
