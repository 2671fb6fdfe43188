//! Application layer for soliton-gen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (layout, planning, registry,
//!   classification, mutation, migration)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation rules itself. Naming, rendering and parsing live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ArtifactRegistry, GenerationPlanner, LayoutResolver, MigrationService, MutationExecutor,
    ServiceClassifier, ServiceDetection,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, MigrationRunner};

pub use error::ApplicationError;
