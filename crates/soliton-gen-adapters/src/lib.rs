//! Infrastructure adapters for soliton-gen.
//!
//! This crate implements the ports defined in `soliton-gen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod migration;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use migration::ProcessMigrationRunner;
