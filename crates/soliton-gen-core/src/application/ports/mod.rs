//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `soliton-gen-adapters`
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: file reads, writes and atomic renames
//!   - `MigrationRunner`: the external Go migration tool
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (The CLI calls the services directly)

pub mod output;

pub use output::{Filesystem, MigrationRunner};

#[cfg(test)]
pub use output::{MockFilesystem, MockMigrationRunner};
