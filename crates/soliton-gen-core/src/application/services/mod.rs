//! Application services - orchestrate use cases.
//!
//! Each service owns nothing but its ports: every call re-reads the target
//! project, so two calls never share state.

pub mod classifier;
pub mod generation_planner;
pub mod layout_resolver;
pub mod migration_service;
pub mod mutation_executor;
pub mod registry;

pub use classifier::{ServiceClassifier, ServiceDetection};
pub use generation_planner::GenerationPlanner;
pub use layout_resolver::LayoutResolver;
pub use migration_service::MigrationService;
pub use mutation_executor::MutationExecutor;
pub use registry::ArtifactRegistry;
