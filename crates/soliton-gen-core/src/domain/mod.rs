// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for soliton-gen.
//!
//! Pure generation logic: naming, field resolution, file conventions,
//! source rendering, the parse grammar used to read generated files back,
//! and registration edits. All filesystem access goes through the ports
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: renderers return strings, parsers take strings
//! - **Deterministic**: identical input renders byte-identical output
//! - **Immutable values**: all domain objects are Clone + PartialEq
//!
pub mod artifact;
pub mod config;
pub mod error;
pub mod field;
pub mod generation;
pub mod identifier;
pub mod layout;
pub mod listing;
pub mod migration;
pub mod source;
pub mod templates;
pub mod wiring;

pub use artifact::{ArtifactId, ArtifactKind, ComponentName};
pub use config::{
    DomainConfig, EventConfig, EventHandlerConfig, GenerationRequest, PolicyConfig,
    ProjectInitConfig, ServiceConfig, ServiceMethodConfig, ServiceType, SpecificationConfig,
    ValueObjectConfig,
};
pub use error::{DomainError, ErrorCategory};
pub use field::{Field, FieldConfig, FieldType, FieldTypeInfo, ReservedFields, field_types};
pub use generation::{
    FileStatus, GeneratedFile, GenerationMode, GenerationResult, MutationOutcome, Plan,
    PlannedFile,
};
pub use identifier::{Identifier, NameVariants};
pub use layout::{LayoutRoots, ProjectLayout};
pub use listing::{
    ArtifactDetail, ArtifactSource, ComponentSummary, DomainSummary, FieldDetail, MethodDetail,
    ProjectListing, ServiceSummary,
};
pub use migration::{LogLevel, MigrationLog, MigrationRequest, MigrationResult};
pub use templates::RenderContext;
