//! Artifact Registry - list, detail and exists over generated files.
//!
//! The registry owns no index. Every query lists the layout directories,
//! keeps the files that follow the generator's naming convention and
//! re-parses them through [`crate::domain::source`]:
//!
//! ```text
//! internal/domain/<pkg>/<pkg>.go                  domain (entity struct)
//! internal/domain/<pkg>/{value_object_,spec_,policy_,event_}*.go
//! internal/application/<pkg>/event_handler_*.go
//! internal/application/<pkg>/service.go           domain service
//! internal/application/services/*_service.go      cross-domain service
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ports::Filesystem;
use crate::domain::artifact::{ArtifactId, ArtifactKind, ComponentName, service_type_name};
use crate::domain::config::ServiceType;
use crate::domain::error::DomainError;
use crate::domain::field::{FieldType, FieldTypeInfo, field_types};
use crate::domain::identifier::{Identifier, canonical_key, to_pascal_case};
use crate::domain::layout::{LayoutRoots, SERVICES_DIR};
use crate::domain::listing::{
    ArtifactDetail, ArtifactSource, ComponentSummary, DomainSummary, FieldDetail, MethodDetail,
    ProjectListing, ServiceSummary,
};
use crate::domain::source::{self, GoStruct};
use crate::error::SolitonResult;

/// Entity fields every domain skeleton declares itself.
const SKELETON_FIELDS: [&str; 4] = ["ID", "CreatedAt", "UpdatedAt", "DeletedAt"];

const SERVICE_FILE: &str = "service.go";
const SERVICE_SUFFIX: &str = "_service.go";

pub struct ArtifactRegistry {
    filesystem: Arc<dyn Filesystem>,
}

impl ArtifactRegistry {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    // -------------------------------------------------------------------------
    // Listing
    // -------------------------------------------------------------------------

    /// Everything generator-owned, optionally narrowed to one domain.
    #[instrument(skip_all, fields(domain = ?domain))]
    pub fn list(&self, roots: &LayoutRoots, domain: Option<&str>) -> SolitonResult<ProjectListing> {
        let package = domain.map(package_of).transpose()?;

        let mut domains = self.domains(roots)?;
        let mut services = self.services(roots)?;
        if let Some(package) = &package {
            domains.retain(|d| &d.package == package);
            services.retain(|s| s.domain.as_ref() == Some(package));
        }

        let packages: Vec<String> = match &package {
            Some(package) => vec![package.clone()],
            None => self.domain_packages(roots)?,
        };
        let mut components = Vec::new();
        for package in &packages {
            components.extend(self.components(roots, package)?);
        }

        debug!(
            domains = domains.len(),
            services = services.len(),
            components = components.len(),
            "registry scanned"
        );
        Ok(ProjectListing {
            domains,
            services,
            components,
        })
    }

    /// Package directories under the domain root, sorted.
    pub fn domain_packages(&self, roots: &LayoutRoots) -> SolitonResult<Vec<String>> {
        Ok(self
            .filesystem
            .list_dir(&roots.domain_dir)?
            .into_iter()
            .filter(|p| self.filesystem.is_dir(p))
            .filter_map(|p| file_name(&p))
            .filter(|name| !name.starts_with('.'))
            .collect())
    }

    pub fn domain_exists(&self, roots: &LayoutRoots, package: &str) -> bool {
        self.filesystem.is_dir(&roots.domain_package_dir(package))
    }

    /// Domains with a parseable entity file.
    pub fn domains(&self, roots: &LayoutRoots) -> SolitonResult<Vec<DomainSummary>> {
        let mut domains = Vec::new();
        for package in self.domain_packages(roots)? {
            let entity_file = entity_path(roots, &package);
            if !self.filesystem.is_file(&entity_file) {
                continue;
            }
            let content = self.filesystem.read_to_string(&entity_file)?;
            if let Some(entity) = entity_struct(&content) {
                domains.push(self.domain_summary(roots, &package, &content, &entity)?);
            }
        }
        Ok(domains)
    }

    fn domain_summary(
        &self,
        roots: &LayoutRoots,
        package: &str,
        content: &str,
        entity: &GoStruct,
    ) -> SolitonResult<DomainSummary> {
        Ok(DomainSummary {
            name: entity.name.clone(),
            package: package.to_string(),
            table: source::table_name(content),
            fields: entity
                .fields
                .iter()
                .filter(|f| !SKELETON_FIELDS.contains(&f.name.as_str()))
                .map(|f| f.name.clone())
                .collect(),
            soft_delete: entity.fields.iter().any(|f| f.name == "DeletedAt"),
            files: self.domain_files(roots, package)?,
        })
    }

    /// Every file belonging to a domain, project-relative and sorted.
    pub fn domain_files(&self, roots: &LayoutRoots, package: &str) -> SolitonResult<Vec<String>> {
        let mut files: Vec<PathBuf> =
            self.filesystem.walk_files(&roots.domain_package_dir(package))?;
        files.extend(self.filesystem.walk_files(&roots.app_package_dir(package))?);
        for extra in [repository_path(roots, package), handler_path(roots, package)] {
            if self.filesystem.is_file(&extra) {
                files.push(extra);
            }
        }
        let mut files: Vec<String> = files.iter().map(|p| roots.relative(p)).collect();
        files.sort();
        Ok(files)
    }

    /// Domain services first, then cross-domain services.
    pub fn services(&self, roots: &LayoutRoots) -> SolitonResult<Vec<ServiceSummary>> {
        let mut services = Vec::new();

        for dir in self.filesystem.list_dir(&roots.app_dir)? {
            let Some(package) = file_name(&dir) else {
                continue;
            };
            if package == SERVICES_DIR || package.starts_with('.') || !self.filesystem.is_dir(&dir)
            {
                continue;
            }
            let file = dir.join(SERVICE_FILE);
            if self.filesystem.is_file(&file) {
                let fallback = format!("{}Service", to_pascal_case(&package));
                services.push(self.service_summary(
                    roots,
                    &file,
                    ServiceType::DomainService,
                    Some(package),
                    fallback,
                )?);
            }
        }

        for file in self.filesystem.list_dir(&roots.services_dir())? {
            let Some(name) = file_name(&file) else {
                continue;
            };
            if let Some(stem) = name.strip_suffix(SERVICE_SUFFIX) {
                let fallback = format!("{}Service", to_pascal_case(stem));
                services.push(self.service_summary(
                    roots,
                    &file,
                    ServiceType::CrossDomainService,
                    None,
                    fallback,
                )?);
            }
        }

        Ok(services)
    }

    fn service_summary(
        &self,
        roots: &LayoutRoots,
        file: &Path,
        service_type: ServiceType,
        domain: Option<String>,
        fallback: String,
    ) -> SolitonResult<ServiceSummary> {
        let content = self.filesystem.read_to_string(file)?;
        let parsed = source::service(&content);

        Ok(ServiceSummary {
            name: parsed.as_ref().map_or(fallback, |s| s.name.clone()),
            service_type,
            domain,
            remark: parsed.as_ref().and_then(|s| s.remark.clone()),
            methods: parsed
                .map(|s| {
                    s.methods
                        .into_iter()
                        .map(|(name, remark)| MethodDetail { name, remark })
                        .collect()
                })
                .unwrap_or_default(),
            file: roots.relative(file),
        })
    }

    /// DDD components of one domain package.
    pub fn components(
        &self,
        roots: &LayoutRoots,
        package: &str,
    ) -> SolitonResult<Vec<ComponentSummary>> {
        let mut components = Vec::new();
        for kind in ArtifactKind::COMPONENTS {
            for (path, stem) in self.component_files(roots, package, kind)? {
                let content = self.filesystem.read_to_string(&path)?;
                if !follows_convention(kind, &content) {
                    debug!(kind = %kind, stem = %stem, "not a generated component, skipping");
                    continue;
                }
                components.push(component_summary(roots, package, kind, &path, &stem, &content));
            }
        }
        Ok(components)
    }

    fn component_files(
        &self,
        roots: &LayoutRoots,
        package: &str,
        kind: ArtifactKind,
    ) -> SolitonResult<Vec<(PathBuf, String)>> {
        let dir = if kind.in_app_layer() {
            roots.app_package_dir(package)
        } else {
            roots.domain_package_dir(package)
        };
        Ok(self
            .filesystem
            .list_dir(&dir)?
            .into_iter()
            .filter_map(|path| {
                let stem = kind.match_file(&file_name(&path)?)?.to_string();
                Some((path, stem))
            })
            .filter(|(path, _)| self.filesystem.is_file(path))
            .collect())
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Backing file of a component whose canonical name matches `name`.
    /// An exact stem match wins over a canonical one.
    pub fn locate_component(
        &self,
        roots: &LayoutRoots,
        package: &str,
        kind: ArtifactKind,
        name: &Identifier,
    ) -> SolitonResult<Option<PathBuf>> {
        let wanted = ComponentName::new(kind, name);
        let files = self.component_files(roots, package, kind)?;

        let exact = files.iter().find(|(_, stem)| *stem == wanted.stem);
        let canonical = files
            .iter()
            .find(|(_, stem)| canonical_key(stem) == canonical_key(&wanted.stem));
        Ok(exact.or(canonical).map(|(path, _)| path.clone()))
    }

    pub fn locate_service(
        &self,
        roots: &LayoutRoots,
        name: &str,
    ) -> SolitonResult<Option<ServiceSummary>> {
        let wanted = canonical_key(&service_type_name(&Identifier::new(name)?));
        Ok(self
            .services(roots)?
            .into_iter()
            .find(|s| canonical_key(&s.name) == wanted))
    }

    /// Primary backing file of an artifact.
    pub fn locate(&self, roots: &LayoutRoots, id: &ArtifactId) -> SolitonResult<PathBuf> {
        let not_found = || DomainError::ArtifactNotFound {
            kind: id.kind.label().to_string(),
            name: id.name.clone(),
        };

        let found = match id.kind {
            ArtifactKind::Domain => {
                let package = id.domain_package()?;
                let path = entity_path(roots, &package);
                self.filesystem.is_file(&path).then_some(path)
            }
            ArtifactKind::Service => self
                .locate_service(roots, &id.name)?
                .map(|s| roots.module_dir.join(s.file)),
            kind => {
                let package = id.domain_package()?;
                if !self.domain_exists(roots, &package) {
                    return Err(DomainError::DomainNotFound { domain: package }.into());
                }
                self.locate_component(roots, &package, kind, &Identifier::new(&id.name)?)?
            }
        };

        found.ok_or_else(|| not_found().into())
    }

    pub fn exists(&self, roots: &LayoutRoots, id: &ArtifactId) -> SolitonResult<bool> {
        match self.locate(roots, id) {
            Ok(_) => Ok(true),
            Err(e) => match e.as_domain() {
                Some(DomainError::ArtifactNotFound { .. } | DomainError::DomainNotFound { .. }) => {
                    Ok(false)
                }
                _ => Err(e),
            },
        }
    }

    pub fn source(&self, roots: &LayoutRoots, id: &ArtifactId) -> SolitonResult<ArtifactSource> {
        let path = self.locate(roots, id)?;
        Ok(ArtifactSource {
            content: self.filesystem.read_to_string(&path)?,
            path: roots.relative(&path),
        })
    }

    // -------------------------------------------------------------------------
    // Detail
    // -------------------------------------------------------------------------

    /// Full breakdown re-derived from the file on disk.
    #[instrument(skip_all, fields(artifact = %id))]
    pub fn detail(&self, roots: &LayoutRoots, id: &ArtifactId) -> SolitonResult<ArtifactDetail> {
        let path = self.locate(roots, id)?;
        let content = self.filesystem.read_to_string(&path)?;
        let file = roots.relative(&path);
        let unparseable = |reason: &str| DomainError::UnparseableArtifact {
            kind: id.kind.label().to_string(),
            name: id.name.clone(),
            path: file.clone(),
            reason: reason.to_string(),
        };

        let detail = match id.kind {
            ArtifactKind::Domain => {
                let package = id.domain_package()?;
                let entity =
                    entity_struct(&content).ok_or_else(|| unparseable("no entity struct"))?;
                let enums = source::enum_types(&content);
                ArtifactDetail::Domain {
                    field_details: field_details(&entity, &enums, &SKELETON_FIELDS),
                    summary: self.domain_summary(roots, &package, &content, &entity)?,
                }
            }
            ArtifactKind::Service => {
                let summary = self
                    .locate_service(roots, &id.name)?
                    .ok_or_else(|| unparseable("no service struct"))?;
                ArtifactDetail::Service(summary)
            }
            ArtifactKind::ValueObject => {
                let package = id.domain_package()?;
                let vo = source::find_struct(&content, None)
                    .ok_or_else(|| unparseable("no struct"))?;
                ArtifactDetail::ValueObject {
                    domain: package,
                    fields: field_details(&vo, &source::enum_types(&content), &[]),
                    name: vo.name,
                    file,
                }
            }
            ArtifactKind::Specification | ArtifactKind::Policy => {
                let package = id.domain_package()?;
                let (target, name) = if id.kind == ArtifactKind::Specification {
                    (source::specification_target(&content), "IsSatisfiedBy")
                } else {
                    (source::policy_target(&content), "Validate")
                };
                let target = target.ok_or_else(|| unparseable(&format!("no {name} method")))?;
                let type_name = component_type(id.kind, &content, &path);
                if id.kind == ArtifactKind::Specification {
                    ArtifactDetail::Specification {
                        domain: package,
                        name: type_name,
                        file,
                        target,
                    }
                } else {
                    ArtifactDetail::Policy {
                        domain: package,
                        name: type_name,
                        file,
                        target,
                    }
                }
            }
            ArtifactKind::Event => {
                let package = id.domain_package()?;
                let name = component_type(id.kind, &content, &path);
                let event = source::find_struct(&content, Some(&name))
                    .ok_or_else(|| unparseable("no event struct"))?;
                ArtifactDetail::Event {
                    domain: package,
                    topic: source::event_topic(&content),
                    fields: field_details(&event, &source::enum_types(&content), &[]),
                    name,
                    file,
                }
            }
            ArtifactKind::EventHandler => {
                let package = id.domain_package()?;
                let (event, topic) = source::handler_binding(&content);
                ArtifactDetail::EventHandler {
                    domain: package,
                    name: component_type(id.kind, &content, &path),
                    file,
                    event,
                    topic,
                }
            }
        };

        Ok(detail)
    }

    /// The supported field-type catalogue.
    pub fn field_types(&self) -> Vec<FieldTypeInfo> {
        field_types()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn package_of(domain: &str) -> SolitonResult<String> {
    Ok(Identifier::new(domain)?.derive().package)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

pub(crate) fn entity_path(roots: &LayoutRoots, package: &str) -> PathBuf {
    roots.domain_package_dir(package).join(format!("{package}.go"))
}

pub(crate) fn repository_path(roots: &LayoutRoots, package: &str) -> PathBuf {
    roots.infra_dir.join(format!("{package}_repo.go"))
}

pub(crate) fn handler_path(roots: &LayoutRoots, package: &str) -> PathBuf {
    roots.interfaces_dir.join(format!("{package}_handler.go"))
}

/// The aggregate struct: the one whose `ID` field has type `<Name>ID`.
pub(crate) fn entity_struct(content: &str) -> Option<GoStruct> {
    source::structs(content).into_iter().find(|s| {
        s.fields
            .iter()
            .any(|f| f.name == "ID" && f.go_type == format!("{}ID", s.name))
    })
}

/// Whether a component file has the shape the generator writes for `kind`.
fn follows_convention(kind: ArtifactKind, content: &str) -> bool {
    match kind {
        ArtifactKind::Specification => source::specification_target(content).is_some(),
        ArtifactKind::Policy => source::policy_target(content).is_some(),
        ArtifactKind::Event => {
            source::event_topic(content).is_some() && declared_type(kind, content).is_some()
        }
        ArtifactKind::EventHandler => source::handler_binding(content).0.is_some(),
        _ => declared_type(kind, content).is_some(),
    }
}

/// Struct type a component file declares for `kind`.
fn declared_type(kind: ArtifactKind, content: &str) -> Option<String> {
    let suffix = match kind {
        ArtifactKind::Event => Some("Event"),
        ArtifactKind::EventHandler => Some("Handler"),
        _ => None,
    };
    source::structs(content)
        .into_iter()
        .map(|s| s.name)
        .find(|name| suffix.is_none_or(|suffix| name.ends_with(suffix)))
        .or_else(|| {
            // `type X struct{}` has no body line, so look for the bare declaration.
            content.lines().find_map(|line| {
                let rest = line.strip_prefix("type ")?;
                let name = rest.split_whitespace().next()?;
                rest.contains("struct").then(|| name.to_string())
            })
        })
}

/// Exported type of a component, falling back to the file-name convention.
pub(crate) fn component_type(kind: ArtifactKind, content: &str, path: &Path) -> String {
    declared_type(kind, content).unwrap_or_else(|| {
        let stem = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .and_then(|n| kind.match_file(&n).map(String::from))
            .unwrap_or_default();
        match Identifier::new(&stem) {
            Ok(id) => ComponentName::new(kind, &id).type_name,
            Err(_) => stem,
        }
    })
}

fn component_summary(
    roots: &LayoutRoots,
    package: &str,
    kind: ArtifactKind,
    path: &Path,
    stem: &str,
    content: &str,
) -> ComponentSummary {
    let (target, topic, event) = match kind {
        ArtifactKind::Specification => (source::specification_target(content), None, None),
        ArtifactKind::Policy => (source::policy_target(content), None, None),
        ArtifactKind::Event => (None, source::event_topic(content), None),
        ArtifactKind::EventHandler => {
            let (event, topic) = source::handler_binding(content);
            (None, topic, event)
        }
        _ => (None, None, None),
    };
    debug!(kind = %kind, stem, "component found");

    ComponentSummary {
        domain: package.to_string(),
        kind,
        name: component_type(kind, content, path),
        file: roots.relative(path),
        target,
        topic,
        event,
    }
}

fn field_details(s: &GoStruct, enums: &[(String, Vec<String>)], skip: &[&str]) -> Vec<FieldDetail> {
    s.fields
        .iter()
        .filter(|f| !skip.contains(&f.name.as_str()))
        .map(|f| {
            let enum_values = enums
                .iter()
                .find(|(name, _)| *name == f.go_type)
                .map(|(_, values)| values.clone())
                .unwrap_or_default();
            FieldDetail {
                name: f.name.clone(),
                json: f.json().map(String::from),
                go_type: f.go_type.clone(),
                field_type: source::infer_field_type(&f.go_type, f.gorm(), !enum_values.is_empty())
                    .map(FieldType::as_str),
                gorm: f.gorm().map(String::from),
                comment: f.comment.clone(),
                enum_values,
            }
        })
        .collect()
}
