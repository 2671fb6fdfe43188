//! Generation Planner - turns a request into a [`Plan`] and, in apply
//! mode, hands it to the [`MutationExecutor`].
//!
//! ```text
//! GenerationRequest ──validate──► names + fields ──render──► Plan
//!                                                              │
//!                          preview ◄──────── mode ────────► apply
//!                      (content returned)              (files written)
//! ```
//!
//! Every status is computed before the first write. Registration edits to
//! `main.go`/`module.go` are additive, so they are planned as `overwritten`
//! whenever they change content, independent of `force`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::ports::Filesystem;
use crate::application::services::classifier::ServiceClassifier;
use crate::application::services::mutation_executor::MutationExecutor;
use crate::application::services::registry::{
    ArtifactRegistry, entity_path, handler_path, repository_path,
};
use crate::domain::artifact::{
    ArtifactKind, ComponentName, default_topic, domain_package, normalize_target, service_base,
};
use crate::domain::config::{
    DomainConfig, EventConfig, EventHandlerConfig, GenerationRequest, PolicyConfig,
    ProjectInitConfig, ServiceConfig, ServiceType, SpecificationConfig, ValueObjectConfig,
};
use crate::domain::error::DomainError;
use crate::domain::field::{
    Field, FieldConfig, ReservedFields, default_entity_field, default_value_field,
};
use crate::domain::generation::{FileStatus, GenerationMode, GenerationResult, Plan, PlannedFile};
use crate::domain::identifier::{Identifier, to_snake_case};
use crate::domain::layout::{APP_MODULE_FILE, LayoutRoots, MAIN_FILE, ProjectLayout, SERVICES_DIR};
use crate::domain::source;
use crate::domain::templates::components::{
    self, EventHandlerModel, EventModel, RuleModel, ValueObjectModel,
};
use crate::domain::templates::domain::{self as domain_tpl, EntityModel, HTTP_HELPERS};
use crate::domain::templates::project::{PROJECT_DIRS, ProjectModel};
use crate::domain::templates::service::{self as service_tpl, MethodModel, ServiceModel};
use crate::domain::wiring;
use crate::error::SolitonResult;

const HTTP_HELPERS_FILE: &str = "helpers.go";
/// Sibling checkout of the framework picked up by `replace` directives.
const FRAMEWORK_DIR: &str = "framework";
const WORKSPACE_FILE: &str = "go.work";

/// What happened to a planned in-place edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Applied,
    Unchanged,
    Missing,
}

pub struct GenerationPlanner {
    filesystem: Arc<dyn Filesystem>,
    registry: ArtifactRegistry,
    classifier: ServiceClassifier,
    executor: MutationExecutor,
}

impl GenerationPlanner {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            registry: ArtifactRegistry::new(filesystem.clone()),
            classifier: ServiceClassifier::new(filesystem.clone()),
            executor: MutationExecutor::new(filesystem.clone()),
            filesystem,
        }
    }

    // -------------------------------------------------------------------------
    // Entry Points
    // -------------------------------------------------------------------------

    /// Plan `request` against `layout`, writing it in apply mode.
    ///
    /// A missing layout and per-file write failures come back as an
    /// unsuccessful result; only malformed or conflicting requests are `Err`.
    #[instrument(skip_all, fields(request = %request.label(), mode = ?mode))]
    pub fn generate(
        &self,
        request: &GenerationRequest,
        layout: &ProjectLayout,
        mode: GenerationMode,
    ) -> SolitonResult<GenerationResult> {
        let Some(roots) = layout.roots() else {
            warn!(reason = %layout.reason(), "no project layout");
            return Ok(GenerationResult::failure(layout.reason()));
        };

        let plan = self.plan(request, roots)?;
        Ok(self.finish(plan, mode))
    }

    /// Compute the plan for `request` without touching the disk.
    pub fn plan(&self, request: &GenerationRequest, roots: &LayoutRoots) -> SolitonResult<Plan> {
        let plan = match request {
            GenerationRequest::Domain(c) => self.plan_domain(c, roots)?,
            GenerationRequest::Service(c) => self.plan_service(c, roots)?,
            GenerationRequest::ValueObject(c) => self.plan_value_object(c, roots)?,
            GenerationRequest::Specification(c) => self.plan_specification(c, roots)?,
            GenerationRequest::Policy(c) => self.plan_policy(c, roots)?,
            GenerationRequest::Event(c) => self.plan_event(c, roots)?,
            GenerationRequest::EventHandler(c) => self.plan_event_handler(c, roots)?,
        };
        debug!(files = plan.files.len(), notes = plan.notes.len(), "plan computed");
        Ok(plan)
    }

    /// Create a new project skeleton at `<parent_dir>/<name>`.
    #[instrument(skip_all, fields(project = %config.name, mode = ?mode))]
    pub fn init_project(
        &self,
        config: &ProjectInitConfig,
        parent_dir: &Path,
        mode: GenerationMode,
    ) -> SolitonResult<GenerationResult> {
        config.validate()?;

        let name = config.name.trim();
        let project_dir = parent_dir.join(name);
        let module_path = config.module_path();
        let roots = LayoutRoots::new(module_path.clone(), project_dir.clone());

        let replace = non_empty(config.framework_replace.as_deref())
            .map(String::from)
            .or_else(|| {
                self.filesystem
                    .is_dir(&parent_dir.join(FRAMEWORK_DIR))
                    .then(|| format!("../{FRAMEWORK_DIR}"))
            });
        let framework_version = match non_empty(config.framework_version.as_deref()) {
            Some(version) => version.to_string(),
            None if replace.is_some() => ProjectInitConfig::REPLACED_FRAMEWORK_VERSION.to_string(),
            None => ProjectInitConfig::DEFAULT_FRAMEWORK_VERSION.to_string(),
        };
        let go_version = match non_empty(config.go_version.as_deref()) {
            Some(version) => version.to_string(),
            None => self
                .workspace_go_version(parent_dir)
                .unwrap_or_else(|| config.go_version().to_string()),
        };

        let model = ProjectModel {
            name,
            module_path: &module_path,
            go_version: &go_version,
            framework_version: &framework_version,
            framework_replace: replace.as_deref(),
        };

        let mut plan = Plan::default();
        for dir in PROJECT_DIRS {
            plan.directory(project_dir.join(dir));
        }
        for (relative, content) in model.files() {
            self.add(&mut plan, &roots, project_dir.join(relative), content, config.force);
        }
        if let Some(replace) = &replace {
            plan.note(format!("Framework replaced with {replace}"));
        }

        info!(module = %module_path, go = %go_version, "project planned");
        Ok(self.finish(plan, mode))
    }

    fn finish(&self, plan: Plan, mode: GenerationMode) -> GenerationResult {
        let errors = if mode.is_preview() {
            Vec::new()
        } else {
            self.executor.apply(&plan)
        };
        let result = GenerationResult::from_plan(plan, mode, errors);
        info!(summary = %result.summary(), success = result.success, "generation finished");
        result
    }

    fn workspace_go_version(&self, parent_dir: &Path) -> Option<String> {
        let work = parent_dir.join(WORKSPACE_FILE);
        if !self.filesystem.is_file(&work) {
            return None;
        }
        match self.filesystem.read_to_string(&work) {
            Ok(content) => source::go_directive(&content),
            Err(e) => {
                debug!(error = %e, "go.work unreadable, using default go version");
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Domain
    // -------------------------------------------------------------------------

    fn plan_domain(&self, config: &DomainConfig, roots: &LayoutRoots) -> SolitonResult<Plan> {
        let id = config.validate()?;
        let names = id
            .derive()
            .with_table(config.table_name.as_deref())
            .with_route(config.route_base.as_deref());
        let fields = resolve_fields(
            &config.fields,
            &names.pascal,
            &names.package,
            default_entity_field,
        )?;

        let model = EntityModel {
            names,
            module_path: roots.module_path.clone(),
            soft_delete: config.soft_delete,
            fields,
        };
        let package = model.names.package.as_str();
        let domain_dir = roots.domain_package_dir(package);
        let app_dir = roots.app_package_dir(package);
        let force = config.force;

        let mut plan = Plan::default();
        let files = [
            (entity_path(roots, package), domain_tpl::entity(&model)),
            (domain_dir.join("repository.go"), domain_tpl::repository(&model)),
            (domain_dir.join("events.go"), domain_tpl::events(&model)),
            (repository_path(roots, package), domain_tpl::repository_impl(&model)),
            (app_dir.join("commands.go"), domain_tpl::commands(&model)),
            (app_dir.join("queries.go"), domain_tpl::queries(&model)),
            (app_dir.join("dto.go"), domain_tpl::dto(&model)),
            (app_dir.join(APP_MODULE_FILE), domain_tpl::module(&model)),
            (roots.interfaces_dir.join(HTTP_HELPERS_FILE), HTTP_HELPERS.to_string()),
            (handler_path(roots, package), domain_tpl::handler(&model)),
        ];
        for (path, content) in files {
            self.add(&mut plan, roots, path, content, force);
        }

        if config.wire {
            let entity = model.names.pascal.as_str();
            let edit = self.edit(&mut plan, roots, roots.main_file(), |main| {
                wiring::wire_domain(main, &roots.module_path, package, entity)
            })?;
            match edit {
                Edit::Applied => debug!(entity, "domain wired"),
                Edit::Unchanged => plan.note(format!("{MAIN_FILE} already wires {entity}")),
                Edit::Missing => {
                    plan.note(format!("{MAIN_FILE} not found, {entity} was not wired"))
                }
            }
        }

        Ok(plan)
    }

    // -------------------------------------------------------------------------
    // Services
    // -------------------------------------------------------------------------

    fn plan_service(&self, config: &ServiceConfig, roots: &LayoutRoots) -> SolitonResult<Plan> {
        config.validate()?;
        let detection = self.classifier.detect(roots, &config.name)?;
        let service_type = config.service_type.unwrap_or(detection.service_type);
        let name = detection.service_name.as_str();
        let base = service_base(name);

        let methods: Vec<MethodModel> = if config.methods.is_empty() {
            [format!("Create{base}"), format!("Get{base}"), format!("List{base}s")]
                .into_iter()
                .map(|name| MethodModel { name, remark: None })
                .collect()
        } else {
            config
                .methods
                .iter()
                .map(|m| {
                    Ok(MethodModel {
                        name: Identifier::new(&m.name)?.pascal(),
                        remark: m.remark.clone(),
                    })
                })
                .collect::<SolitonResult<Vec<_>>>()?
        };

        let (dir, go_package, service_file, dto_file, reuse_dto) = match service_type {
            ServiceType::DomainService => {
                if !detection.domain_exists {
                    return Err(DomainError::DomainNotFound {
                        domain: detection.domain_package.clone(),
                    }
                    .into());
                }
                let dir = roots.app_package_dir(&detection.domain_package);
                let dto = self
                    .classifier
                    .dto_path(roots, &detection)
                    .unwrap_or_else(|| dir.join("dto.go"));
                (
                    dir.clone(),
                    format!("{}app", detection.domain_package),
                    dir.join("service.go"),
                    dto,
                    config.reuse_dto.unwrap_or(detection.should_reuse_dto),
                )
            }
            ServiceType::CrossDomainService => {
                let dir = roots.services_dir();
                let snake = to_snake_case(&base);
                (
                    dir.clone(),
                    SERVICES_DIR.to_string(),
                    dir.join(format!("{snake}_service.go")),
                    dir.join(format!("{snake}_dto.go")),
                    config.reuse_dto.unwrap_or(false),
                )
            }
        };

        let model = ServiceModel {
            package: &go_package,
            name,
            remark: config.remark.as_deref(),
            methods: &methods,
            reuse_dto,
        };

        let mut plan = Plan::default();
        self.add(&mut plan, roots, service_file, service_tpl::service(&model), config.force);
        if reuse_dto {
            plan.note(format!("Reusing the existing DTO in {}", roots.relative(&dto_file)));
        } else {
            self.add(&mut plan, roots, dto_file, service_tpl::dto(&model), config.force);
        }

        let module = dir.join(APP_MODULE_FILE);
        let edit = self.edit(&mut plan, roots, module.clone(), |content| {
            wiring::register_service(content, name)
        })?;
        match edit {
            Edit::Missing => {
                let content = service_tpl::module(&go_package, name);
                self.add(&mut plan, roots, module, content, config.force);
            }
            // Already registered: report the module like any other existing file.
            Edit::Unchanged if !plan.contains(&module) => {
                let content = self.filesystem.read_to_string(&module)?;
                self.add(&mut plan, roots, module, content, config.force);
            }
            _ => {}
        }

        debug!(service = name, %service_type, reuse_dto, "service planned");
        Ok(plan)
    }

    // -------------------------------------------------------------------------
    // DDD Components
    // -------------------------------------------------------------------------

    fn plan_value_object(
        &self,
        config: &ValueObjectConfig,
        roots: &LayoutRoots,
    ) -> SolitonResult<Plan> {
        let kind = ArtifactKind::ValueObject;
        let (name, _, package) = self.component_target(roots, &config.domain, &config.name)?;
        let component = ComponentName::new(kind, &name);
        let path = self.unique_path(roots, &package, kind, &name, config.force)?;

        let fields = resolve_fields(
            &config.fields,
            &component.type_name,
            &package,
            default_value_field,
        )?;
        let content = components::value_object(&ValueObjectModel {
            package: &package,
            name: &component.type_name,
            remark: config.remark.as_deref(),
            fields: &fields,
        });

        let mut plan = Plan::default();
        self.add(&mut plan, roots, path, content, config.force);
        Ok(plan)
    }

    fn plan_specification(
        &self,
        config: &SpecificationConfig,
        roots: &LayoutRoots,
    ) -> SolitonResult<Plan> {
        let kind = ArtifactKind::Specification;
        let (name, _, package) = self.component_target(roots, &config.domain, &config.name)?;
        let component = ComponentName::new(kind, &name);
        let path = self.unique_path(roots, &package, kind, &name, config.force)?;

        let target = normalize_target(config.target.as_deref());
        let content = components::specification(&RuleModel {
            package: &package,
            name: &component.type_name,
            remark: config.remark.as_deref(),
            target: &target,
        });

        let mut plan = Plan::default();
        self.add(&mut plan, roots, path, content, config.force);
        Ok(plan)
    }

    fn plan_policy(&self, config: &PolicyConfig, roots: &LayoutRoots) -> SolitonResult<Plan> {
        let kind = ArtifactKind::Policy;
        let (name, _, package) = self.component_target(roots, &config.domain, &config.name)?;
        let component = ComponentName::new(kind, &name);
        let path = self.unique_path(roots, &package, kind, &name, config.force)?;

        let target = normalize_target(config.target.as_deref());
        let content = components::policy(&RuleModel {
            package: &package,
            name: &component.type_name,
            remark: config.remark.as_deref(),
            target: &target,
        });

        let mut plan = Plan::default();
        self.add(&mut plan, roots, path, content, config.force);
        Ok(plan)
    }

    fn plan_event(&self, config: &EventConfig, roots: &LayoutRoots) -> SolitonResult<Plan> {
        let kind = ArtifactKind::Event;
        let (name, domain, package) = self.component_target(roots, &config.domain, &config.name)?;
        let component = ComponentName::new(kind, &name);
        let path = self.unique_path(roots, &package, kind, &name, config.force)?;

        let topic = non_empty(config.topic.as_deref())
            .map(String::from)
            .unwrap_or_else(|| default_topic(&package, &domain.pascal(), &component.base));
        // Event payloads may legitimately carry `id` or `created_at`.
        let fields = Field::resolve_all(
            &config.fields,
            &component.type_name,
            &package,
            ReservedFields::Allow,
        )?;
        let content = components::event(&EventModel {
            package: &package,
            name: &component.type_name,
            topic: &topic,
            remark: config.remark.as_deref(),
            fields: &fields,
        });

        let mut plan = Plan::default();
        self.add(&mut plan, roots, path, content, config.force);
        Ok(plan)
    }

    fn plan_event_handler(
        &self,
        config: &EventHandlerConfig,
        roots: &LayoutRoots,
    ) -> SolitonResult<Plan> {
        let kind = ArtifactKind::EventHandler;
        let (name, domain, package) =
            self.component_target(roots, &config.domain, &config.event_name)?;
        let component = ComponentName::new(kind, &name);
        let path = self.unique_path(roots, &package, kind, &name, config.force)?;
        let event = component.event_type();

        let mut plan = Plan::default();
        let topic = match non_empty(config.topic.as_deref()) {
            Some(topic) => topic.to_string(),
            None => match self.event_topic(roots, &package, &name)? {
                Some(topic) => topic,
                None => {
                    plan.note(format!("{event} not found in {package}, using the default topic"));
                    default_topic(&package, &domain.pascal(), &component.base)
                }
            },
        };

        let content = components::event_handler(&EventHandlerModel {
            package: &package,
            module_path: &roots.module_path,
            handler: &component.type_name,
            event: &event,
            topic: &topic,
        });
        self.add(&mut plan, roots, path, content, config.force);

        let handler = component.type_name.as_str();
        let module = roots.app_package_dir(&package).join(APP_MODULE_FILE);
        let registration = self.edit(&mut plan, roots, module, |content| {
            wiring::register_event_handler(content, handler)
        })?;
        if registration == Edit::Missing {
            plan.note(format!("No {APP_MODULE_FILE} in {package}, register {handler} manually"));
        }
        let bus = self.edit(&mut plan, roots, roots.main_file(), wiring::ensure_event_bus)?;
        if bus == Edit::Missing {
            plan.note(format!("{MAIN_FILE} not found, provide an event bus manually"));
        }

        Ok(plan)
    }

    /// Validate a component name and its owning domain.
    fn component_target(
        &self,
        roots: &LayoutRoots,
        domain: &str,
        name: &str,
    ) -> SolitonResult<(Identifier, Identifier, String)> {
        let name = Identifier::new(name)?;
        let domain = Identifier::new(domain)?;
        let package = domain_package(&domain);
        if !self.registry.domain_exists(roots, &package) {
            return Err(DomainError::DomainNotFound {
                domain: domain.as_str().to_string(),
            }
            .into());
        }
        Ok((name, domain, package))
    }

    /// Destination of a component, rejecting a same-named sibling in another
    /// file unless `force` is set.
    fn unique_path(
        &self,
        roots: &LayoutRoots,
        package: &str,
        kind: ArtifactKind,
        name: &Identifier,
        force: bool,
    ) -> SolitonResult<PathBuf> {
        let component = ComponentName::new(kind, name);
        let path = component.path(roots, kind, package);
        if !force {
            if let Some(existing) = self
                .registry
                .locate_component(roots, package, kind, name)?
                .filter(|existing| *existing != path)
            {
                return Err(DomainError::DuplicateArtifact {
                    kind: kind.label().to_string(),
                    name: component.type_name,
                    existing: roots.relative(&existing),
                }
                .into());
            }
        }
        Ok(path)
    }

    fn event_topic(
        &self,
        roots: &LayoutRoots,
        package: &str,
        name: &Identifier,
    ) -> SolitonResult<Option<String>> {
        match self
            .registry
            .locate_component(roots, package, ArtifactKind::Event, name)?
        {
            Some(path) => Ok(source::event_topic(&self.filesystem.read_to_string(&path)?)),
            None => Ok(None),
        }
    }

    // -------------------------------------------------------------------------
    // Plan Building
    // -------------------------------------------------------------------------

    fn add(
        &self,
        plan: &mut Plan,
        roots: &LayoutRoots,
        path: PathBuf,
        content: String,
        force: bool,
    ) {
        let status = FileStatus::resolve(self.filesystem.exists(&path), force);
        let relative = roots.relative(&path);
        debug!(path = %relative, %status, "file planned");
        plan.push(PlannedFile {
            path,
            relative,
            status,
            content,
        });
    }

    /// Plan an in-place edit. A file the plan already writes is edited in
    /// the plan; otherwise the on-disk content is.
    fn edit<F>(
        &self,
        plan: &mut Plan,
        roots: &LayoutRoots,
        path: PathBuf,
        edit: F,
    ) -> SolitonResult<Edit>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        if let Some(planned) = plan
            .files
            .iter_mut()
            .find(|f| f.path == path && f.status.writes())
        {
            return Ok(match edit(&planned.content) {
                Some(updated) => {
                    planned.content = updated;
                    Edit::Applied
                }
                None => Edit::Unchanged,
            });
        }

        if !self.filesystem.is_file(&path) {
            return Ok(Edit::Missing);
        }
        let current = self.filesystem.read_to_string(&path)?;
        match edit(&current) {
            Some(updated) => {
                plan.files.retain(|f| f.path != path);
                plan.push(PlannedFile {
                    relative: roots.relative(&path),
                    path,
                    status: FileStatus::Overwritten,
                    content: updated,
                });
                Ok(Edit::Applied)
            }
            None => Ok(Edit::Unchanged),
        }
    }
}

/// Resolve a field list, falling back to a single default field when
/// nothing usable remains.
fn resolve_fields(
    configs: &[FieldConfig],
    owner: &str,
    package: &str,
    default: fn() -> FieldConfig,
) -> SolitonResult<Vec<Field>> {
    let fields = Field::resolve_all(configs, owner, package, ReservedFields::Skip)?;
    if !fields.is_empty() {
        return Ok(fields);
    }
    Ok(vec![Field::resolve(&default(), owner, package)?])
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
