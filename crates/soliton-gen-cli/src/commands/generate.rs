//! Generation commands: `domain`, `service`, `value-object`, `spec`,
//! `policy`, `event` and `event-handler`.
//!
//! Responsibility: translate CLI arguments into a [`GenerationRequest`], run
//! it through the planner and display the per-file outcome. No generation
//! rules live here.

use tracing::{info, instrument};

use soliton_gen_core::error::SolitonError;
use soliton_gen_core::prelude::*;

use crate::{
    cli::{
        DomainArgs, EventArgs, EventHandlerArgs, GlobalArgs, RuleArgs, ServiceArgs,
        ValueObjectArgs, WriteArgs,
    },
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    project::Project,
};

/// `soliton-gen domain`.
pub fn domain(
    args: DomainArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let request = DomainConfig {
        name: args.name,
        fields: parse_fields(args.fields.as_deref())?,
        table_name: args.table,
        route_base: args.route,
        soft_delete: args.soft_delete || config.generation.soft_delete,
        wire: args.wire || config.generation.wire,
        force: force(args.write, config),
    };
    execute(request.into(), args.write, global, config, output)
}

/// `soliton-gen service`.
pub fn service(
    args: ServiceArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let request = ServiceConfig {
        name: args.name,
        methods: args
            .methods
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(ServiceMethodConfig::new)
            .collect(),
        remark: args.remark,
        service_type: args.service_type.map(ServiceType::from),
        reuse_dto: args.reuse_dto,
        force: force(args.write, config),
    };
    execute(request.into(), args.write, global, config, output)
}

/// `soliton-gen value-object`.
pub fn value_object(
    args: ValueObjectArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let request = ValueObjectConfig {
        domain: args.domain,
        name: args.name,
        fields: parse_fields(args.fields.as_deref())?,
        remark: args.remark,
        force: force(args.write, config),
    };
    execute(request.into(), args.write, global, config, output)
}

/// `soliton-gen spec`.
pub fn specification(
    args: RuleArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let write = args.write;
    let request = SpecificationConfig {
        domain: args.domain,
        name: args.name,
        target: args.target,
        remark: args.remark,
        force: force(write, config),
    };
    execute(request.into(), write, global, config, output)
}

/// `soliton-gen policy`.
pub fn policy(
    args: RuleArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let write = args.write;
    let request = PolicyConfig {
        domain: args.domain,
        name: args.name,
        target: args.target,
        remark: args.remark,
        force: force(write, config),
    };
    execute(request.into(), write, global, config, output)
}

/// `soliton-gen event`.
pub fn event(
    args: EventArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let request = EventConfig {
        domain: args.domain,
        name: args.name,
        fields: parse_fields(args.fields.as_deref())?,
        topic: args.topic,
        remark: args.remark,
        force: force(args.write, config),
    };
    execute(request.into(), args.write, global, config, output)
}

/// `soliton-gen event-handler`.
pub fn event_handler(
    args: EventHandlerArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let request = EventHandlerConfig {
        domain: args.domain,
        event_name: args.event,
        topic: args.topic,
        force: force(args.write, config),
    };
    execute(request.into(), args.write, global, config, output)
}

// ── shared pipeline ───────────────────────────────────────────────────────────

#[instrument(skip_all, fields(request = %request.label()))]
fn execute(
    request: GenerationRequest,
    write: WriteArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let project = Project::open(global, config)?;
    let mode = if write.is_preview() {
        GenerationMode::Preview
    } else {
        GenerationMode::Apply
    };

    let result = project
        .planner()
        .generate(&request, project.layout(), mode)?;
    info!(
        success = result.success,
        files = result.files.len(),
        preview = mode.is_preview(),
        "generation finished"
    );

    let heading = if mode.is_preview() {
        format!("Preview of {}", request.label())
    } else {
        format!("Generating {}", request.label())
    };
    report(&result, &heading, write.diff, |rel| project.read_relative(rel), output)
}

/// Print a generation result and turn write failures into an error.
///
/// `current` returns the on-disk content of a project-relative path and is
/// only consulted for `--diff`.
pub fn report<F>(
    result: &GenerationResult,
    heading: &str,
    show_diff: bool,
    current: F,
    output: &OutputManager,
) -> CliResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    output.emit(result, |out| {
        out.header(heading)?;
        for file in &result.files {
            out.file_status(file.status, &file.path)?;
        }
        if show_diff {
            for file in result
                .files
                .iter()
                .filter(|f| f.status == FileStatus::Overwritten)
            {
                let (Some(new), Some(old)) = (file.content.as_deref(), current(&file.path)) else {
                    continue;
                };
                out.print("")?;
                out.diff(&file.path, &old, new)?;
            }
        }
        if let Some(message) = &result.message {
            out.print("")?;
            if result.success {
                out.success(message)?;
            } else {
                out.warning(message)?;
            }
        }
        Ok(())
    })?;

    if result.success {
        Ok(())
    } else {
        Err(CliError::GenerationFailed {
            errors: result.errors.clone(),
        })
    }
}

fn force(write: WriteArgs, config: &AppConfig) -> bool {
    write.force || config.generation.force
}

fn parse_fields(spec: Option<&str>) -> CliResult<Vec<FieldConfig>> {
    match spec {
        Some(spec) => FieldConfig::parse_list(spec).map_err(|e| SolitonError::from(e).into()),
        None => Ok(Vec::new()),
    }
}
