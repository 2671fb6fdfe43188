//! `soliton-gen detect` and `soliton-gen layout`.

use soliton_gen_core::prelude::*;

use crate::{
    cli::{DetectArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    project::{Project, start_dir},
};

/// Suggest whether a service belongs to a domain or spans several.
pub fn detect(
    args: DetectArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let project = Project::open(global, config)?;
    let detection = project
        .classifier()
        .detect(project.roots()?, &args.name)?;

    output.emit(&detection, |out| {
        out.header(&format!("Service {}", detection.service_name))?;
        out.print(&format!("  type         {}", detection.service_type))?;
        out.print(&format!(
            "  domain       {} ({})",
            detection.domain_name,
            if detection.domain_exists { "exists" } else { "missing" }
        ))?;
        out.print(&format!("  target dir   {}", detection.target_dir))?;
        out.print(&format!(
            "  reuse DTOs   {}",
            if detection.should_reuse_dto { "yes" } else { "no" }
        ))?;
        if let Some(dto) = &detection.existing_dto_path {
            out.print(&format!("  DTO file     {dto}"))?;
        }
        out.print("")?;
        out.info(&detection.message)?;
        Ok(())
    })
}

/// Report the discovered layout. A missing project is not an error here.
pub fn layout(global: &GlobalArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let start = start_dir(global, config)?;
    let project = Project::discover(&start);
    let layout = project.layout();

    output.emit(layout, |out| {
        let Some(roots) = layout.roots() else {
            out.warning(&format!(
                "No project found from {}: {}",
                start.display(),
                layout.reason()
            ))?;
            return Ok(());
        };
        out.header(&format!("Module {}", roots.module_path))?;
        for (label, path) in rows(roots) {
            out.print(&format!("  {label:<15} {path}"))?;
        }
        Ok(())
    })
}

fn rows(roots: &LayoutRoots) -> Vec<(&'static str, String)> {
    vec![
        ("module dir", roots.module_dir.display().to_string()),
        ("domain", roots.relative(&roots.domain_dir)),
        ("application", roots.relative(&roots.app_dir)),
        ("persistence", roots.relative(&roots.infra_dir)),
        ("http", roots.relative(&roots.interfaces_dir)),
    ]
}
