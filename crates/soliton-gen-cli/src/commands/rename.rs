//! `soliton-gen rename`: rename a domain component in place.

use tracing::info;

use soliton_gen_core::prelude::*;

use crate::{
    cli::{GlobalArgs, RenameArgs},
    commands::show::artifact_id,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    project::Project,
};

pub fn execute(
    args: RenameArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let project = Project::open(global, config)?;
    let id = artifact_id(&args.artifact);
    let force = args.force || config.generation.force;

    let outcome = project
        .executor()
        .rename(project.roots()?, &id, &args.new_name, force)?;
    info!(artifact = %id, new_name = %args.new_name, files = outcome.files.len(), "renamed");

    report(&outcome, output)
}

/// Shared by rename and delete.
pub(crate) fn report(outcome: &MutationOutcome, output: &OutputManager) -> CliResult<()> {
    output.emit(outcome, |out| {
        if let Some(message) = &outcome.message {
            if outcome.success {
                out.success(message)?;
            } else {
                out.warning(message)?;
            }
        }
        for file in &outcome.files {
            out.detail(&format!("  {file}"))?;
        }
        Ok(())
    })
}
