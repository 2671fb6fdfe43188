//! `soliton-gen delete`: remove an artifact and its wiring.

use std::io::{self, IsTerminal};

use tracing::info;

use crate::{
    cli::{DeleteArgs, GlobalArgs},
    commands::{rename::report, show::artifact_id},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    project::Project,
};

pub fn execute(
    args: DeleteArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let project = Project::open(global, config)?;
    let roots = project.roots()?;
    let id = artifact_id(&args.artifact);

    // Nothing to confirm for a missing artifact; delete reports it.
    if !args.yes && project.registry().exists(roots, &id)? {
        let action = format!("delete {id}");
        if !confirm(&action)? {
            return Err(CliError::Cancelled);
        }
    }

    let outcome = project.executor().delete(roots, &id)?;
    info!(artifact = %id, files = outcome.files.len(), "deleted");

    report(&outcome, output)
}

#[cfg(feature = "interactive")]
fn confirm(action: &str) -> CliResult<bool> {
    use dialoguer::Confirm;

    if !io::stdin().is_terminal() {
        return Err(CliError::ConfirmationRequired {
            action: action.to_string(),
        });
    }

    Confirm::new()
        .with_prompt(format!("Really {action}?"))
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(action: &str) -> CliResult<bool> {
    if !io::stdin().is_terminal() {
        return Err(CliError::ConfirmationRequired {
            action: action.to_string(),
        });
    }
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}
