//! `soliton-gen config`: read and write configuration values.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::{AppConfig, set_value, write_file},
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let target = AppConfig::target_path(global.config.as_ref());

    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            output.emit(&serde_json::json!({ "key": key, "value": value }), |out| {
                out.raw(&value)?;
                Ok(())
            })?;
        }

        ConfigCommands::Set { key, value } => {
            set_value(&target, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", target.display()))?;
        }

        ConfigCommands::List => {
            output.emit(config, |out| {
                out.header("Current configuration:")?;
                out.print(&config.to_toml()?)?;
                Ok(())
            })?;
        }

        ConfigCommands::Path => {
            output.raw(&target.display().to_string())?;
        }

        ConfigCommands::Init { force } => {
            if target.exists() && !force {
                output.warning(&format!(
                    "{} already exists; pass --force to overwrite",
                    target.display()
                ))?;
                return Ok(());
            }
            write_file(&target, &AppConfig::default().to_toml()?)?;
            output.success(&format!("Wrote default configuration to {}", target.display()))?;
        }
    }

    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
