//! `soliton-gen migrate` and `soliton-gen tidy`: drive the Go toolchain
//! through the project's migration runner.

use std::io::{self, IsTerminal};
use std::time::Duration;

use chrono::DateTime;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use soliton_gen_core::domain::{LogLevel, MigrationLog};
use soliton_gen_core::prelude::*;

use crate::{
    cli::{GlobalArgs, MigrateArgs, TidyArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    project::Project,
};

pub fn execute(
    args: MigrateArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let project = Project::open(global, config)?;
    let request = build_request(&args, config, project.roots()?);

    let spinner = spinner(output);
    spinner.set_message(format!(
        "Migrating {}",
        request.project_path.display()
    ));
    let result = project.migrations().run(&request);
    spinner.finish_and_clear();
    let result = result?;

    info!(
        success = result.success,
        exit_code = result.exit_code,
        duration_ms = result.duration_ms,
        "migration run"
    );
    report(&result, output, "migration reported errors")
}

/// `soliton-gen tidy`: only refresh module dependencies.
pub fn tidy(
    args: TidyArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let project = Project::open(global, config)?;
    let request = tidy_request(&args, config, project.roots()?);

    let spinner = spinner(output);
    spinner.set_message(format!("Tidying {}", request.project_path.display()));
    let result = project.migrations().tidy(&request);
    spinner.finish_and_clear();
    let result = result?;

    info!(success = result.success, exit_code = result.exit_code, "tidy run");
    report(&result, output, "go mod tidy reported errors")
}

fn report(result: &MigrationResult, output: &OutputManager, fallback: &str) -> CliResult<()> {
    output.emit(result, |out| {
        out.header(&format!("$ {}", result.command))?;
        for log in &result.logs {
            let line = log_line(log);
            match log.level {
                LogLevel::Info => out.print(&line)?,
                LogLevel::Warn => out.warning(&line)?,
                LogLevel::Error => out.error(&line)?,
            }
        }
        out.print("")?;
        let summary = result
            .message
            .clone()
            .unwrap_or_else(|| format!("exit code {}", result.exit_code));
        let summary = format!("{summary} ({} ms)", result.duration_ms);
        if result.success {
            out.success(&summary)?;
        } else {
            out.error(&summary)?;
        }
        Ok(())
    })?;

    if result.success {
        Ok(())
    } else {
        Err(CliError::MigrationFailed {
            exit_code: result.exit_code,
            message: result.message.clone().unwrap_or_else(|| fallback.into()),
        })
    }
}

fn build_request(
    args: &MigrateArgs,
    config: &AppConfig,
    roots: &LayoutRoots,
) -> MigrationRequest {
    let timeout = args.timeout.unwrap_or(config.migration.timeout_seconds);
    MigrationRequest::new(roots.module_dir.clone())
        .with_auto_tidy(args.tidy || config.migration.auto_tidy)
        .with_timeout(timeout)
}

fn tidy_request(args: &TidyArgs, config: &AppConfig, roots: &LayoutRoots) -> MigrationRequest {
    let timeout = args.timeout.unwrap_or(config.migration.timeout_seconds);
    MigrationRequest::new(roots.module_dir.clone()).with_timeout(timeout)
}

/// Spinner on an interactive stderr, hidden otherwise.
fn spinner(output: &OutputManager) -> ProgressBar {
    if output.is_quiet() || output.is_json() || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn log_line(log: &MigrationLog) -> String {
    let time = DateTime::parse_from_rfc3339(&log.time)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|_| log.time.clone());
    format!("{time} [{}] {}", log.step, log.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_merges_flags_with_config() {
        let roots = LayoutRoots::new("example.com/shop", "/work/shop");
        let mut config = AppConfig::default();

        let args = MigrateArgs {
            tidy: false,
            timeout: None,
        };
        let request = build_request(&args, &config, &roots);
        assert_eq!(request.project_path, roots.module_dir);
        assert!(!request.auto_tidy);
        assert_eq!(request.timeout_seconds, Some(300));

        config.migration.auto_tidy = true;
        let args = MigrateArgs {
            tidy: false,
            timeout: Some(30),
        };
        let request = build_request(&args, &config, &roots);
        assert!(request.auto_tidy);
        assert_eq!(request.effective_timeout(), 30);
    }

    #[test]
    fn tidy_request_ignores_auto_tidy() {
        let roots = LayoutRoots::new("example.com/shop", "/work/shop");
        let mut config = AppConfig::default();
        config.migration.auto_tidy = true;

        let request = tidy_request(&TidyArgs { timeout: None }, &config, &roots);
        assert_eq!(request.project_path, roots.module_dir);
        assert!(!request.auto_tidy);
        assert_eq!(request.effective_timeout(), 300);

        let request = tidy_request(&TidyArgs { timeout: Some(5000) }, &config, &roots);
        assert_eq!(request.effective_timeout(), 1800);
    }

    #[test]
    fn log_line_shortens_timestamp() {
        let log = MigrationLog {
            time: "2026-03-01T10:15:30Z".into(),
            level: LogLevel::Info,
            step: "migrate".into(),
            message: "tables created".into(),
        };
        assert_eq!(log_line(&log), "10:15:30 [migrate] tables created");

        let raw = MigrationLog {
            time: "not a time".into(),
            ..log
        };
        assert!(log_line(&raw).starts_with("not a time [migrate]"));
    }
}
