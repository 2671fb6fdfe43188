//! `soliton-gen init`: create a new project skeleton.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use soliton_gen_adapters::LocalFilesystem;
use soliton_gen_core::prelude::*;

use crate::{
    cli::{GlobalArgs, InitArgs},
    commands::generate::report,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    project::absolute,
};

/// Create `<dir>/<name>` with the standard layout.
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: InitArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let parent = absolute(args.dir.as_deref().unwrap_or(Path::new(".")))?;
    let request = build_config(&args, config);

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let mode = if args.write.is_preview() {
        GenerationMode::Preview
    } else {
        GenerationMode::Apply
    };

    info!(parent = %parent.display(), module = %request.module_path(), "initialising project");
    let result = GenerationPlanner::new(filesystem.clone()).init_project(&request, &parent, mode)?;

    let root = parent.join(request.name.trim());
    let heading = if mode.is_preview() {
        format!("Preview of project {}", request.name)
    } else {
        format!("Creating project {}", request.name)
    };
    report(
        &result,
        &heading,
        args.write.diff,
        |rel| filesystem.read_to_string(&root.join(rel)).ok(),
        output,
    )?;

    if !mode.is_preview() && !output.is_json() && !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", request.name))?;
        output.print("  soliton-gen domain <Name> --fields <name:type,...> --wire")?;
    }
    Ok(())
}

fn build_config(args: &InitArgs, config: &AppConfig) -> ProjectInitConfig {
    let prefix = config.project.module_prefix.trim().trim_end_matches('/');
    let module = args.module.clone().or_else(|| {
        (!prefix.is_empty()).then(|| format!("{prefix}/{}", args.name.trim()))
    });

    ProjectInitConfig {
        name: args.name.clone(),
        module_name: module,
        framework_version: args.framework_version.clone(),
        framework_replace: args.framework_replace.clone(),
        go_version: args.go_version.clone(),
        force: args.write.force || config.generation.force,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::WriteArgs;

    fn args(module: Option<&str>) -> InitArgs {
        InitArgs {
            name: "shop".into(),
            dir: None,
            module: module.map(String::from),
            go_version: None,
            framework_version: None,
            framework_replace: None,
            write: WriteArgs {
                preview: false,
                diff: false,
                force: false,
            },
        }
    }

    #[test]
    fn module_defaults_to_configured_prefix() {
        let mut config = AppConfig::default();
        assert_eq!(
            build_config(&args(None), &config).module_path(),
            "github.com/soliton-go/shop"
        );

        config.project.module_prefix = "example.com/acme/".into();
        assert_eq!(
            build_config(&args(None), &config).module_path(),
            "example.com/acme/shop"
        );
    }

    #[test]
    fn explicit_module_wins() {
        let config = AppConfig::default();
        let request = build_config(&args(Some("git.example.org/shop")), &config);
        assert_eq!(request.module_path(), "git.example.org/shop");
    }
}
