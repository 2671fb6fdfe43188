//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `SOLITON_GEN__<SECTION>__<KEY>`
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use soliton_gen_core::domain::ProjectInitConfig;
use soliton_gen_core::domain::migration::DEFAULT_TIMEOUT_SECONDS;

use crate::error::{CliError, CliResult, IntoCli};

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "SOLITON_GEN";

/// Every key `config get|set` understands.
pub const KEYS: [&str; 9] = [
    "project.path",
    "project.module_prefix",
    "generation.force",
    "generation.wire",
    "generation.soft_delete",
    "output.no_color",
    "output.format",
    "migration.auto_tidy",
    "migration.timeout_seconds",
];

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project: ProjectDefaults,
    pub generation: GenerationDefaults,
    pub output: OutputConfig,
    pub migration: MigrationDefaults,
}

/// Where to find projects and how to name new ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    /// Start directory used when `-C` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// `init` derives the module path as `<module_prefix>/<name>`.
    pub module_prefix: String,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            path: None,
            module_prefix: ProjectInitConfig::DEFAULT_MODULE_PREFIX.into(),
        }
    }
}

/// Flag defaults for generation commands. A flag on the command line can
/// only switch these on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationDefaults {
    pub force: bool,
    pub wire: bool,
    pub soft_delete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationDefaults {
    pub auto_tidy: bool,
    pub timeout_seconds: u64,
}

impl Default for MigrationDefaults {
    fn default() -> Self {
        Self {
            auto_tidy: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())?;
        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.soliton-gen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "soliton-go", "soliton-gen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".soliton-gen.toml"))
    }

    /// The file `config set|init` write to.
    pub fn target_path(explicit: Option<&PathBuf>) -> PathBuf {
        explicit.cloned().unwrap_or_else(Self::config_path)
    }

    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Value of a dotted key, rendered for display. Unset optional keys
    /// render as the empty string.
    pub fn get(&self, key: &str) -> CliResult<String> {
        ensure_known(key)?;
        let value = toml::Value::try_from(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(value
            .as_table()
            .and_then(|table| lookup(table, key))
            .map(display_value)
            .unwrap_or_default())
    }
}

/// Set `key` to `raw` in the TOML file at `path`, keeping every other entry.
///
/// The updated document must still deserialize into [`AppConfig`], so a
/// value of the wrong type is rejected before anything is written.
pub fn set_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    ensure_known(key)?;

    let mut doc = if path.is_file() {
        let content = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read config '{}'", path.display()))?;
        content.parse::<toml::Table>().map_err(|e| CliError::ConfigError {
            message: format!("Invalid TOML in '{}': {e}", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let (section, field) = key.split_once('.').unwrap_or(("", key));
    let table = doc
        .entry(section)
        .or_insert(toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(table) = table else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' is not a table in '{}'", path.display()),
            source: None,
        });
    };
    table.insert(field.to_string(), parse_value(raw));

    toml::Value::Table(doc.clone())
        .try_into::<AppConfig>()
        .map_err(|e| CliError::ConfigError {
            message: format!("Invalid value for '{key}': {e}"),
            source: Some(Box::new(e)),
        })?;

    write_file(path, &toml::to_string_pretty(&doc).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?)
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, content)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}

fn ensure_known(key: &str) -> CliResult<()> {
    if KEYS.contains(&key) {
        Ok(())
    } else {
        Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}' (known: {})", KEYS.join(", ")),
            source: None,
        })
    }
}

fn lookup<'a>(table: &'a toml::Table, key: &str) -> Option<&'a toml::Value> {
    let (section, field) = key.split_once('.')?;
    table.get(section)?.as_table()?.get(field)
}

fn display_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Booleans and integers keep their type; everything else is a string.
fn parse_value(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        return toml::Value::Boolean(b);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return toml::Value::Integer(n);
    }
    toml::Value::String(raw.to_string())
}
