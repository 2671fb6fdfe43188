//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use soliton_gen_core::domain::{ArtifactKind, ServiceType};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "soliton-gen",
    bin_name = "soliton-gen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "DDD scaffolding for layered Go services",
    long_about = "soliton-gen creates Go service projects and generates domains, \
                  application services and DDD building blocks into them. \
                  Generated files can be listed, inspected, renamed and deleted.",
    after_help = "EXAMPLES:\n\
        \x20 soliton-gen init shop\n\
        \x20 soliton-gen -C shop domain Invoice --fields 'amount:decimal,status:enum(open|paid)' --wire\n\
        \x20 soliton-gen -C shop event invoice InvoicePaid --preview\n\
        \x20 soliton-gen -C shop list --output-format json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project skeleton.
    #[command(
        about = "Create a new Go project",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen init shop\n\
            \x20 soliton-gen init shop --module example.com/shop --go-version 1.23\n\
            \x20 soliton-gen init shop --dir ~/src --preview"
    )]
    Init(InitArgs),

    /// Generate an entity-centred domain across all layers.
    #[command(
        visible_alias = "d",
        about = "Generate a domain",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen domain Invoice --fields amount:decimal,due_at:time?\n\
            \x20 soliton-gen domain Invoice --soft-delete --wire\n\
            \x20 soliton-gen domain Invoice --fields amount:decimal --force --diff"
    )]
    Domain(DomainArgs),

    /// Generate an application service.
    #[command(
        visible_alias = "s",
        about = "Generate an application service",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen service Invoice\n\
            \x20 soliton-gen service Reporting --methods monthly_totals,top_customers\n\
            \x20 soliton-gen service Billing --type cross-domain"
    )]
    Service(ServiceArgs),

    /// Generate a value object inside a domain.
    #[command(
        visible_alias = "vo",
        about = "Generate a value object",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen value-object invoice Money --fields amount:decimal,currency"
    )]
    ValueObject(ValueObjectArgs),

    /// Generate a specification inside a domain.
    #[command(
        about = "Generate a specification",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen spec invoice Overdue --target Invoice"
    )]
    Spec(RuleArgs),

    /// Generate a policy inside a domain.
    #[command(
        about = "Generate a policy",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen policy invoice Refund --target Invoice"
    )]
    Policy(RuleArgs),

    /// Generate a domain event.
    #[command(
        about = "Generate a domain event",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen event invoice InvoicePaid --fields paid_at:time\n\
            \x20 soliton-gen event invoice InvoicePaid --topic billing.invoice_paid"
    )]
    Event(EventArgs),

    /// Generate a handler for a domain event.
    #[command(
        about = "Generate an event handler",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen event-handler invoice InvoicePaid"
    )]
    EventHandler(EventHandlerArgs),

    /// List generated artifacts.
    #[command(
        visible_alias = "ls",
        about = "List domains, services and components",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen list\n\
            \x20 soliton-gen list --domain invoice\n\
            \x20 soliton-gen list --output-format json"
    )]
    List(ListArgs),

    /// Show what the generator can read back from one artifact.
    #[command(
        about = "Show artifact details",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen detail domain Invoice\n\
            \x20 soliton-gen detail event InvoicePaid --domain invoice"
    )]
    Detail(ArtifactArgs),

    /// Print the source of an artifact's primary file.
    #[command(
        about = "Print artifact source",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen source policy Refund --domain invoice"
    )]
    Source(ArtifactArgs),

    /// Rename a DDD component.
    #[command(
        visible_alias = "mv",
        about = "Rename a component",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen rename event InvoicePaid InvoiceSettled --domain invoice\n\
            \x20 soliton-gen rename spec Overdue LongOverdue --domain invoice --force"
    )]
    Rename(RenameArgs),

    /// Delete an artifact and its registrations.
    #[command(
        visible_alias = "rm",
        about = "Delete an artifact",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen delete domain Invoice\n\
            \x20 soliton-gen delete event-handler InvoicePaid --domain invoice --yes"
    )]
    Delete(DeleteArgs),

    /// Classify a service name without generating anything.
    #[command(
        about = "Detect the type of a service",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen detect InvoicesService"
    )]
    Detect(DetectArgs),

    /// Show the resolved project layout.
    #[command(about = "Show the project layout")]
    Layout,

    /// List the supported field types.
    #[command(about = "List supported field types")]
    FieldTypes,

    /// Run the project's migration entry point.
    #[command(
        about = "Run database migrations",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen migrate\n\
            \x20 soliton-gen migrate --tidy --timeout 600"
    )]
    Migrate(MigrateArgs),

    /// Refresh the project's Go module dependencies.
    #[command(
        about = "Run 'go mod tidy' without migrating",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen tidy\n\
            \x20 soliton-gen tidy --timeout 120"
    )]
    Tidy(TidyArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen completions bash > ~/.local/share/bash-completion/completions/soliton-gen\n\
            \x20 soliton-gen completions zsh  > ~/.zfunc/_soliton-gen\n\
            \x20 soliton-gen completions fish > ~/.config/fish/completions/soliton-gen.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the soliton-gen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen config init\n\
            \x20 soliton-gen config get project.module_prefix\n\
            \x20 soliton-gen config set generation.soft_delete true\n\
            \x20 soliton-gen config list"
    )]
    Config(ConfigCommands),
}

// ── shared write flags ────────────────────────────────────────────────────────

/// Flags shared by every command that writes generated files.
#[derive(Debug, Clone, Copy, Args)]
pub struct WriteArgs {
    /// Compute the plan and print it without writing.
    #[arg(long = "preview", help = "Show what would be written without writing")]
    pub preview: bool,

    /// Preview with a unified diff of every file that would be overwritten.
    #[arg(long = "diff", help = "Preview with diffs of overwritten files")]
    pub diff: bool,

    /// Overwrite files that already exist.
    #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
    pub force: bool,
}

impl WriteArgs {
    /// `--diff` implies `--preview`.
    pub fn is_preview(&self) -> bool {
        self.preview || self.diff
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `soliton-gen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project directory name.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Parent directory of the new project.
    #[arg(
        long = "dir",
        value_name = "DIR",
        help = "Parent directory (default: current directory)"
    )]
    pub dir: Option<PathBuf>,

    /// Go module path.
    #[arg(
        short = 'm',
        long = "module",
        value_name = "PATH",
        help = "Go module path (default: <module_prefix>/<name>)"
    )]
    pub module: Option<String>,

    #[arg(long = "go-version", value_name = "VERSION", help = "Go version for go.mod")]
    pub go_version: Option<String>,

    #[arg(
        long = "framework-version",
        value_name = "VERSION",
        help = "Framework version to require"
    )]
    pub framework_version: Option<String>,

    /// Local checkout of the framework used in a `replace` directive.
    #[arg(
        long = "framework-replace",
        value_name = "PATH",
        help = "Replace the framework with a local path"
    )]
    pub framework_replace: Option<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

// ── domain ────────────────────────────────────────────────────────────────────

/// Arguments for `soliton-gen domain`.
#[derive(Debug, Args)]
pub struct DomainArgs {
    /// Entity name, e.g. `Invoice`.
    #[arg(value_name = "NAME", help = "Domain entity name")]
    pub name: String,

    /// Compact field list: `name[:type]`, comma separated.
    #[arg(
        long = "fields",
        value_name = "FIELDS",
        help = "Fields, e.g. 'amount:decimal,status:enum(open|paid)'"
    )]
    pub fields: Option<String>,

    #[arg(long = "table", value_name = "TABLE", help = "Database table name")]
    pub table: Option<String>,

    #[arg(long = "route", value_name = "PATH", help = "HTTP route base")]
    pub route: Option<String>,

    #[arg(long = "soft-delete", help = "Add a soft-delete column")]
    pub soft_delete: bool,

    /// Register the domain in `cmd/main.go`.
    #[arg(long = "wire", help = "Wire the domain into cmd/main.go")]
    pub wire: bool,

    #[command(flatten)]
    pub write: WriteArgs,
}

// ── service ───────────────────────────────────────────────────────────────────

/// Arguments for `soliton-gen service`.
#[derive(Debug, Args)]
pub struct ServiceArgs {
    /// Service name; `Service` is appended when missing.
    #[arg(value_name = "NAME", help = "Service name")]
    pub name: String,

    #[arg(
        long = "methods",
        value_name = "METHODS",
        value_delimiter = ',',
        help = "Method names, comma separated"
    )]
    pub methods: Vec<String>,

    #[arg(long = "remark", value_name = "TEXT", help = "Service remark")]
    pub remark: Option<String>,

    /// Override the detected service type.
    #[arg(
        long = "type",
        value_name = "TYPE",
        value_enum,
        help = "Service type (default: detected)"
    )]
    pub service_type: Option<ServiceKindArg>,

    /// Override whether the domain's DTOs are reused.
    #[arg(long = "reuse-dto", value_name = "BOOL", help = "Reuse the domain DTOs")]
    pub reuse_dto: Option<bool>,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Service type as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceKindArg {
    /// Bound to one domain.
    Domain,
    /// Spans several domains.
    CrossDomain,
}

impl From<ServiceKindArg> for ServiceType {
    fn from(arg: ServiceKindArg) -> Self {
        match arg {
            ServiceKindArg::Domain => ServiceType::DomainService,
            ServiceKindArg::CrossDomain => ServiceType::CrossDomainService,
        }
    }
}

// ── components ────────────────────────────────────────────────────────────────

/// Arguments for `soliton-gen value-object`.
#[derive(Debug, Args)]
pub struct ValueObjectArgs {
    #[arg(value_name = "DOMAIN", help = "Owning domain")]
    pub domain: String,

    #[arg(value_name = "NAME", help = "Value object name")]
    pub name: String,

    #[arg(long = "fields", value_name = "FIELDS", help = "Fields, e.g. 'amount:decimal,currency'")]
    pub fields: Option<String>,

    #[arg(long = "remark", value_name = "TEXT", help = "Remark comment")]
    pub remark: Option<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for `soliton-gen spec` and `soliton-gen policy`.
#[derive(Debug, Args)]
pub struct RuleArgs {
    #[arg(value_name = "DOMAIN", help = "Owning domain")]
    pub domain: String,

    #[arg(value_name = "NAME", help = "Rule name")]
    pub name: String,

    /// Type the rule inspects.
    #[arg(long = "target", value_name = "TYPE", help = "Target type (default: any)")]
    pub target: Option<String>,

    #[arg(long = "remark", value_name = "TEXT", help = "Remark comment")]
    pub remark: Option<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for `soliton-gen event`.
#[derive(Debug, Args)]
pub struct EventArgs {
    #[arg(value_name = "DOMAIN", help = "Owning domain")]
    pub domain: String,

    #[arg(value_name = "NAME", help = "Event name")]
    pub name: String,

    #[arg(long = "fields", value_name = "FIELDS", help = "Payload fields")]
    pub fields: Option<String>,

    #[arg(long = "topic", value_name = "TOPIC", help = "Message topic")]
    pub topic: Option<String>,

    #[arg(long = "remark", value_name = "TEXT", help = "Remark comment")]
    pub remark: Option<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Arguments for `soliton-gen event-handler`.
#[derive(Debug, Args)]
pub struct EventHandlerArgs {
    #[arg(value_name = "DOMAIN", help = "Owning domain")]
    pub domain: String,

    #[arg(value_name = "EVENT", help = "Event the handler consumes")]
    pub event: String,

    /// Topic to subscribe to; read from the event file when omitted.
    #[arg(long = "topic", value_name = "TOPIC", help = "Topic (default: the event's)")]
    pub topic: Option<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

// ── registry ──────────────────────────────────────────────────────────────────

/// Arguments for `soliton-gen list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Restrict the listing to one domain.
    #[arg(short = 'd', long = "domain", value_name = "DOMAIN", help = "Filter by domain")]
    pub domain: Option<String>,
}

/// Identifies one artifact: kind, name and, for components, the domain.
#[derive(Debug, Args)]
pub struct ArtifactArgs {
    #[arg(
        value_name = "KIND",
        value_parser = parse_kind,
        help = "domain, service, value-object, spec, policy, event or event-handler"
    )]
    pub kind: ArtifactKind,

    #[arg(value_name = "NAME", help = "Artifact name")]
    pub name: String,

    /// Required for components.
    #[arg(short = 'd', long = "domain", value_name = "DOMAIN", help = "Owning domain")]
    pub domain: Option<String>,
}

/// Arguments for `soliton-gen rename`.
#[derive(Debug, Args)]
pub struct RenameArgs {
    #[command(flatten)]
    pub artifact: ArtifactArgs,

    #[arg(value_name = "NEW_NAME", help = "New name")]
    pub new_name: String,

    /// Replace a component already using the new name.
    #[arg(short = 'f', long = "force", help = "Replace an existing component")]
    pub force: bool,
}

/// Arguments for `soliton-gen delete`.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub artifact: ArtifactArgs,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Delete without asking")]
    pub yes: bool,
}

/// Arguments for `soliton-gen detect`.
#[derive(Debug, Args)]
pub struct DetectArgs {
    #[arg(value_name = "NAME", help = "Service name to classify")]
    pub name: String,
}

// ── migrate ───────────────────────────────────────────────────────────────────

/// Arguments for `soliton-gen migrate`.
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Run `go mod tidy` first.
    #[arg(long = "tidy", help = "Run 'go mod tidy' before migrating")]
    pub tidy: bool,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help = "Timeout in seconds (default 300, max 1800)"
    )]
    pub timeout: Option<u64>,
}

/// Arguments for `soliton-gen tidy`.
#[derive(Debug, Args)]
pub struct TidyArgs {
    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help = "Timeout in seconds (default 300, max 1800)"
    )]
    pub timeout: Option<u64>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `soliton-gen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `soliton-gen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generation.force`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing config file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── value parsers ─────────────────────────────────────────────────────────────

fn parse_kind(value: &str) -> Result<ArtifactKind, String> {
    value.parse::<ArtifactKind>().map_err(|e| e.to_string())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_domain_command() {
        let cli = Cli::parse_from([
            "soliton-gen",
            "domain",
            "Invoice",
            "--fields",
            "amount:decimal",
            "--wire",
            "--diff",
        ]);
        let Commands::Domain(args) = cli.command else {
            panic!("expected Domain command");
        };
        assert_eq!(args.name, "Invoice");
        assert!(args.wire);
        assert!(args.write.is_preview());
        assert!(!args.write.force);
    }

    #[test]
    fn kind_accepts_short_forms() {
        let cli = Cli::parse_from(["soliton-gen", "detail", "vo", "Money", "-d", "invoice"]);
        let Commands::Detail(args) = cli.command else {
            panic!("expected Detail command");
        };
        assert_eq!(args.kind, ArtifactKind::ValueObject);
        assert_eq!(args.domain.as_deref(), Some("invoice"));

        let cli = Cli::parse_from(["soliton-gen", "rm", "event-handler", "Paid", "-d", "x", "-y"]);
        assert!(matches!(cli.command, Commands::Delete(DeleteArgs { yes: true, .. })));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = Cli::try_parse_from(["soliton-gen", "detail", "widget", "X"]);
        assert!(result.is_err());
    }

    #[test]
    fn service_methods_split_on_commas() {
        let cli = Cli::parse_from([
            "soliton-gen",
            "service",
            "Reporting",
            "--methods",
            "monthly_totals,top_customers",
            "--type",
            "cross-domain",
        ]);
        let Commands::Service(args) = cli.command else {
            panic!("expected Service command");
        };
        assert_eq!(args.methods, vec!["monthly_totals", "top_customers"]);
        assert_eq!(
            args.service_type.map(ServiceType::from),
            Some(ServiceType::CrossDomainService)
        );
    }

    #[test]
    fn project_flag_is_global() {
        let cli = Cli::parse_from(["soliton-gen", "list", "-C", "/work/shop"]);
        assert_eq!(cli.global.project, Some(PathBuf::from("/work/shop")));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["soliton-gen", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
