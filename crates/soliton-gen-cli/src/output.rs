//! Output management and formatting.
//!
//! Every command writes through [`OutputManager`]. In JSON mode commands hand
//! a serializable value to [`OutputManager::emit`] and human rendering is
//! skipped entirely.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use soliton_gen_core::domain::FileStatus;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::CliResult;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // The flag wins; `auto` falls back to the configured format.
        let requested = match args.output_format {
            OutputFormat::Auto => {
                OutputFormat::from_config(&config.output.format).unwrap_or(OutputFormat::Auto)
            }
            other => other,
        };

        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Dimmed secondary line.
    pub fn detail(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.dimmed().to_string()
        };
        self.term.write_line(&line)
    }

    /// One planned file: padded status then project-relative path.
    pub fn file_status(&self, status: FileStatus, path: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let label = format!("{:<11}", status.as_str());
        let label = if self.no_color {
            label
        } else {
            match status {
                FileStatus::Created => label.green().to_string(),
                FileStatus::Overwritten => label.yellow().to_string(),
                FileStatus::Skipped => label.dimmed().to_string(),
            }
        };
        self.term.write_line(&format!("  {label} {path}"))
    }

    /// Write text exactly as given, even in quiet mode. Used for payloads
    /// the user asked for explicitly (source files, completions).
    pub fn raw(&self, text: &str) -> io::Result<()> {
        self.term.write_str(text)?;
        if !text.ends_with('\n') {
            self.term.write_line("")?;
        }
        Ok(())
    }

    /// Print `value` as JSON in JSON mode, otherwise run the human renderer.
    pub fn emit<T, F>(&self, value: &T, human: F) -> CliResult<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&Self) -> CliResult<()>,
    {
        if self.is_json() {
            let json = serde_json::to_string_pretty(value)?;
            self.term.write_line(&json)?;
            Ok(())
        } else {
            human(self)
        }
    }

    /// Unified diff between the current and the planned content of a file.
    pub fn diff(&self, path: &str, old: &str, new: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_str(&render_diff(path, old, new, !self.no_color))
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

/// Render a unified diff with three lines of context.
pub fn render_diff(path: &str, old: &str, new: &str, color: bool) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();

    let headers = [format!("--- a/{path}"), format!("+++ b/{path}")];
    for header in headers {
        if color {
            out.push_str(&header.bold().to_string());
        } else {
            out.push_str(&header);
        }
        out.push('\n');
    }

    for group in diff.grouped_ops(3) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_range = first.old_range().start..last.old_range().end;
        let new_range = first.new_range().start..last.new_range().end;
        let hunk = format!(
            "@@ -{},{} +{},{} @@",
            old_range.start + 1,
            old_range.len(),
            new_range.start + 1,
            new_range.len()
        );
        if color {
            out.push_str(&hunk.cyan().to_string());
        } else {
            out.push_str(&hunk);
        }
        out.push('\n');

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                let line = format!("{sign}{}", change.value().trim_end_matches('\n'));
                let line = match (color, change.tag()) {
                    (false, _) | (true, ChangeTag::Equal) => line,
                    (true, ChangeTag::Delete) => line.red().to_string(),
                    (true, ChangeTag::Insert) => line.green().to_string(),
                };
                out.push_str(&line);
                out.push('\n');
            }
        }
    }

    out
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::AppConfig;

    fn args(quiet: bool, no_color: bool, output_format: OutputFormat) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format,
            project: None,
            log_file: None,
        }
    }

    fn make_manager(quiet: bool, no_color: bool) -> OutputManager {
        OutputManager::new(&args(quiet, no_color, OutputFormat::Human), &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true);
        assert!(out.print("hello").is_ok());
    }

    #[test]
    fn error_not_suppressed_in_quiet_mode() {
        let out = make_manager(true, true);
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn no_color_flag_reported() {
        assert!(make_manager(false, false).supports_color());
        assert!(!make_manager(false, true).supports_color());
    }

    #[test]
    fn plain_format_disables_color() {
        let out = OutputManager::new(
            &args(false, false, OutputFormat::Plain),
            &AppConfig::default(),
        );
        assert_eq!(out.format(), OutputFormat::Plain);
        assert!(!out.supports_color());
    }

    #[test]
    fn configured_format_applies_when_flag_is_auto() {
        let mut config = AppConfig::default();
        config.output.format = "json".into();
        let out = OutputManager::new(&args(false, false, OutputFormat::Auto), &config);
        assert!(out.is_json());

        let out = OutputManager::new(&args(false, false, OutputFormat::Plain), &config);
        assert!(!out.is_json());
    }

    #[test]
    fn diff_marks_changed_lines() {
        let old = "package x\n\ntype A struct{}\n";
        let new = "package x\n\ntype B struct{}\n";
        let rendered = render_diff("x.go", old, new, false);
        assert!(rendered.starts_with("--- a/x.go\n+++ b/x.go\n"));
        assert!(rendered.contains("@@ -1,3 +1,3 @@"));
        assert!(rendered.contains("-type A struct{}\n"));
        assert!(rendered.contains("+type B struct{}\n"));
        assert!(rendered.contains(" package x\n"));
    }

    #[test]
    fn identical_content_has_no_hunks() {
        let rendered = render_diff("x.go", "a\n", "a\n", false);
        assert!(!rendered.contains("@@"));
    }
}
