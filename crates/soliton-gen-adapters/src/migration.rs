//! Migration runner backed by the Go toolchain.
//!
//! ```text
//! [auto_tidy]  go mod tidy            step "tidy"
//!              go run ./cmd/migrate   step "migrate"
//!           or go run ./cmd/migrate.go
//! ```
//!
//! Both steps share one deadline. Output lines are collected into the
//! result as they arrive: stdout at `info`, stderr at `warn`. `GOWORK` is
//! switched off so a surrounding workspace never leaks into the run.
//!
//! A process that outlives its step (`go run` leaves the compiled binary
//! behind as a grandchild) can keep the output pipes open. Readers get a
//! short grace period after the step ends and are detached after that.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use soliton_gen_core::application::ApplicationError;
use soliton_gen_core::application::ports::MigrationRunner;
use soliton_gen_core::domain::{LogLevel, MigrationLog, MigrationRequest, MigrationResult};
use soliton_gen_core::error::SolitonResult;
use tracing::{debug, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const DRAIN_GRACE: Duration = Duration::from_millis(500);
const TIDY_ARGS: [&str; 2] = ["mod", "tidy"];
const TIDY_COMMAND: &str = "go mod tidy";

/// Runs migrations by shelling out to `go`.
#[derive(Debug, Clone)]
pub struct ProcessMigrationRunner {
    go_binary: PathBuf,
}

impl ProcessMigrationRunner {
    pub fn new() -> Self {
        Self {
            go_binary: PathBuf::from("go"),
        }
    }

    /// Use a specific `go` executable instead of the one on `PATH`.
    pub fn with_go_binary(mut self, go_binary: impl Into<PathBuf>) -> Self {
        self.go_binary = go_binary.into();
        self
    }
}

impl Default for ProcessMigrationRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// The migrate entry point of a project, if it has one.
pub fn detect_entry(project: &Path) -> Option<&'static str> {
    if project.join("cmd").join("migrate").is_dir() {
        Some("./cmd/migrate")
    } else if project.join("cmd").join("migrate.go").is_file() {
        Some("./cmd/migrate.go")
    } else {
        None
    }
}

impl MigrationRunner for ProcessMigrationRunner {
    #[instrument(skip_all, fields(project = %request.project_path.display()))]
    fn run(&self, request: &MigrationRequest) -> SolitonResult<MigrationResult> {
        let started = Instant::now();
        let started_at = now();
        let deadline = started + Duration::from_secs(request.effective_timeout());
        let logs = LogSink::default();

        logs.push(LogLevel::Info, "setup", "migration started");
        logs.push(
            LogLevel::Info,
            "setup",
            format!("project: {}", request.project_path.display()),
        );

        if request.auto_tidy {
            logs.push(LogLevel::Info, "tidy", "running go mod tidy");
            let outcome = self.step(&request.project_path, &TIDY_ARGS, "tidy", deadline, &logs);
            match outcome {
                Ok(StepOutcome { exit_code: 0, .. }) => {}
                Ok(outcome) => logs.push(
                    LogLevel::Error,
                    "tidy",
                    format!("go mod tidy failed: {}", outcome.describe()),
                ),
                Err(e) => logs.push(LogLevel::Error, "tidy", format!("go mod tidy failed: {e}")),
            }
        }

        let Some(entry) = detect_entry(&request.project_path) else {
            let message = "migration entry not found: cmd/migrate/main.go or cmd/migrate.go";
            logs.push(LogLevel::Error, "setup", message);
            return Ok(MigrationResult {
                success: false,
                message: Some(message.into()),
                logs: logs.take(),
                duration_ms: elapsed_ms(started),
                exit_code: -1,
                command: String::new(),
                started_at,
                finished_at: now(),
            });
        };

        let command = format!("go run {entry}");
        logs.push(LogLevel::Info, "setup", format!("command: {command}"));

        let outcome = self
            .step(&request.project_path, &["run", entry], "migrate", deadline, &logs)
            .map_err(|e| ApplicationError::MigrationFailed {
                reason: format!("could not start {}: {e}", self.go_binary.display()),
            })?;

        let success = outcome.exit_code == 0 && !outcome.timed_out;
        let message = if success {
            logs.push(LogLevel::Info, "setup", "migration completed");
            "migration completed".to_string()
        } else {
            let message = format!("migration failed: {}", outcome.describe());
            logs.push(LogLevel::Error, "setup", message.clone());
            message
        };

        Ok(MigrationResult {
            success,
            message: Some(message),
            logs: logs.take(),
            duration_ms: elapsed_ms(started),
            exit_code: outcome.exit_code,
            command,
            started_at,
            finished_at: now(),
        })
    }

    #[instrument(skip_all, fields(project = %request.project_path.display()))]
    fn tidy(&self, request: &MigrationRequest) -> SolitonResult<MigrationResult> {
        let started = Instant::now();
        let started_at = now();
        let deadline = started + Duration::from_secs(request.effective_timeout());
        let logs = LogSink::default();

        logs.push(LogLevel::Info, "tidy", "running go mod tidy");
        let outcome = self
            .step(&request.project_path, &TIDY_ARGS, "tidy", deadline, &logs)
            .map_err(|e| ApplicationError::MigrationFailed {
                reason: format!("could not start {}: {e}", self.go_binary.display()),
            })?;

        let success = outcome.exit_code == 0 && !outcome.timed_out;
        let message = if success {
            logs.push(LogLevel::Info, "tidy", "dependencies updated");
            "dependencies updated".to_string()
        } else {
            let message = format!("go mod tidy failed: {}", outcome.describe());
            logs.push(LogLevel::Error, "tidy", message.clone());
            message
        };

        Ok(MigrationResult {
            success,
            message: Some(message),
            logs: logs.take(),
            duration_ms: elapsed_ms(started),
            exit_code: outcome.exit_code,
            command: TIDY_COMMAND.to_string(),
            started_at,
            finished_at: now(),
        })
    }
}

// ============================================================================
// Process plumbing
// ============================================================================

struct StepOutcome {
    exit_code: i32,
    timed_out: bool,
}

impl StepOutcome {
    fn describe(&self) -> String {
        if self.timed_out {
            "command timeout".into()
        } else {
            format!("exit status {}", self.exit_code)
        }
    }
}

impl ProcessMigrationRunner {
    fn step(
        &self,
        dir: &Path,
        args: &[&str],
        step: &'static str,
        deadline: Instant,
        logs: &LogSink,
    ) -> std::io::Result<StepOutcome> {
        debug!(step, ?args, "spawning go");
        let mut child = Command::new(&self.go_binary)
            .args(args)
            .current_dir(dir)
            .env("GOWORK", "off")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let readers = [
            child.stdout.take().map(|out| logs.follow(out, LogLevel::Info, step)),
            child.stderr.take().map(|err| logs.follow(err, LogLevel::Warn, step)),
        ];

        let outcome = wait_until(&mut child, deadline)?;
        drain(readers.into_iter().flatten(), Instant::now() + DRAIN_GRACE, step);
        Ok(outcome)
    }
}

/// Join the output readers, detaching any still blocked at `until`.
fn drain(readers: impl Iterator<Item = thread::JoinHandle<()>>, until: Instant, step: &str) {
    for reader in readers {
        while !reader.is_finished() && Instant::now() < until {
            thread::sleep(POLL_INTERVAL);
        }
        if !reader.is_finished() {
            debug!(step, "output pipe still open, detaching reader");
            continue;
        }
        if reader.join().is_err() {
            warn!(step, "output reader panicked");
        }
    }
}

fn wait_until(child: &mut Child, deadline: Instant) -> std::io::Result<StepOutcome> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(StepOutcome {
                exit_code: status.code().unwrap_or(-1),
                timed_out: false,
            });
        }
        if Instant::now() >= deadline {
            warn!("migration timed out, killing process");
            child.kill()?;
            let status = child.wait()?;
            return Ok(StepOutcome {
                exit_code: status.code().unwrap_or(-1),
                timed_out: true,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Time-ordered log lines shared with the reader threads.
#[derive(Default, Clone)]
struct LogSink {
    lines: Arc<Mutex<Vec<MigrationLog>>>,
}

impl LogSink {
    fn push(&self, level: LogLevel, step: &str, message: impl Into<String>) {
        let entry = MigrationLog {
            time: now(),
            level,
            step: step.to_string(),
            message: message.into(),
        };
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(entry);
        }
    }

    fn follow<R: Read + Send + 'static>(
        &self,
        source: R,
        level: LogLevel,
        step: &'static str,
    ) -> thread::JoinHandle<()> {
        let sink = self.clone();
        thread::spawn(move || {
            for line in BufReader::new(source).lines() {
                match line {
                    Ok(line) if line.trim().is_empty() => {}
                    Ok(line) => sink.push(level, step, line.trim()),
                    Err(e) => {
                        sink.push(LogLevel::Error, step, format!("log scan error: {e}"));
                        break;
                    }
                }
            }
        })
    }

    fn take(&self) -> Vec<MigrationLog> {
        self.lines
            .lock()
            .map(|mut lines| std::mem::take(&mut *lines))
            .unwrap_or_default()
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn entry_prefers_directory() {
        let dir = TempDir::new().unwrap();
        assert_eq!(detect_entry(dir.path()), None);

        std::fs::create_dir_all(dir.path().join("cmd")).unwrap();
        std::fs::write(dir.path().join("cmd/migrate.go"), "package main").unwrap();
        assert_eq!(detect_entry(dir.path()), Some("./cmd/migrate.go"));

        std::fs::create_dir_all(dir.path().join("cmd/migrate")).unwrap();
        assert_eq!(detect_entry(dir.path()), Some("./cmd/migrate"));
    }

    #[test]
    fn missing_entry_is_reported_in_result() {
        let dir = TempDir::new().unwrap();
        let runner = ProcessMigrationRunner::new().with_go_binary("/nonexistent/go");

        let result = runner.run(&MigrationRequest::new(dir.path())).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, -1);
        assert!(result.command.is_empty());
        assert_eq!(result.errors().count(), 1);
        assert!(result.logs.iter().all(|l| l.time.ends_with('Z')));
    }

    #[test]
    fn unstartable_toolchain_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("cmd/migrate")).unwrap();
        let runner = ProcessMigrationRunner::new().with_go_binary("/nonexistent/go");

        let err = runner.run(&MigrationRequest::new(dir.path())).unwrap_err();
        assert!(err.to_string().contains("could not start"));
    }

    #[test]
    fn failed_tidy_is_logged_not_fatal() {
        let dir = TempDir::new().unwrap();
        let runner = ProcessMigrationRunner::new().with_go_binary("/nonexistent/go");

        let result = runner
            .run(&MigrationRequest::new(dir.path()).with_auto_tidy(true))
            .unwrap();
        assert!(
            result
                .errors()
                .any(|l| l.step == "tidy" && l.message.starts_with("go mod tidy failed"))
        );
    }

    #[cfg(unix)]
    fn fake_go(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("go");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn timeout_is_honoured_when_a_grandchild_holds_the_pipes() {
        let project = TempDir::new().unwrap();
        std::fs::create_dir_all(project.path().join("cmd/migrate")).unwrap();
        let bin = TempDir::new().unwrap();
        let go = fake_go(bin.path(), "echo starting\nsleep 8 &\nsleep 8");
        let runner = ProcessMigrationRunner::new().with_go_binary(go);

        let started = Instant::now();
        let result = runner
            .run(&MigrationRequest::new(project.path()).with_timeout(1))
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(4), "took {:?}", started.elapsed());
        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some("migration failed: command timeout"));
    }

    #[cfg(unix)]
    #[test]
    fn tidy_runs_only_mod_tidy() {
        let project = TempDir::new().unwrap();
        std::fs::create_dir_all(project.path().join("cmd/migrate")).unwrap();
        let bin = TempDir::new().unwrap();
        let go = fake_go(bin.path(), "echo \"args: $*\"\necho \"gowork: $GOWORK\"");
        let runner = ProcessMigrationRunner::new().with_go_binary(go);

        let result = runner.tidy(&MigrationRequest::new(project.path())).unwrap();
        assert!(result.success);
        assert_eq!(result.command, "go mod tidy");
        let lines: Vec<&str> = result.logs.iter().map(|l| l.message.as_str()).collect();
        assert!(lines.contains(&"args: mod tidy"));
        assert!(lines.contains(&"gowork: off"));
        assert!(result.logs.iter().all(|l| l.step == "tidy"));
    }

    #[cfg(unix)]
    #[test]
    fn failed_tidy_reports_exit_code() {
        let project = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        let go = fake_go(bin.path(), "echo 'missing go.sum entry' >&2\nexit 1");
        let runner = ProcessMigrationRunner::new().with_go_binary(go);

        let result = runner.tidy(&MigrationRequest::new(project.path())).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(
            result
                .logs
                .iter()
                .any(|l| l.level == LogLevel::Warn && l.message == "missing go.sum entry")
        );
    }
}
