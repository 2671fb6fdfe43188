//! Contract with the external migration tool.
//!
//! The core never runs the Go toolchain itself; it hands a
//! [`MigrationRequest`] to a runner port and reads back a
//! [`MigrationResult`]. `success` and `exit_code` are reported
//! independently since a run can finish with warnings.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;
pub const MAX_TIMEOUT_SECONDS: u64 = 1800;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRequest {
    pub project_path: PathBuf,
    #[serde(default)]
    pub auto_tidy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl MigrationRequest {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            auto_tidy: false,
            timeout_seconds: None,
        }
    }

    pub fn with_auto_tidy(mut self, auto_tidy: bool) -> Self {
        self.auto_tidy = auto_tidy;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Zero or missing means the default; anything above the cap is clamped.
    pub fn effective_timeout(&self) -> u64 {
        match self.timeout_seconds {
            None | Some(0) => DEFAULT_TIMEOUT_SECONDS,
            Some(secs) => secs.min(MAX_TIMEOUT_SECONDS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the time-ordered log stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationLog {
    /// RFC 3339 timestamp.
    pub time: String,
    pub level: LogLevel,
    /// `tidy`, `migrate` or `setup`.
    pub step: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub logs: Vec<MigrationLog>,
    pub duration_ms: u64,
    pub exit_code: i32,
    pub command: String,
    pub started_at: String,
    pub finished_at: String,
}

impl MigrationResult {
    pub fn errors(&self) -> impl Iterator<Item = &MigrationLog> {
        self.logs.iter().filter(|l| l.level == LogLevel::Error)
    }
}
