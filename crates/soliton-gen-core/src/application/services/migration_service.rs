//! Migration Service - thin front for the external migration tool.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::ApplicationError;
use crate::application::ports::{Filesystem, MigrationRunner};
use crate::domain::migration::{MigrationRequest, MigrationResult};
use crate::error::SolitonResult;

pub struct MigrationService {
    runner: Arc<dyn MigrationRunner>,
    filesystem: Arc<dyn Filesystem>,
}

impl MigrationService {
    pub fn new(runner: Arc<dyn MigrationRunner>, filesystem: Arc<dyn Filesystem>) -> Self {
        Self { runner, filesystem }
    }

    /// Run the migration for `request.project_path`.
    ///
    /// `success` and `exit_code` of the result are independent: a run can
    /// exit non-zero after logging only warnings.
    #[instrument(skip_all, fields(project = %request.project_path.display()))]
    pub fn run(&self, request: &MigrationRequest) -> SolitonResult<MigrationResult> {
        self.ensure_project(request)?;
        let result = self.runner.run(request)?;
        if result.success {
            info!(duration_ms = result.duration_ms, "migration finished");
        } else {
            warn!(
                exit_code = result.exit_code,
                errors = result.errors().count(),
                "migration failed"
            );
        }
        Ok(result)
    }

    /// Run only the dependency tidy step, without migrating.
    #[instrument(skip_all, fields(project = %request.project_path.display()))]
    pub fn tidy(&self, request: &MigrationRequest) -> SolitonResult<MigrationResult> {
        self.ensure_project(request)?;
        let result = self.runner.tidy(request)?;
        if result.success {
            info!(duration_ms = result.duration_ms, "dependencies tidied");
        } else {
            warn!(exit_code = result.exit_code, "go mod tidy failed");
        }
        Ok(result)
    }

    fn ensure_project(&self, request: &MigrationRequest) -> SolitonResult<()> {
        if self.filesystem.is_dir(&request.project_path) {
            return Ok(());
        }
        Err(ApplicationError::MigrationFailed {
            reason: format!(
                "project directory {} does not exist",
                request.project_path.display()
            ),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockMigrationRunner};
    use crate::domain::migration::{LogLevel, MigrationLog};

    fn result(success: bool, exit_code: i32) -> MigrationResult {
        MigrationResult {
            success,
            message: None,
            logs: vec![MigrationLog {
                time: "2026-01-01T00:00:00Z".into(),
                level: if success { LogLevel::Info } else { LogLevel::Error },
                step: "migrate".into(),
                message: "done".into(),
            }],
            duration_ms: 12,
            exit_code,
            command: "go run ./cmd/migrate".into(),
            started_at: "2026-01-01T00:00:00Z".into(),
            finished_at: "2026-01-01T00:00:01Z".into(),
        }
    }

    #[test]
    fn missing_project_never_reaches_runner() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(false);
        let mut runner = MockMigrationRunner::new();
        runner.expect_run().never();

        let service = MigrationService::new(Arc::new(runner), Arc::new(fs));
        let err = service.run(&MigrationRequest::new("/nowhere")).unwrap_err();
        assert!(err.to_string().contains("/nowhere does not exist"));
    }

    #[test]
    fn tidy_skips_the_migration() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        let mut runner = MockMigrationRunner::new();
        runner.expect_run().never();
        runner.expect_tidy().times(1).returning(|_| {
            let mut tidied = result(true, 0);
            tidied.command = "go mod tidy".into();
            Ok(tidied)
        });

        let service = MigrationService::new(Arc::new(runner), Arc::new(fs));
        let outcome = service.tidy(&MigrationRequest::new("/shop")).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.command, "go mod tidy");
    }

    #[test]
    fn tidy_needs_a_project_directory() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(false);
        let mut runner = MockMigrationRunner::new();
        runner.expect_tidy().never();

        let service = MigrationService::new(Arc::new(runner), Arc::new(fs));
        assert!(service.tidy(&MigrationRequest::new("/nowhere")).is_err());
    }

    #[test]
    fn runner_result_is_passed_through() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().return_const(true);
        let mut runner = MockMigrationRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|request| {
                assert_eq!(request.effective_timeout(), 300);
                Ok(result(false, 1))
            });

        let service = MigrationService::new(Arc::new(runner), Arc::new(fs));
        let outcome = service.run(&MigrationRequest::new("/shop")).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, 1);
        assert_eq!(outcome.errors().count(), 1);
    }
}
