//! Mutation Executor - applies plans, renames and deletes artifacts.
//!
//! Plans are written file by file with per-file error reporting. Rename and
//! delete go through a staged [`Transaction`] instead:
//!
//! ```text
//!   stage    content ──► .<name>.<token>.tmp          (nothing visible yet)
//!   backup   <name>  ──► .<name>.<token>.bak          (every touched target)
//!   commit   .tmp    ──► <name>
//!   cleanup  .bak removed
//!
//!   any failure ──► committed targets removed, .bak renamed back, .tmp dropped
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::application::ApplicationError;
use crate::application::ports::Filesystem;
use crate::application::services::registry::{
    ArtifactRegistry, component_type, entity_struct, handler_path, repository_path,
};
use crate::domain::artifact::{ArtifactId, ArtifactKind, ComponentName};
use crate::domain::config::ServiceType;
use crate::domain::error::DomainError;
use crate::domain::generation::{MutationOutcome, Plan};
use crate::domain::identifier::Identifier;
use crate::domain::layout::{APP_MODULE_FILE, LayoutRoots};
use crate::domain::wiring;
use crate::error::SolitonResult;

/// Files whose presence marks an application package as domain-generated.
const DOMAIN_APP_FILES: [&str; 2] = ["commands.go", "queries.go"];

pub struct MutationExecutor {
    filesystem: Arc<dyn Filesystem>,
    registry: ArtifactRegistry,
}

impl MutationExecutor {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            registry: ArtifactRegistry::new(filesystem.clone()),
            filesystem,
        }
    }

    // -------------------------------------------------------------------------
    // Plans
    // -------------------------------------------------------------------------

    /// Write every non-skipped file of `plan`. Returns `"<path>: <reason>"`
    /// for each failure; later files are still attempted.
    #[instrument(skip_all, fields(files = plan.files.len()))]
    pub fn apply(&self, plan: &Plan) -> Vec<String> {
        let mut errors = Vec::new();

        for dir in &plan.directories {
            if let Err(e) = self.filesystem.create_dir_all(dir) {
                errors.push(format!("{}: {e}", dir.display()));
            }
        }

        for file in plan.writes() {
            let written = match file.path.parent() {
                Some(parent) => self.filesystem.create_dir_all(parent),
                None => Ok(()),
            }
            .and_then(|()| self.filesystem.write_file(&file.path, &file.content));

            match written {
                Ok(()) => debug!(path = %file.relative, status = %file.status, "file written"),
                Err(e) => {
                    warn!(path = %file.relative, error = %e, "write failed");
                    errors.push(format!("{}: {e}", file.relative));
                }
            }
        }

        info!(errors = errors.len(), "plan applied");
        errors
    }

    // -------------------------------------------------------------------------
    // Rename
    // -------------------------------------------------------------------------

    /// Rename a component and rewrite every identifier that refers to it.
    /// Either every touched file changes or none does.
    #[instrument(skip_all, fields(artifact = %id, new_name = %new_name))]
    pub fn rename(
        &self,
        roots: &LayoutRoots,
        id: &ArtifactId,
        new_name: &str,
        force: bool,
    ) -> SolitonResult<MutationOutcome> {
        if !id.kind.is_component() {
            return Err(DomainError::UnsupportedOperation {
                operation: "rename",
                kind: id.kind.label().to_string(),
            }
            .into());
        }

        let package = id.domain_package()?;
        let old_path = self.registry.locate(roots, id)?;
        let old_content = self.filesystem.read_to_string(&old_path)?;
        let old_type = component_type(id.kind, &old_content, &old_path);

        let new_id = Identifier::new(new_name)?;
        let target = ComponentName::new(id.kind, &new_id);
        let new_path = target.path(roots, id.kind, &package);
        if new_path == old_path {
            return Err(DomainError::InvalidRename {
                kind: id.kind.label().to_string(),
                name: id.name.clone(),
                reason: format!("'{new_name}' maps to the same file {}", roots.relative(&old_path)),
            }
            .into());
        }

        let mut tx = Transaction::default();
        if let Some(existing) = self
            .registry
            .locate_component(roots, &package, id.kind, &new_id)?
            .filter(|existing| *existing != old_path)
        {
            if !force {
                return Err(DomainError::DuplicateArtifact {
                    kind: id.kind.label().to_string(),
                    name: target.type_name.clone(),
                    existing: roots.relative(&existing),
                }
                .into());
            }
            if existing != new_path {
                tx.remove(existing);
            }
        }

        let new_type = target.type_name.clone();
        let mut renames = vec![
            (old_type.clone(), new_type.clone()),
            (format!("New{old_type}"), format!("New{new_type}")),
        ];
        if id.kind == ArtifactKind::EventHandler {
            renames.push((format!("Register{old_type}"), format!("Register{new_type}")));
        }

        tx.write(new_path, wiring::rewrite_identifiers(&old_content, &renames));
        tx.remove(old_path);

        let app_dir = roots.app_package_dir(&package);
        match id.kind {
            ArtifactKind::Event => {
                for path in self.filesystem.list_dir(&app_dir)? {
                    let is_handler = path.file_name().is_some_and(|n| {
                        ArtifactKind::EventHandler
                            .match_file(&n.to_string_lossy())
                            .is_some()
                    });
                    if is_handler {
                        self.rewrite_into(&mut tx, &path, &renames)?;
                    }
                }
            }
            ArtifactKind::EventHandler => {
                self.rewrite_into(&mut tx, &app_dir.join(APP_MODULE_FILE), &renames)?;
            }
            _ => {}
        }

        let files = tx.touched(roots);
        tx.commit(self.filesystem.as_ref())?;

        info!(from = %old_type, to = %new_type, files = files.len(), "artifact renamed");
        Ok(MutationOutcome::ok(
            format!("Renamed {} {old_type} to {new_type}", id.kind),
            files,
        ))
    }

    fn rewrite_into(
        &self,
        tx: &mut Transaction,
        path: &Path,
        renames: &[(String, String)],
    ) -> SolitonResult<()> {
        if !self.filesystem.is_file(path) {
            return Ok(());
        }
        let content = self.filesystem.read_to_string(path)?;
        let rewritten = wiring::rewrite_identifiers(&content, renames);
        if rewritten != content {
            tx.write(path.to_path_buf(), rewritten);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Delete
    // -------------------------------------------------------------------------

    /// Remove an artifact's files and the registrations pointing at it.
    /// Dependents are left alone.
    #[instrument(skip_all, fields(artifact = %id))]
    pub fn delete(&self, roots: &LayoutRoots, id: &ArtifactId) -> SolitonResult<MutationOutcome> {
        let mut tx = Transaction::default();
        let mut emptied = Vec::new();

        match id.kind {
            ArtifactKind::Domain => self.stage_domain_delete(roots, id, &mut tx, &mut emptied)?,
            ArtifactKind::Service => self.stage_service_delete(roots, id, &mut tx, &mut emptied)?,
            _ => self.stage_component_delete(roots, id, &mut tx)?,
        }

        let files = tx.touched(roots);
        tx.commit(self.filesystem.as_ref())?;

        for dir in emptied {
            if self.filesystem.is_dir(&dir) {
                if let Err(e) = self.filesystem.remove_dir_all(&dir) {
                    warn!(dir = %dir.display(), error = %e, "could not remove directory");
                }
            }
        }

        info!(files = files.len(), "artifact deleted");
        Ok(MutationOutcome::ok(format!("Deleted {id}"), files))
    }

    fn stage_domain_delete(
        &self,
        roots: &LayoutRoots,
        id: &ArtifactId,
        tx: &mut Transaction,
        emptied: &mut Vec<PathBuf>,
    ) -> SolitonResult<()> {
        let package = id.domain_package()?;
        let entity_file = self.registry.locate(roots, id)?;
        let entity = match entity_struct(&self.filesystem.read_to_string(&entity_file)?) {
            Some(s) => s.name,
            None => Identifier::new(&id.name)?.pascal(),
        };

        for dir in [roots.domain_package_dir(&package), roots.app_package_dir(&package)] {
            for file in self.filesystem.walk_files(&dir)? {
                tx.remove(file);
            }
            emptied.push(dir);
        }
        for file in [repository_path(roots, &package), handler_path(roots, &package)] {
            if self.filesystem.is_file(&file) {
                tx.remove(file);
            }
        }

        let main = roots.main_file();
        if self.filesystem.is_file(&main) {
            let content = self.filesystem.read_to_string(&main)?;
            if let Some(updated) =
                wiring::unwire_domain(&content, &roots.module_path, &package, &entity)
            {
                tx.write(main, updated);
            }
        }
        Ok(())
    }

    fn stage_service_delete(
        &self,
        roots: &LayoutRoots,
        id: &ArtifactId,
        tx: &mut Transaction,
        emptied: &mut Vec<PathBuf>,
    ) -> SolitonResult<()> {
        let summary = self
            .registry
            .locate_service(roots, &id.name)?
            .ok_or_else(|| DomainError::ArtifactNotFound {
                kind: id.kind.label().to_string(),
                name: id.name.clone(),
            })?;
        let file = roots.module_dir.join(&summary.file);
        let dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| roots.app_dir.clone());

        match summary.service_type {
            ServiceType::DomainService => {
                let owns_domain_code = DOMAIN_APP_FILES
                    .iter()
                    .any(|name| self.filesystem.is_file(&dir.join(name)));
                if !owns_domain_code {
                    for file in self.filesystem.walk_files(&dir)? {
                        tx.remove(file);
                    }
                    emptied.push(dir);
                    return Ok(());
                }
                tx.remove(file);
            }
            ServiceType::CrossDomainService => {
                let dto = file
                    .to_string_lossy()
                    .strip_suffix("_service.go")
                    .map(|stem| PathBuf::from(format!("{stem}_dto.go")));
                tx.remove(file);
                if let Some(dto) = dto.filter(|dto| self.filesystem.is_file(dto)) {
                    tx.remove(dto);
                }
            }
        }

        let module = dir.join(APP_MODULE_FILE);
        if self.filesystem.is_file(&module) {
            let content = self.filesystem.read_to_string(&module)?;
            if let Some(updated) = wiring::unregister_service(&content, &summary.name) {
                tx.write(module, updated);
            }
        }
        Ok(())
    }

    fn stage_component_delete(
        &self,
        roots: &LayoutRoots,
        id: &ArtifactId,
        tx: &mut Transaction,
    ) -> SolitonResult<()> {
        let path = self.registry.locate(roots, id)?;

        if id.kind == ArtifactKind::EventHandler {
            let handler = component_type(id.kind, &self.filesystem.read_to_string(&path)?, &path);
            let module = roots
                .app_package_dir(&id.domain_package()?)
                .join(APP_MODULE_FILE);
            if self.filesystem.is_file(&module) {
                let content = self.filesystem.read_to_string(&module)?;
                if let Some(updated) = wiring::unregister_event_handler(&content, &handler) {
                    tx.write(module, updated);
                }
            }
        }

        tx.remove(path);
        Ok(())
    }
}

// ============================================================================
// Staged Transaction
// ============================================================================

/// A set of whole-file writes and removals committed all-or-nothing.
#[derive(Debug, Default)]
struct Transaction {
    writes: Vec<(PathBuf, String)>,
    removals: Vec<PathBuf>,
}

impl Transaction {
    fn write(&mut self, path: PathBuf, content: String) {
        self.writes.retain(|(p, _)| *p != path);
        self.removals.retain(|p| *p != path);
        self.writes.push((path, content));
    }

    fn remove(&mut self, path: PathBuf) {
        if !self.removals.contains(&path) && !self.writes.iter().any(|(p, _)| *p == path) {
            self.removals.push(path);
        }
    }

    /// Every target path, project-relative and sorted.
    fn touched(&self, roots: &LayoutRoots) -> Vec<String> {
        self.targets()
            .map(|p| roots.relative(p))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn targets(&self) -> impl Iterator<Item = &PathBuf> {
        self.writes.iter().map(|(p, _)| p).chain(self.removals.iter())
    }

    fn commit(&self, fs: &dyn Filesystem) -> SolitonResult<()> {
        let token = Uuid::new_v4().simple().to_string();

        // 1. Stage new content beside each target.
        let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(self.writes.len());
        for (target, content) in &self.writes {
            let tmp = sibling(target, &token, "tmp");
            let result = match target.parent() {
                Some(parent) => fs.create_dir_all(parent),
                None => Ok(()),
            }
            .and_then(|()| fs.write_file(&tmp, content));

            if let Err(e) = result {
                discard(fs, &staged);
                return Err(write_failure(target, e));
            }
            staged.push((tmp, target.as_path()));
        }

        // 2. Move every existing target out of the way.
        let mut backups: Vec<(PathBuf, &Path)> = Vec::new();
        for target in self.targets() {
            if !fs.exists(target) {
                continue;
            }
            let bak = sibling(target, &token, "bak");
            if let Err(e) = fs.rename(target, &bak) {
                discard(fs, &staged);
                restore(fs, &[], &backups)?;
                return Err(write_failure(target, e));
            }
            backups.push((bak, target.as_path()));
        }

        // 3. Move staged content into place.
        let mut committed: Vec<&Path> = Vec::with_capacity(staged.len());
        for (i, (tmp, target)) in staged.iter().enumerate() {
            if let Err(e) = fs.rename(tmp, target) {
                warn!(path = %target.display(), error = %e, "commit failed, rolling back");
                discard(fs, &staged[i..]);
                restore(fs, &committed, &backups)?;
                return Err(write_failure(target, e));
            }
            committed.push(*target);
        }

        for (bak, _) in &backups {
            if let Err(e) = fs.remove_file(bak) {
                warn!(path = %bak.display(), error = %e, "stale backup left behind");
            }
        }
        debug!(
            writes = self.writes.len(),
            removals = self.removals.len(),
            "transaction committed"
        );
        Ok(())
    }
}

/// `<dir>/.<file name>.<token>.<suffix>`
fn sibling(target: &Path, token: &str, suffix: &str) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{token}.{suffix}"))
}

fn discard(fs: &dyn Filesystem, staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        if fs.exists(tmp) {
            if let Err(e) = fs.remove_file(tmp) {
                warn!(path = %tmp.display(), error = %e, "could not remove staged file");
            }
        }
    }
}

/// Undo a partial commit: drop what was committed, bring back the backups.
fn restore(
    fs: &dyn Filesystem,
    committed: &[&Path],
    backups: &[(PathBuf, &Path)],
) -> SolitonResult<()> {
    for target in committed {
        fs.remove_file(target).map_err(|e| rollback_failure(target, e))?;
    }
    for (bak, target) in backups {
        fs.rename(bak, target).map_err(|e| rollback_failure(target, e))?;
    }
    Ok(())
}

fn write_failure(path: &Path, e: impl ToString) -> crate::error::SolitonError {
    ApplicationError::WriteFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

fn rollback_failure(path: &Path, e: impl ToString) -> crate::error::SolitonError {
    ApplicationError::RollbackFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;

    fn roots() -> LayoutRoots {
        LayoutRoots::new("example.com/shop", "/shop")
    }

    #[test]
    fn domains_and_services_cannot_be_renamed() {
        let executor = MutationExecutor::new(Arc::new(MockFilesystem::new()));
        for kind in [ArtifactKind::Domain, ArtifactKind::Service] {
            let err = executor
                .rename(&roots(), &ArtifactId::new(None, kind, "Order"), "Invoice", false)
                .unwrap_err();
            assert!(matches!(
                err.as_domain(),
                Some(DomainError::UnsupportedOperation { operation: "rename", .. })
            ));
        }
    }

    #[test]
    fn component_rename_requires_domain() {
        let executor = MutationExecutor::new(Arc::new(MockFilesystem::new()));
        let id = ArtifactId::new(None, ArtifactKind::Policy, "Refund");
        let err = executor.rename(&roots(), &id, "Return", false).unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::MissingRequiredField { field: "domain" })
        ));
    }

    #[test]
    fn transaction_tracks_latest_intent() {
        let mut tx = Transaction::default();
        tx.remove(PathBuf::from("/shop/a.go"));
        tx.write(PathBuf::from("/shop/a.go"), "x".into());
        tx.remove(PathBuf::from("/shop/a.go"));
        tx.write(PathBuf::from("/shop/b.go"), "y".into());
        assert_eq!(tx.writes.len(), 2);
        assert!(tx.removals.is_empty());
        assert_eq!(tx.touched(&roots()), vec!["a.go", "b.go"]);
    }

    #[test]
    fn failed_staging_writes_nothing_visible() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| {
            Err(ApplicationError::filesystem(p, "disk full").into())
        });
        fs.expect_exists().return_const(false);
        fs.expect_rename().never();

        let mut tx = Transaction::default();
        tx.write(PathBuf::from("/shop/a.go"), "x".into());
        let err = tx.commit(&fs).unwrap_err();
        assert!(err.to_string().contains("Write failed for /shop/a.go"));
    }

    #[test]
    fn staged_names_are_hidden_siblings() {
        let tmp = sibling(Path::new("/shop/internal/domain/order/policy_refund.go"), "abc", "tmp");
        assert_eq!(
            tmp,
            PathBuf::from("/shop/internal/domain/order/.policy_refund.go.abc.tmp")
        );
        assert_eq!(ArtifactKind::Policy.match_file(".policy_refund.go.abc.tmp"), None);
    }
}
