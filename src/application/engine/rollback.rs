//! Rollback to the previous release

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::domain::value_objects::HookKind;
use crate::error::{DeployError, DeployResult};

use super::{DeploymentEngine, RollbackOutcome};

impl DeploymentEngine {
    /// Make the previous release live again and delete the current one.
    ///
    /// Missing arguments are resolved from the release store: `current` from
    /// the symlink, `previous` as the newest release that is not current.
    pub fn rollback(
        &self,
        current: Option<&Path>,
        previous: Option<&Path>,
    ) -> DeployResult<RollbackOutcome> {
        let app = self.app.name.as_str();
        let (current, previous) = self.rollback_targets(current, previous).map_err(|e| {
            error!(app, error = %e, "cannot roll back");
            e
        })?;
        info!(
            app,
            current = %current.display(),
            previous = %previous.display(),
            "rolling back"
        );

        if let Err(e) = self.run_hook(HookKind::PreRollback, &previous) {
            error!(app, error = %e, "pre_rollback hook failed, aborting rollback");
            return Ok(RollbackOutcome::Aborted { error: e });
        }

        self.store.swap_symlink(&previous).map_err(|e| {
            error!(app, error = %e, "symlink swap failed during rollback");
            e
        })?;
        self.store.delete_tree(&current).map_err(|e| {
            error!(app, release = %current.display(), error = %e, "failed to remove rolled back release");
            e
        })?;
        debug!(app, release = %current.display(), "removed rolled back release");

        if let Err(e) = self.run_hook(HookKind::PostRollback, &previous) {
            error!(
                app,
                error = %e,
                "post_rollback hook failed, manual intervention required"
            );
            return Ok(RollbackOutcome::PostRollbackFailed {
                restored: previous,
                removed: current,
                error: e,
            });
        }

        let pruned = self.store.prune(&previous, self.app.revisions)?;
        info!(
            app,
            notice = true,
            release = %previous.display(),
            "rollback complete"
        );
        Ok(RollbackOutcome::Completed {
            restored: previous,
            removed: current,
            pruned,
        })
    }

    fn rollback_targets(
        &self,
        current: Option<&Path>,
        previous: Option<&Path>,
    ) -> DeployResult<(PathBuf, PathBuf)> {
        let nothing = |reason: String| DeployError::NothingToRollBack {
            app: self.app.name.clone(),
            reason,
        };

        if !self.store.base_exists() {
            return Err(nothing(format!(
                "base directory {} does not exist",
                self.store.base_path().display()
            )));
        }

        let current = match current {
            Some(path) => path.to_path_buf(),
            None => self
                .store
                .resolved_current_release_dir()
                .ok_or_else(|| nothing("no current release".to_string()))?,
        };
        let previous = match previous {
            Some(path) => path.to_path_buf(),
            None => self
                .store
                .previous_release_dir()
                .ok_or_else(|| nothing("no previous release found".to_string()))?,
        };

        if !previous.is_dir() {
            return Err(nothing(format!(
                "previous release {} does not exist",
                previous.display()
            )));
        }
        if previous == current {
            return Err(nothing("previous release is the current release".to_string()));
        }

        Ok((current, previous))
    }
}
