//! Deploy state machine
//!
//! ```text
//! CHECKING -> UP_TO_DATE
//!          -> STAGING -> SYNCING -> PRE_HOOK -> CUTOVER -> POST_HOOK -> CLEANUP -> DONE
//!                                      |                      |
//!                                   ABORTED             ROLLING_BACK -> ROLLED_BACK
//!                                                                      -> ROLLBACK_FAILED
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::domain::value_objects::{HookKind, RevisionId};
use crate::error::{DeployError, DeployResult};

use super::{DeployOutcome, DeployPhase, DeploymentEngine, RollbackOutcome};

impl DeploymentEngine {
    /// Deploy the application if any repository has moved.
    ///
    /// Read-only failures while checking and VCS failures while syncing are
    /// returned as errors; a partially synced release is deleted first. Hook
    /// failures are reported through the outcome.
    pub fn deploy(&self) -> DeployResult<DeployOutcome> {
        let app = self.app.name.as_str();
        info!(app, phase = %DeployPhase::Checking, "checking application");

        let live = self.store.resolved_current_release_dir();
        if let Some(release) = self.up_to_date_release(live.as_deref())? {
            info!(app, phase = %DeployPhase::Checking, "application is current, nothing to update");
            return Ok(DeployOutcome::UpToDate { release });
        }

        // STAGING
        let revision = RevisionId::generate();
        let release = self.store.new_release_dir(&revision);
        info!(app, phase = %DeployPhase::Staging, release = %release.display(), "creating release");
        self.store.create_directory(self.store.base_path())?;
        self.store.create_directory(&release)?;

        // SYNCING
        for source in &self.sources {
            let target = source.checkout_dir(&release);
            if let Err(e) = source.materialize(&target) {
                error!(
                    app,
                    phase = %DeployPhase::Syncing,
                    repository = source.name(),
                    error = %e,
                    "sync failed, removing partial release"
                );
                self.discard_release(&release, DeployPhase::Syncing);
                return Err(e);
            }
        }

        // PRE_HOOK
        if let Err(e) = self.run_hook(HookKind::PreDeploy, &release) {
            error!(app, phase = %DeployPhase::PreHook, error = %e, "pre_deploy hook failed, aborting");
            self.discard_release(&release, DeployPhase::PreHook);
            return Ok(DeployOutcome::Aborted { release, error: e });
        }

        // CUTOVER
        if let Err(e) = self.store.swap_symlink(&release) {
            error!(app, phase = %DeployPhase::Cutover, error = %e, "symlink swap failed");
            return Err(e);
        }
        info!(app, phase = %DeployPhase::Cutover, release = %release.display(), "release is live");

        // POST_HOOK
        if let Err(e) = self.run_hook(HookKind::PostDeploy, &release) {
            error!(app, phase = %DeployPhase::PostHook, error = %e, "post_deploy hook failed");
            return Ok(self.recover_from_post_hook(release, live, e));
        }

        // CLEANUP
        let pruned = self.store.prune(&release, self.app.revisions).map_err(|e| {
            error!(app, phase = %DeployPhase::Cleanup, error = %e, "pruning old releases failed");
            e
        })?;
        for dir in &pruned {
            debug!(app, phase = %DeployPhase::Cleanup, release = %dir.display(), "pruned release");
        }

        info!(
            app,
            phase = %DeployPhase::Done,
            notice = true,
            release = %release.display(),
            "application deployed"
        );
        Ok(DeployOutcome::Deployed {
            revision,
            release,
            pruned,
        })
    }

    /// The live release when nothing needs deploying, `None` otherwise
    fn up_to_date_release(&self, live: Option<&Path>) -> DeployResult<Option<PathBuf>> {
        let app = self.app.name.as_str();

        if !self.store.base_exists() {
            debug!(app, base = %self.store.base_path().display(), "base directory missing");
            return Ok(None);
        }
        let Some(live) = live else {
            debug!(app, "no current release");
            return Ok(None);
        };

        for source in &self.sources {
            if source.needs_update(live)? {
                debug!(app, repository = source.name(), "repository needs update");
                return Ok(None);
            }
        }
        Ok(Some(live.to_path_buf()))
    }

    fn recover_from_post_hook(
        &self,
        release: PathBuf,
        previous: Option<PathBuf>,
        error: DeployError,
    ) -> DeployOutcome {
        let app = self.app.name.as_str();

        // With no live release at CHECKING, fall back to the newest older one on disk
        let Some(previous) = previous.or_else(|| self.store.previous_release_dir()) else {
            error!(
                app,
                phase = %DeployPhase::PostHook,
                release = %release.display(),
                "no previous release to roll back to, leaving new release live"
            );
            return DeployOutcome::LeftBroken { release, error };
        };

        info!(app, phase = %DeployPhase::RollingBack, previous = %previous.display(), "rolling back");
        match self.rollback(Some(&release), Some(&previous)) {
            Ok(RollbackOutcome::Completed { restored, .. }) => DeployOutcome::RolledBack {
                release,
                restored,
                error,
            },
            Ok(RollbackOutcome::Aborted { error: rollback_error })
            | Ok(RollbackOutcome::PostRollbackFailed {
                error: rollback_error,
                ..
            })
            | Err(rollback_error) => {
                error!(
                    app,
                    phase = %DeployPhase::RollingBack,
                    error = %rollback_error,
                    "rollback failed"
                );
                DeployOutcome::RollbackFailed {
                    release,
                    error,
                    rollback_error,
                }
            }
        }
    }
}
