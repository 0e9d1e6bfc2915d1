//! Deployment Engine
//!
//! Drives one application through deploy, rollback and status.
//!
//! ## Structure
//!
//! - `deploy` - The deploy state machine
//! - `rollback` - Restoring the previous release
//! - `status` - Read-only status snapshot (`StatusReport`)
//! - `outcome` - Result types (`DeployOutcome`, `RollbackOutcome`)
//!
//! ## Usage
//!
//! ```ignore
//! use releasectl::presentation::factory;
//!
//! let engine = factory::create_engine(app);
//! let outcome = engine.deploy()?;
//! ```

mod deploy;
mod outcome;
mod rollback;
mod status;

use std::path::Path;

use tracing::{error, info};

use crate::domain::entities::Application;
use crate::domain::ports::RepositorySource;
use crate::domain::value_objects::HookKind;
use crate::error::DeployResult;
use crate::infrastructure::{HookRunner, ReleaseStore};

pub use outcome::{DeployOutcome, DeployPhase, RollbackOutcome};
pub use status::{RepositoryStatus, StatusReport};

/// Runs deploy, rollback and status for one application.
///
/// An engine is built per application per run; its repository sources
/// memoize what they resolve, so one engine should not outlive the run.
pub struct DeploymentEngine {
    app: Application,
    store: ReleaseStore,
    sources: Vec<Box<dyn RepositorySource>>,
    hooks: HookRunner,
}

impl DeploymentEngine {
    /// `sources` must follow the order of `app.repositories`
    pub fn new(app: Application, sources: Vec<Box<dyn RepositorySource>>, hooks: HookRunner) -> Self {
        let store = ReleaseStore::for_application(&app);
        Self {
            app,
            store,
            sources,
            hooks,
        }
    }

    pub fn application(&self) -> &Application {
        &self.app
    }

    pub fn store(&self) -> &ReleaseStore {
        &self.store
    }

    /// Run a hook if one is configured. Non-empty output is logged as a
    /// notice.
    fn run_hook(&self, kind: HookKind, working_dir: &Path) -> DeployResult<()> {
        let Some(command) = self.app.hooks.command(kind) else {
            return Ok(());
        };

        let output = self.hooks.run(kind, command, working_dir)?;
        let output = output.trim();
        if !output.is_empty() {
            info!(app = %self.app.name, hook = %kind, notice = true, output, "hook output");
        }
        Ok(())
    }

    /// Remove a release that never went live. Failure to remove it is logged
    /// and otherwise ignored; the caller is already reporting a failure.
    fn discard_release(&self, release: &Path, phase: DeployPhase) {
        if let Err(e) = self.store.delete_tree(release) {
            error!(
                app = %self.app.name,
                phase = %phase,
                release = %release.display(),
                error = %e,
                "failed to remove release"
            );
        }
    }
}
