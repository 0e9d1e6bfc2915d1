//! Application entity
//!
//! Built from validated configuration once per run and never mutated
//! afterwards.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::value_objects::{HookKind, TargetRef, VcsKind};

/// One deployable application
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub name: String,
    /// Base directory holding every release and the symlink
    pub location: PathBuf,
    /// Name of the symlink pointing at the live release
    pub symlink: String,
    /// Non-current releases kept after cleanup (0 = keep everything)
    pub revisions: usize,
    /// chrono format string used for status timestamps
    pub date_format: String,
    /// In configuration order
    pub repositories: Vec<RepositorySpec>,
    pub hooks: Hooks,
}

/// One repository of an application
#[derive(Debug, Clone, PartialEq)]
pub struct RepositorySpec {
    pub name: String,
    pub kind: VcsKind,
    pub origin: String,
    pub target: TargetRef,
    /// Subdirectory inside the release; empty means the release root
    pub directory: String,
    /// File name of the deployed marker inside `directory`
    pub marker_file: String,
    /// VCS executable
    pub executable: String,
    /// Refresh the origin before resolving refs
    pub fetch: bool,
}

/// Optional lifecycle commands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hooks {
    pub pre_deploy: Option<String>,
    pub post_deploy: Option<String>,
    pub pre_rollback: Option<String>,
    pub post_rollback: Option<String>,
    pub timeout: Option<Duration>,
}

impl Hooks {
    pub fn command(&self, kind: HookKind) -> Option<&str> {
        let command = match kind {
            HookKind::PreDeploy => &self.pre_deploy,
            HookKind::PostDeploy => &self.post_deploy,
            HookKind::PreRollback => &self.pre_rollback,
            HookKind::PostRollback => &self.post_rollback,
        };
        command.as_deref().filter(|c| !c.trim().is_empty())
    }
}
