//! Deploy and rollback results

use std::fmt;
use std::path::PathBuf;

use crate::domain::value_objects::RevisionId;
use crate::error::DeployError;

/// Phase of one deploy invocation, attached to every log event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    Checking,
    Staging,
    Syncing,
    PreHook,
    Cutover,
    PostHook,
    RollingBack,
    Cleanup,
    Done,
}

impl DeployPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Staging => "staging",
            Self::Syncing => "syncing",
            Self::PreHook => "pre_hook",
            Self::Cutover => "cutover",
            Self::PostHook => "post_hook",
            Self::RollingBack => "rolling_back",
            Self::Cleanup => "cleanup",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a deploy ended
#[derive(Debug)]
pub enum DeployOutcome {
    /// Every repository already matches the live release; nothing touched
    UpToDate { release: PathBuf },

    /// New release is live and old releases were pruned
    Deployed {
        revision: RevisionId,
        release: PathBuf,
        pruned: Vec<PathBuf>,
    },

    /// `pre_deploy` failed; the new release was deleted, `current` untouched
    Aborted { release: PathBuf, error: DeployError },

    /// `post_deploy` failed and the previous release is live again
    RolledBack {
        release: PathBuf,
        restored: PathBuf,
        error: DeployError,
    },

    /// `post_deploy` failed and restoring the previous release failed too
    RollbackFailed {
        release: PathBuf,
        error: DeployError,
        rollback_error: DeployError,
    },

    /// `post_deploy` failed with no earlier release to go back to; the new
    /// release stays live
    LeftBroken { release: PathBuf, error: DeployError },
}

impl DeployOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::UpToDate { .. } | Self::Deployed { .. })
    }

    /// Short machine-readable name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpToDate { .. } => "up_to_date",
            Self::Deployed { .. } => "deployed",
            Self::Aborted { .. } => "aborted",
            Self::RolledBack { .. } => "rolled_back",
            Self::RollbackFailed { .. } => "rollback_failed",
            Self::LeftBroken { .. } => "left_broken",
        }
    }
}

/// How a rollback ended
#[derive(Debug)]
pub enum RollbackOutcome {
    Completed {
        restored: PathBuf,
        removed: PathBuf,
        pruned: Vec<PathBuf>,
    },

    /// `pre_rollback` failed; nothing changed
    Aborted { error: DeployError },

    /// The previous release is live but `post_rollback` failed. Pruning is
    /// skipped; an operator has to look at it.
    PostRollbackFailed {
        restored: PathBuf,
        removed: PathBuf,
        error: DeployError,
    },
}

impl RollbackOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Aborted { .. } => "aborted",
            Self::PostRollbackFailed { .. } => "post_rollback_failed",
        }
    }
}
