//! Error types for releasectl
//!
//! Library code returns [`DeployError`]; the binary wraps it in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::HookKind;

/// Result type alias for releasectl operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for deployment operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Malformed or incomplete application/repository configuration
    #[error("configuration error for '{app}': {message}")]
    Configuration { app: String, message: String },

    /// A configuration file could not be read or parsed
    #[error("invalid configuration file {}: {message}", path.display())]
    ConfigFile { path: PathBuf, message: String },

    /// Directory creation/removal or symlink failure
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Checkout or ref resolution failure against the repository backend
    #[error("repository '{repository}': {message}")]
    Vcs { repository: String, message: String },

    /// A configured hook exited non-zero
    #[error("{kind} hook failed: `{command}`: {stderr}")]
    HookFailed {
        kind: HookKind,
        command: String,
        stderr: String,
    },

    /// Read-only status reporting hit an inconsistency
    #[error("status of '{app}' unavailable: {message}")]
    Status { app: String, message: String },

    /// Rollback requested but there is nothing to roll back to
    #[error("cannot roll back '{app}': {reason}")]
    NothingToRollBack { app: String, reason: String },

    /// Another run holds the run lock
    #[error("another run holds the lock at {} (pid {pid})", path.display())]
    Locked { path: PathBuf, pid: String },
}

impl DeployError {
    pub fn configuration(app: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            app: app.into(),
            message: message.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn vcs(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Vcs {
            repository: repository.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::ConfigFile { .. } => "config_file",
            Self::Filesystem { .. } => "filesystem",
            Self::Vcs { .. } => "vcs",
            Self::HookFailed { .. } => "hook_failed",
            Self::Status { .. } => "status",
            Self::NothingToRollBack { .. } => "nothing_to_roll_back",
            Self::Locked { .. } => "locked",
        }
    }
}
