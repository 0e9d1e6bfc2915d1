//! releasectl - release deployment orchestrator
//!
//! Each deploy materializes an application's repositories into a fresh
//! timestamped release directory, runs hooks around an atomic-ish symlink
//! swap, rolls back when post-deploy hooks fail and prunes old releases.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    DeployOutcome, DeployPhase, DeploymentEngine, RepositoryStatus, RollbackOutcome, StatusReport,
};
pub use config::{ConfigWarning, LoadedConfig};
pub use domain::entities::{Application, Hooks, RepositorySpec};
pub use error::{DeployError, DeployResult};
