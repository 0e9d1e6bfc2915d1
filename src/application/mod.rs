//! Application Layer
//!
//! Orchestrates deploy, rollback and status per application.
//! This layer:
//! - Depends on Domain layer (entities, ports, value objects)
//! - Drives the release store and hook runner from Infrastructure
//! - Never decides configuration or presentation concerns
//!
//! ## Use Cases
//!
//! - `DeploymentEngine::deploy` - The deploy state machine
//! - `DeploymentEngine::rollback` - Restore the previous release
//! - `DeploymentEngine::status` - Read-only snapshot

pub mod engine;

pub use engine::{
    DeployOutcome, DeployPhase, DeploymentEngine, RepositoryStatus, RollbackOutcome, StatusReport,
};
