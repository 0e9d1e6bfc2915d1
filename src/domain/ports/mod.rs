//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod command_runner;
pub mod repository_source;

pub use command_runner::{CommandOutput, CommandRunner, CommandSpec};
pub use repository_source::RepositorySource;
