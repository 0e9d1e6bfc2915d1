//! Domain Entities

mod application;
mod marker;

pub use application::{Application, Hooks, RepositorySpec};
pub use marker::DeployedMarker;
