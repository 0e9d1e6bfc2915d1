//! VCS backends
//!
//! The configured `type` maps onto a closed set of backends. Unknown types
//! never reach this point; config validation rejects them.

mod git;
mod marker;

use std::rc::Rc;

use crate::domain::entities::RepositorySpec;
use crate::domain::ports::{CommandRunner, RepositorySource};
use crate::domain::value_objects::VcsKind;

pub use git::GitRepository;
pub use marker::{read_marker, write_marker};

/// Construct the backend for one configured repository
pub fn build_source(
    app: &str,
    spec: &RepositorySpec,
    runner: Rc<dyn CommandRunner>,
) -> Box<dyn RepositorySource> {
    match spec.kind {
        VcsKind::Git => Box::new(GitRepository::new(app, spec.clone(), runner)),
    }
}

/// Whether the executable backing `spec` can be started
pub fn backend_available(spec: &RepositorySpec) -> bool {
    match spec.kind {
        VcsKind::Git => GitRepository::check_available(&spec.executable),
    }
}
