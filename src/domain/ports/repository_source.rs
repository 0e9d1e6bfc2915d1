//! RepositorySource port - capability over one version-controlled repository
//!
//! Implementations:
//! - `GitRepository` - shells out to git
//! - test doubles in the engine and scenario tests
//!
//! An instance lives for one engine run. Resolved refs, the latest revision
//! and deployed markers are memoized for that lifetime, so repeated calls
//! agree with each other even if the upstream moves mid-run.

use std::path::{Path, PathBuf};

use crate::domain::entities::DeployedMarker;
use crate::domain::value_objects::ResolvedRef;
use crate::error::DeployResult;

pub trait RepositorySource {
    /// Configured repository name
    fn name(&self) -> &str;

    /// Subdirectory of the release this repository occupies (may be empty)
    fn directory(&self) -> &str;

    /// Branch, or newest tag matching the configured pattern
    fn resolve_target_ref(&self) -> DeployResult<ResolvedRef>;

    /// Revision id of the resolved ref
    fn latest_revision(&self) -> DeployResult<String>;

    /// Marker recorded in `release_dir`, if present and well formed
    fn deployed_marker(&self, release_dir: &Path) -> Option<DeployedMarker>;

    /// Write the resolved tree into `target_dir`, then the marker
    fn materialize(&self, target_dir: &Path) -> DeployResult<()>;

    /// Where this repository lives inside a release
    fn checkout_dir(&self, release_dir: &Path) -> PathBuf {
        if self.directory().is_empty() {
            release_dir.to_path_buf()
        } else {
            release_dir.join(self.directory())
        }
    }

    fn deployed_revision(&self, release_dir: &Path) -> Option<String> {
        self.deployed_marker(release_dir).map(|marker| marker.revision)
    }

    /// True when the repository is missing from `release_dir` or its
    /// deployed revision differs from the latest one.
    fn needs_update(&self, release_dir: &Path) -> DeployResult<bool> {
        if !self.checkout_dir(release_dir).is_dir() {
            return Ok(true);
        }
        let latest = self.latest_revision()?;
        Ok(self.deployed_revision(release_dir).as_deref() != Some(latest.as_str()))
    }
}
