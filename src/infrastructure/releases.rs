//! Release Store
//!
//! Filesystem layout of one application:
//!
//! ```text
//! <location>/
//!   2024.05.06.07.08.09.000001/   release
//!   2024.05.07.10.00.00.123456/   release
//!   current -> <location>/2024.05.07.10.00.00.123456
//! ```
//!
//! Swapping `current` is unlink-then-link, so there is a short window in
//! which the symlink does not exist. Callers serialize runs with `RunLock`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::entities::Application;
use crate::domain::value_objects::{natural_cmp, RevisionId};
use crate::error::{DeployError, DeployResult};

#[derive(Debug, Clone)]
pub struct ReleaseStore {
    base: PathBuf,
    symlink: String,
}

impl ReleaseStore {
    pub fn new(location: &Path, symlink: &str) -> Self {
        // Collecting components drops trailing separators
        let base: PathBuf = location.components().collect();
        Self {
            base,
            symlink: symlink.to_string(),
        }
    }

    pub fn for_application(app: &Application) -> Self {
        Self::new(&app.location, &app.symlink)
    }

    pub fn base_path(&self) -> &Path {
        &self.base
    }

    pub fn base_exists(&self) -> bool {
        self.base.is_dir()
    }

    /// Path of the symlink itself
    pub fn current_release_path(&self) -> PathBuf {
        self.base.join(&self.symlink)
    }

    /// Release the symlink points at, if the link exists and its target is
    /// still a directory under the base path.
    pub fn resolved_current_release_dir(&self) -> Option<PathBuf> {
        let target = fs::read_link(self.current_release_path()).ok()?;
        let name = target.file_name()?;
        let dir = self.base.join(name);
        dir.is_dir().then_some(dir)
    }

    pub fn new_release_dir(&self, revision: &RevisionId) -> PathBuf {
        self.base.join(revision)
    }

    /// Release directories, oldest first.
    ///
    /// Symlinks, plain files and dot-prefixed entries are not releases.
    pub fn releases(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.base) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.') && *name != self.symlink)
            .collect();
        names.sort_by(|a, b| natural_cmp(a, b));

        names.into_iter().map(|name| self.base.join(name)).collect()
    }

    /// Most recent release other than the live one
    pub fn previous_release_dir(&self) -> Option<PathBuf> {
        let releases = self.releases();
        if releases.len() < 2 {
            return None;
        }
        let current = self.resolved_current_release_dir();
        releases
            .into_iter()
            .rev()
            .find(|release| Some(release) != current.as_ref())
    }

    /// Create `path` and its parents; succeeds if it already exists
    pub fn create_directory(&self, path: &Path) -> DeployResult<()> {
        if path.is_dir() {
            debug!(path = %path.display(), "directory already exists");
            return Ok(());
        }
        fs::create_dir_all(path).map_err(|e| DeployError::filesystem(path, e))?;
        debug!(path = %path.display(), "created directory");
        Ok(())
    }

    /// Point `current` at `target`. The only operation that changes which
    /// release is live.
    pub fn swap_symlink(&self, target: &Path) -> DeployResult<()> {
        let link = self.current_release_path();
        match fs::remove_file(&link) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(DeployError::filesystem(&link, e)),
        }

        let target = std::path::absolute(target).map_err(|e| DeployError::filesystem(target, e))?;
        symlink_dir(&target, &link).map_err(|e| DeployError::filesystem(&link, e))?;
        debug!(link = %link.display(), target = %target.display(), "swapped symlink");
        Ok(())
    }

    /// Delete old releases.
    ///
    /// Walking newest to oldest: `kept` survives, then up to `retain`
    /// releases older than it; everything else goes, including releases newer
    /// than `kept`. The live release is never deleted. `retain == 0` keeps
    /// everything. Returns the deleted directories.
    pub fn prune(&self, kept: &Path, retain: usize) -> DeployResult<Vec<PathBuf>> {
        if retain == 0 {
            debug!("retention unlimited, nothing to prune");
            return Ok(Vec::new());
        }
        if !self.base_exists() {
            return Err(DeployError::filesystem(
                &self.base,
                io::Error::new(io::ErrorKind::NotFound, "application base directory is missing"),
            ));
        }
        if !kept.is_dir() {
            return Err(DeployError::filesystem(
                kept,
                io::Error::new(io::ErrorKind::NotFound, "release to keep does not exist"),
            ));
        }

        let live = self.resolved_current_release_dir();
        let mut found_kept = false;
        let mut retained = 0;
        let mut deleted = Vec::new();

        for release in self.releases().into_iter().rev() {
            if release == kept {
                found_kept = true;
                continue;
            }
            if Some(&release) == live.as_ref() {
                continue;
            }
            if found_kept && retained < retain {
                retained += 1;
                continue;
            }
            self.delete_tree(&release)?;
            deleted.push(release);
        }

        Ok(deleted)
    }

    /// `rm -rf`; a missing path is success
    pub fn delete_tree(&self, path: &Path) -> DeployResult<()> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(DeployError::filesystem(path, e)),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        result.map_err(|e| DeployError::filesystem(path, e))?;
        debug!(path = %path.display(), "deleted");
        Ok(())
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
