//! Run lock
//!
//! A PID file held under an OS advisory lock for the duration of one CLI
//! run. Advisory only: processes that skip the lock (`--force`) are not
//! stopped, and nothing checks whether the recorded PID is still alive.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::{DeployError, DeployResult};

/// Default lock location when the configuration names none
pub fn default_lock_path() -> PathBuf {
    std::env::temp_dir().join("releasectl.pid")
}

#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    file: File,
}

impl RunLock {
    /// Take the lock at `path`, failing fast if another run holds it
    pub fn acquire(path: &Path) -> DeployResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| DeployError::filesystem(parent, e))?;
            }
        }

        loop {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(path)
                .map_err(|e| DeployError::filesystem(path, e))?;

            if let Some(lock) = Self::lock_opened(path, file)? {
                return Ok(lock);
            }
            debug!(path = %path.display(), "run lock file was replaced while locking, retrying");
        }
    }

    /// Lock an already opened handle. `None` when `path` no longer names the
    /// locked file because the previous holder removed it in between.
    fn lock_opened(path: &Path, mut file: File) -> DeployResult<Option<Self>> {
        if file.try_lock_exclusive().is_err() {
            let mut holder = String::new();
            let _ = file.read_to_string(&mut holder);
            let pid = match holder.trim() {
                "" => "unknown".to_string(),
                pid => pid.to_string(),
            };
            return Err(DeployError::Locked {
                path: path.to_path_buf(),
                pid,
            });
        }

        if !names_same_file(path, &file) {
            let _ = file.unlock();
            return Ok(None);
        }

        let pid = std::process::id();
        write_pid(&mut file, pid).map_err(|e| DeployError::filesystem(path, e))?;

        debug!(path = %path.display(), pid, "acquired run lock");
        Ok(Some(Self {
            path: path.to_path_buf(),
            file,
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn names_same_file(path: &Path, file: &File) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(path), file.metadata()) {
        (Ok(on_disk), Ok(held)) => on_disk.dev() == held.dev() && on_disk.ino() == held.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn names_same_file(path: &Path, _file: &File) -> bool {
    path.exists()
}

fn write_pid(file: &mut File, pid: u32) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", pid)?;
    file.flush()
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove run lock file");
        }
        let _ = self.file.unlock();
        debug!(path = %self.path.display(), "released run lock");
    }
}
