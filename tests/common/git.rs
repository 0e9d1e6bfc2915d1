//! Throwaway git origins.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Whether a `git` executable can be run
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Return early from a test when git is missing
#[macro_export]
macro_rules! require_git {
    () => {
        if !$crate::common::git_available() {
            eprintln!("skipping: git is not available");
            return;
        }
    };
}

/// A non-bare repository on branch `main`
pub struct GitOrigin {
    pub path: PathBuf,
}

impl GitOrigin {
    pub fn init(path: &Path) -> Self {
        std::fs::create_dir_all(path).expect("failed to create origin dir");
        let origin = Self {
            path: path.to_path_buf(),
        };
        origin.git(&["init", "-q"]);
        origin.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        origin
    }

    /// Write `file`, commit everything and return the new commit id
    pub fn commit(&self, file: &str, content: &str) -> String {
        let path = self.path.join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, content).expect("failed to write file");
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", &format!("update {}", file)]);
        self.head()
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    /// Lightweight tag on HEAD
    pub fn tag(&self, name: &str) {
        self.git(&["tag", name]);
    }

    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.path)
            .args([
                "-c",
                "user.name=releasectl tests",
                "-c",
                "user.email=tests@releasectl.invalid",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
            ])
            .args(args)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Path as it should appear in a TOML literal string
    pub fn origin(&self) -> String {
        self.path.display().to_string()
    }
}
