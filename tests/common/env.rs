//! Isolated test environment.
//!
//! Everything lives under one temp directory: git origins, deploy bases, the
//! config file and the run lock, so tests never see each other or the
//! user's configuration.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use releasectl::config;
use releasectl::domain::entities::Application;
use tempfile::TempDir;

/// Result of running the releasectl binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// stdout parsed as NDJSON
    pub fn json_events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("stdout line is not JSON"))
            .collect()
    }
}

pub struct TestEnv {
    pub root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create temp dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_releasectl")),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Deploy base directory for an application
    pub fn base(&self, app: &str) -> PathBuf {
        self.path("deploy").join(app)
    }

    pub fn config_path(&self) -> PathBuf {
        self.path("releasectl.toml")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.path("run/releasectl.pid")
    }

    /// `[settings]` block pointing the run lock into this environment
    pub fn settings(&self) -> String {
        format!("[settings]\nlock_file = '{}'\n", self.lock_path().display())
    }

    /// Write the config file, prefixed with [`Self::settings`]
    pub fn write_config(&self, body: &str) {
        let content = format!("{}\n{}", self.settings(), body);
        std::fs::write(self.config_path(), content).expect("failed to write config");
    }

    /// Load the written config and return one valid application
    pub fn app(&self, name: &str) -> Application {
        let loaded = config::load(&[self.config_path()]).expect("config should load");
        loaded
            .applications
            .into_iter()
            .find(|(app, _)| app == name)
            .unwrap_or_else(|| panic!("application '{}' not configured", name))
            .1
            .expect("application config should be valid")
    }

    /// Run the binary against this environment's config file
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.root.path())
            .env_remove("RELEASECTL_CONFIG")
            .env_remove("RELEASECTL_LOG_JSON")
            .env("RELEASECTL_LOG", "releasectl=debug")
            .env("HOME", self.path("home"))
            .env("XDG_CONFIG_HOME", self.path("home/.config"))
            .arg("--config")
            .arg(self.config_path())
            .args(args);

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute releasectl");
        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Directory the `current` symlink of `base` resolves to
pub fn live_release(base: &Path) -> Option<PathBuf> {
    let target = std::fs::read_link(base.join("current")).ok()?;
    Some(base.join(target.file_name()?))
}

/// Release directories under `base`, oldest first
pub fn release_dirs(base: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(base) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    dirs
}
