//! Git-backed RepositorySource
//!
//! `origin` is a local repository (bare or not) addressed with
//! `git -C <origin>`. Releases receive a plain tree from `git archive`, so no
//! `.git` directory ends up inside a release.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::rc::Rc;

use chrono::Utc;
use tracing::{debug, info};

use super::marker::{read_marker, write_marker};
use crate::domain::entities::{DeployedMarker, RepositorySpec};
use crate::domain::ports::{CommandOutput, CommandRunner, CommandSpec, RepositorySource};
use crate::domain::value_objects::{natural_sort, ResolvedRef, TagPattern, TargetRef};
use crate::error::{DeployError, DeployResult};

pub struct GitRepository {
    app: String,
    spec: RepositorySpec,
    runner: Rc<dyn CommandRunner>,
    fetched: Cell<bool>,
    resolved_ref: OnceCell<ResolvedRef>,
    latest_revision: OnceCell<String>,
    markers: RefCell<HashMap<PathBuf, Option<DeployedMarker>>>,
}

impl GitRepository {
    pub fn new(app: &str, spec: RepositorySpec, runner: Rc<dyn CommandRunner>) -> Self {
        Self {
            app: app.to_string(),
            spec,
            runner,
            fetched: Cell::new(false),
            resolved_ref: OnceCell::new(),
            latest_revision: OnceCell::new(),
            markers: RefCell::new(HashMap::new()),
        }
    }

    /// Check if the git executable can be run
    pub fn check_available(executable: &str) -> bool {
        Command::new(executable)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn git(&self, args: &[&str]) -> DeployResult<CommandOutput> {
        let spec = CommandSpec::new(&self.spec.executable)
            .arg("-C")
            .arg(&self.spec.origin)
            .args(args.iter().copied());

        let output = self
            .runner
            .run(&spec)
            .map_err(|e| DeployError::vcs(&self.spec.name, format!("failed to run `{}`: {}", spec, e)))?;

        if !output.success() {
            return Err(DeployError::vcs(
                &self.spec.name,
                format!("`{}` failed: {}", spec, output.stderr_lossy().trim()),
            ));
        }
        Ok(output)
    }

    fn ensure_fetched(&self) -> DeployResult<()> {
        if self.spec.fetch && !self.fetched.get() {
            debug!(repository = %self.spec.name, "fetching origin");
            self.git(&["fetch", "--all", "--tags", "--prune", "--quiet"])?;
            self.fetched.set(true);
        }
        Ok(())
    }

    fn local_tags(&self) -> DeployResult<Vec<String>> {
        let output = self.git(&["tag", "--list"])?;
        Ok(output
            .stdout_lossy()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn latest_matching_tag(&self, pattern: &TagPattern) -> DeployResult<String> {
        let mut matches: Vec<String> = self
            .local_tags()?
            .into_iter()
            .filter(|tag| pattern.is_match(tag))
            .collect();
        natural_sort(&mut matches);

        matches.pop().ok_or_else(|| {
            DeployError::configuration(
                &self.app,
                format!(
                    "no tag matched pattern '{}' in repository '{}'",
                    pattern.as_str(),
                    self.spec.name
                ),
            )
        })
    }
}

impl RepositorySource for GitRepository {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn directory(&self) -> &str {
        &self.spec.directory
    }

    fn resolve_target_ref(&self) -> DeployResult<ResolvedRef> {
        if let Some(resolved) = self.resolved_ref.get() {
            return Ok(resolved.clone());
        }

        self.ensure_fetched()?;
        let resolved = match &self.spec.target {
            TargetRef::Branch(branch) => ResolvedRef::Branch(branch.clone()),
            TargetRef::Tags(pattern) => ResolvedRef::Tag(self.latest_matching_tag(pattern)?),
        };
        debug!(repository = %self.spec.name, target = %resolved, "resolved target ref");

        let _ = self.resolved_ref.set(resolved.clone());
        Ok(resolved)
    }

    fn latest_revision(&self) -> DeployResult<String> {
        if let Some(revision) = self.latest_revision.get() {
            return Ok(revision.clone());
        }

        let resolved = self.resolve_target_ref()?;
        let rev = format!("{}^{{commit}}", resolved.full_ref());
        let output = self.git(&["rev-parse", "--verify", "--quiet", &rev])?;
        let revision = output.stdout_lossy().trim().to_string();
        if revision.is_empty() {
            return Err(DeployError::vcs(
                &self.spec.name,
                format!("{} did not resolve to a commit", resolved),
            ));
        }
        info!(repository = %self.spec.name, revision = %revision, "repository revision");

        let _ = self.latest_revision.set(revision.clone());
        Ok(revision)
    }

    fn deployed_marker(&self, release_dir: &Path) -> Option<DeployedMarker> {
        let dir = self.checkout_dir(release_dir);
        if let Some(cached) = self.markers.borrow().get(&dir) {
            return cached.clone();
        }

        let marker = if dir.is_dir() {
            read_marker(&dir.join(&self.spec.marker_file))
        } else {
            None
        };
        self.markers.borrow_mut().insert(dir, marker.clone());
        marker
    }

    fn materialize(&self, target_dir: &Path) -> DeployResult<()> {
        let revision = self.latest_revision()?;
        std::fs::create_dir_all(target_dir).map_err(|e| DeployError::filesystem(target_dir, e))?;

        info!(
            repository = %self.spec.name,
            revision = %revision,
            target = %target_dir.display(),
            "copying revision"
        );
        let archive = self.git(&["archive", "--format=tar", &revision])?;
        tar::Archive::new(archive.stdout.as_slice())
            .unpack(target_dir)
            .map_err(|e| {
                DeployError::vcs(
                    &self.spec.name,
                    format!("failed to unpack {} into {}: {}", revision, target_dir.display(), e),
                )
            })?;

        let marker = DeployedMarker::new(revision, Utc::now());
        write_marker(&target_dir.join(&self.spec.marker_file), &marker)?;
        self.markers
            .borrow_mut()
            .insert(target_dir.to_path_buf(), Some(marker));
        Ok(())
    }
}
