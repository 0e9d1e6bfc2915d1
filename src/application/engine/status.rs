//! Status snapshot

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{DeployError, DeployResult};

use super::DeploymentEngine;

/// What is live for one application, and what could be
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub application: String,
    /// Name of the live release directory; `None` when nothing is deployed
    pub release: Option<String>,
    pub repositories: Vec<RepositoryStatus>,
    #[serde(skip)]
    date_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryStatus {
    pub name: String,
    pub deployed_revision: Option<String>,
    pub deployed_at: Option<DateTime<Utc>>,
    pub latest_revision: String,
    pub update_available: bool,
}

impl StatusReport {
    pub fn new(
        application: &str,
        release: &str,
        repositories: Vec<RepositoryStatus>,
        date_format: &str,
    ) -> Self {
        Self {
            application: application.to_string(),
            release: Some(release.to_string()),
            repositories,
            date_format: date_format.to_string(),
        }
    }

    pub fn not_deployed(application: &str) -> Self {
        Self {
            application: application.to_string(),
            release: None,
            repositories: Vec::new(),
            date_format: String::new(),
        }
    }

    pub fn is_deployed(&self) -> bool {
        self.release.is_some()
    }

    pub fn update_available(&self) -> bool {
        self.repositories.iter().any(|r| r.update_available)
    }

    /// Human-readable report, one entry per line
    pub fn lines(&self) -> Vec<String> {
        let Some(release) = &self.release else {
            return vec![format!("{} is not currently deployed.", self.application)];
        };

        let mut lines = vec![format!("{}: release {}", self.application, release)];
        for repo in &self.repositories {
            let deployed_at = repo
                .deployed_at
                .map(|at| format_timestamp(at, &self.date_format))
                .unwrap_or_else(|| "never".to_string());
            let mut line = format!(
                "  {}: deployed {} at {}, latest {}",
                repo.name,
                repo.deployed_revision.as_deref().unwrap_or("none"),
                deployed_at,
                repo.latest_revision
            );
            if repo.update_available {
                line.push_str(" (update available)");
            }
            lines.push(line);
        }
        lines
    }
}

/// `at` in `format`; falls back to RFC 3339 if the format cannot render
fn format_timestamp(at: DateTime<Utc>, format: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", at.format(format)) {
        Ok(()) => out,
        Err(_) => at.to_rfc3339(),
    }
}

impl DeploymentEngine {
    /// Snapshot of the live release. Never mutates anything.
    pub fn status(&self) -> DeployResult<StatusReport> {
        let Some(live) = self.store.resolved_current_release_dir() else {
            return Ok(StatusReport::not_deployed(&self.app.name));
        };

        let mut repositories = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let latest_revision = source.latest_revision().map_err(|e| DeployError::Status {
                app: self.app.name.clone(),
                message: format!("repository '{}': {}", source.name(), e),
            })?;
            let marker = source.deployed_marker(&live);
            repositories.push(RepositoryStatus {
                name: source.name().to_string(),
                update_available: marker.as_ref().map(|m| m.revision.as_str())
                    != Some(latest_revision.as_str()),
                deployed_revision: marker.as_ref().map(|m| m.revision.clone()),
                deployed_at: marker.map(|m| m.deployed_at),
                latest_revision,
            });
        }

        let release = live
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(StatusReport::new(
            &self.app.name,
            &release,
            repositories,
            &self.app.date_format,
        ))
    }
}
