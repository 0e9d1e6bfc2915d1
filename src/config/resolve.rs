//! Turning one application table into a validated [`Application`]
//!
//! Defaults are applied here, then every rule the engine relies on is
//! checked, so the engine can treat an `Application` as well formed.

use std::collections::HashSet;
use std::path::{Component, Path};
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};

use crate::domain::entities::{Application, Hooks, RepositorySpec};
use crate::domain::value_objects::{TagPattern, TargetRef, VcsKind};
use crate::error::{DeployError, DeployResult};

use super::types::{ApplicationConfig, DefaultsConfig, HooksConfig, RepositoryConfig, RepositoryDefaults};

pub const DEFAULT_SYMLINK: &str = "current";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_MARKER_FILE: &str = ".releasectl";
pub const DEFAULT_GIT_EXECUTABLE: &str = "git";

pub fn resolve_application(
    name: &str,
    config: ApplicationConfig,
    defaults: &DefaultsConfig,
) -> DeployResult<Application> {
    let invalid = |message: String| DeployError::configuration(name, message);

    let location = config
        .location
        .filter(|l| !l.as_os_str().is_empty())
        .ok_or_else(|| invalid("missing `location`".to_string()))?;

    let symlink = config
        .symlink
        .or_else(|| defaults.symlink.clone())
        .unwrap_or_else(|| DEFAULT_SYMLINK.to_string());
    if !is_single_component(&symlink) {
        return Err(invalid(format!(
            "`symlink` must be a plain file name, got '{}'",
            symlink
        )));
    }

    let date_format = config
        .date_format
        .or_else(|| defaults.date_format.clone())
        .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
    if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid(format!("invalid `date_format` '{}'", date_format)));
    }

    if config.repositories.is_empty() {
        return Err(invalid("no repositories configured".to_string()));
    }

    let mut seen = HashSet::new();
    let mut repositories = Vec::with_capacity(config.repositories.len());
    for (index, repo) in config.repositories.into_iter().enumerate() {
        let spec = resolve_repository(name, index, repo, defaults)?;
        if !seen.insert(spec.name.clone()) {
            return Err(invalid(format!("duplicate repository name '{}'", spec.name)));
        }
        repositories.push(spec);
    }

    Ok(Application {
        name: name.to_string(),
        location,
        symlink,
        revisions: config.revisions.or(defaults.revisions).unwrap_or(0),
        date_format,
        repositories,
        hooks: resolve_hooks(config.hooks.or(&defaults.hooks)),
    })
}

fn resolve_repository(
    app: &str,
    index: usize,
    config: RepositoryConfig,
    defaults: &DefaultsConfig,
) -> DeployResult<RepositorySpec> {
    let name = config
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            DeployError::configuration(app, format!("repository #{} has no `name`", index + 1))
        })?;
    let invalid = |message: String| {
        DeployError::configuration(app, format!("repository '{}': {}", name, message))
    };

    let kind: VcsKind = config
        .kind
        .as_deref()
        .ok_or_else(|| invalid("missing `type`".to_string()))?
        .parse()
        .map_err(invalid)?;
    let vcs_defaults: &RepositoryDefaults = match kind {
        VcsKind::Git => &defaults.git,
    };

    let origin = config
        .origin
        .filter(|o| !o.trim().is_empty())
        .ok_or_else(|| invalid("missing `origin`".to_string()))?;

    let target = match (config.branch, config.tags) {
        (Some(branch), None) if !branch.trim().is_empty() => TargetRef::Branch(branch),
        (None, Some(pattern)) => TargetRef::Tags(
            TagPattern::new(&pattern)
                .map_err(|e| invalid(format!("invalid `tags` pattern '{}': {}", pattern, e)))?,
        ),
        (Some(_), Some(_)) => {
            return Err(invalid("set either `branch` or `tags`, not both".to_string()))
        }
        _ => return Err(invalid("no branch or tags defined".to_string())),
    };

    let directory = config
        .directory
        .ok_or_else(|| invalid("missing `directory`".to_string()))
        .and_then(|d| normalize_directory(&d).ok_or_else(|| invalid(format!("invalid `directory` '{}'", d))))?;

    let marker_file = config
        .marker_file
        .or_else(|| vcs_defaults.marker_file.clone())
        .unwrap_or_else(|| DEFAULT_MARKER_FILE.to_string());
    if !is_single_component(&marker_file) {
        return Err(invalid(format!(
            "`marker_file` must be a plain file name, got '{}'",
            marker_file
        )));
    }

    let executable = config
        .executable
        .or_else(|| vcs_defaults.executable.clone())
        .unwrap_or_else(|| DEFAULT_GIT_EXECUTABLE.to_string());
    if executable.trim().is_empty() {
        return Err(invalid("`executable` is empty".to_string()));
    }

    Ok(RepositorySpec {
        fetch: config.fetch.or(vcs_defaults.fetch).unwrap_or(false),
        name,
        kind,
        origin,
        target,
        directory,
        marker_file,
        executable,
    })
}

fn resolve_hooks(config: HooksConfig) -> Hooks {
    Hooks {
        pre_deploy: config.pre_deploy,
        post_deploy: config.post_deploy,
        pre_rollback: config.pre_rollback,
        post_rollback: config.post_rollback,
        timeout: config.timeout.filter(|secs| *secs > 0).map(Duration::from_secs),
    }
}

/// Relative path inside a release; `""`, `"."` and `"/"` all mean the
/// release root. Rejects anything that could escape the release.
fn normalize_directory(raw: &str) -> Option<String> {
    let parts: Vec<&str> = Path::new(raw.trim_matches('/'))
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            Component::CurDir => None,
            _ => Some(None),
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('/')
}
