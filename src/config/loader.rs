//! Configuration discovery, loading and merging

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::Application;
use crate::error::{DeployError, DeployResult};

use super::resolve::resolve_application;
use super::types::{ApplicationConfig, Config};

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "RELEASECTL_CONFIG";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the unknown key, e.g. `apps.blog.revison`
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key `{}` in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean `{}`?)", suggestion)?;
        }
        Ok(())
    }
}

/// Result of loading every configuration file
#[derive(Debug)]
pub struct LoadedConfig {
    /// Files that were read, in merge order
    pub sources: Vec<PathBuf>,
    pub lock_file: Option<PathBuf>,
    /// Every configured application, alphabetical. Invalid ones carry their
    /// error so the rest can still run.
    pub applications: Vec<(String, DeployResult<Application>)>,
    pub warnings: Vec<ConfigWarning>,
}

impl LoadedConfig {
    pub fn application_names(&self) -> Vec<&str> {
        self.applications.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Files to load, in merge order.
///
/// Explicit paths win; then `$RELEASECTL_CONFIG`; then the user config
/// followed by `./releasectl.toml`, whichever exist.
pub fn discover(explicit: &[PathBuf]) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }

    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return vec![PathBuf::from(path)];
    }

    let mut found = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        let user = dir.join("releasectl").join("config.toml");
        if user.is_file() {
            found.push(user);
        }
    }
    let local = PathBuf::from("releasectl.toml");
    if local.is_file() {
        found.push(local);
    }
    found
}

/// Load, merge and resolve the given files
pub fn load(paths: &[PathBuf]) -> DeployResult<LoadedConfig> {
    if paths.is_empty() {
        return Err(DeployError::ConfigFile {
            path: PathBuf::from("releasectl.toml"),
            message: format!(
                "no configuration file found (use --config or set {})",
                CONFIG_ENV
            ),
        });
    }

    let mut merged = toml::Value::Table(toml::Table::new());
    let mut warnings = Vec::new();

    for path in paths {
        let content = fs::read_to_string(path).map_err(|e| DeployError::ConfigFile {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let value: toml::Value = toml::from_str(&content).map_err(|e| DeployError::ConfigFile {
            path: path.clone(),
            message: e.to_string(),
        })?;
        warnings.extend(unknown_keys(path, &content, &value)?);
        debug!(path = %path.display(), "loaded configuration file");
        merge_values(&mut merged, value);
    }

    let config = Config::deserialize(merged).map_err(|e| DeployError::ConfigFile {
        path: paths[paths.len() - 1].clone(),
        message: e.to_string(),
    })?;

    Ok(LoadedConfig {
        sources: paths.to_vec(),
        lock_file: config.settings.lock_file.clone(),
        applications: resolve_all(&config),
        warnings,
    })
}

/// Parse configuration from a string; used by tests and `check`
pub fn load_str(content: &str) -> DeployResult<LoadedConfig> {
    let source = PathBuf::from("<inline>");
    let value: toml::Value = toml::from_str(content).map_err(|e| DeployError::ConfigFile {
        path: source.clone(),
        message: e.to_string(),
    })?;
    let warnings = unknown_keys(&source, content, &value)?;
    let config = Config::deserialize(value).map_err(|e| DeployError::ConfigFile {
        path: source.clone(),
        message: e.to_string(),
    })?;

    Ok(LoadedConfig {
        sources: vec![source],
        lock_file: config.settings.lock_file.clone(),
        applications: resolve_all(&config),
        warnings,
    })
}

fn resolve_all(config: &Config) -> Vec<(String, DeployResult<Application>)> {
    config
        .apps
        .iter()
        .map(|(name, raw)| {
            let resolved = ApplicationConfig::deserialize(raw.clone())
                .map_err(|e| DeployError::configuration(name, e.to_string()))
                .and_then(|app| resolve_application(name, app, &config.default));
            (name.clone(), resolved)
        })
        .collect()
}

/// Recursively merge `overlay` into `base`. Tables merge key by key; any
/// other value in `overlay` replaces the one in `base`.
pub fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Unknown keys in one file.
///
/// Application tables are checked one by one so a type error in one of them
/// does not hide warnings for the others; such errors surface later when the
/// merged application is resolved.
fn unknown_keys(path: &Path, content: &str, value: &toml::Value) -> DeployResult<Vec<ConfigWarning>> {
    let mut unknown: Vec<String> = Vec::new();

    let config: Config = serde_ignored::deserialize(value.clone(), |p| {
        unknown.push(p.to_string());
    })
    .map_err(|e| DeployError::ConfigFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    for (name, raw) in &config.apps {
        let _: Result<ApplicationConfig, _> = serde_ignored::deserialize(raw.clone(), |p| {
            unknown.push(format!("apps.{}.{}", name, p));
        });
    }

    Ok(unknown
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                line: find_line_number(content, &key),
                suggestion: suggest_key(&leaf),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect())
}

/// Line of `key_path`'s assignment inside its own table. Numeric segments
/// select the n-th `[[array]]` table.
fn find_line_number(content: &str, key_path: &str) -> Option<usize> {
    let mut segments: Vec<&str> = key_path.split('.').filter(|s| *s != "?").collect();
    let leaf = segments.pop()?;
    let index = segments
        .iter()
        .rev()
        .find_map(|s| s.parse::<usize>().ok())
        .unwrap_or(0);
    let table = segments
        .iter()
        .filter(|s| s.parse::<usize>().is_err())
        .copied()
        .collect::<Vec<_>>()
        .join(".");
    let own_header = match table.as_str() {
        "" => leaf.to_string(),
        table => format!("{}.{}", table, leaf),
    };
    let assignment = Regex::new(&format!(r#"^\s*["']?{}["']?\s*="#, regex::escape(leaf))).ok()?;

    let mut current = String::new();
    let mut occurrence = 0;
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (number, line) in content.lines().enumerate() {
        if let Some(header) = table_header(line) {
            if header == own_header {
                return Some(number + 1);
            }
            let count = seen.entry(header.clone()).or_insert(0);
            occurrence = *count;
            *count += 1;
            current = header;
        } else if current == table && occurrence == index && assignment.is_match(line) {
            return Some(number + 1);
        }
    }

    content
        .lines()
        .position(|line| assignment.is_match(line))
        .map(|position| position + 1)
}

/// `[a.b]` and `[[a.b]]` as `a.b`
fn table_header(line: &str) -> Option<String> {
    let line = line.trim();
    let inner = match line.strip_prefix("[[") {
        Some(rest) => rest.split("]]").next()?,
        None => line.strip_prefix('[')?.split(']').next()?,
    };
    Some(
        inner
            .split('.')
            .map(|part| part.trim().trim_matches('"'))
            .collect::<Vec<_>>()
            .join("."),
    )
}

const KNOWN_KEYS: &[&str] = &[
    "settings",
    "lock_file",
    "default",
    "apps",
    "location",
    "symlink",
    "revisions",
    "date_format",
    "hooks",
    "pre_deploy",
    "post_deploy",
    "pre_rollback",
    "post_rollback",
    "timeout",
    "repositories",
    "name",
    "type",
    "origin",
    "branch",
    "tags",
    "directory",
    "marker_file",
    "executable",
    "fetch",
    "git",
];

fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (candidate, edit_distance(unknown, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.to_string())
}

/// Levenshtein distance over bytes
fn edit_distance(a: &str, b: &str) -> usize {
    let b = b.as_bytes();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &ca) in a.as_bytes().iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }

    row[b.len()]
}
