//! Configuration type definitions
//!
//! Every field is optional at this level. Defaults from `[default]` and
//! `[default.<type>]` are applied when an application is resolved.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Whole configuration after merging every file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub default: DefaultsConfig,

    /// Application tables, kept raw so a malformed one only fails itself
    #[serde(default)]
    pub apps: BTreeMap<String, toml::Value>,
}

/// Process-wide settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub lock_file: Option<PathBuf>,
}

/// `[default]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub symlink: Option<String>,

    #[serde(default)]
    pub revisions: Option<usize>,

    #[serde(default)]
    pub date_format: Option<String>,

    #[serde(default)]
    pub hooks: HooksConfig,

    /// `[default.git]`
    #[serde(default)]
    pub git: RepositoryDefaults,
}

/// Per-VCS repository defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryDefaults {
    #[serde(default)]
    pub executable: Option<String>,

    #[serde(default)]
    pub marker_file: Option<String>,

    #[serde(default)]
    pub fetch: Option<bool>,
}

/// `[apps.<name>]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub location: Option<PathBuf>,

    #[serde(default)]
    pub symlink: Option<String>,

    #[serde(default)]
    pub revisions: Option<usize>,

    #[serde(default)]
    pub date_format: Option<String>,

    #[serde(default)]
    pub hooks: HooksConfig,

    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
}

/// `[[apps.<name>.repositories]]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub origin: Option<String>,

    #[serde(default)]
    pub branch: Option<String>,

    /// Regular expression selecting deployable tags
    #[serde(default)]
    pub tags: Option<String>,

    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default)]
    pub marker_file: Option<String>,

    #[serde(default)]
    pub executable: Option<String>,

    #[serde(default)]
    pub fetch: Option<bool>,
}

/// Hook commands; used both in `[default.hooks]` and `[apps.<name>.hooks]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooksConfig {
    #[serde(default)]
    pub pre_deploy: Option<String>,

    #[serde(default)]
    pub post_deploy: Option<String>,

    #[serde(default)]
    pub pre_rollback: Option<String>,

    #[serde(default)]
    pub post_rollback: Option<String>,

    /// Seconds before a hook is killed
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl HooksConfig {
    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: &HooksConfig) -> HooksConfig {
        HooksConfig {
            pre_deploy: self.pre_deploy.or_else(|| fallback.pre_deploy.clone()),
            post_deploy: self.post_deploy.or_else(|| fallback.post_deploy.clone()),
            pre_rollback: self.pre_rollback.or_else(|| fallback.pre_rollback.clone()),
            post_rollback: self.post_rollback.or_else(|| fallback.post_rollback.clone()),
            timeout: self.timeout.or(fallback.timeout),
        }
    }
}
